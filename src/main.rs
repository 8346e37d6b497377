//! # media-dedup CLI
//!
//! Command-line interface for the media deduplicator.
//!
//! ## Usage
//! ```bash
//! media-dedup scan --config ./config.json
//! media-dedup scan --config ./config.json --format csv --output report.csv
//! ```

mod cli;

use media_dedup::Result;

fn main() -> Result<()> {
    cli::run()
}
