//! # Media Dedup
//!
//! Finds duplicate and near-duplicate photos and videos across directory
//! trees and writes a JSON report. Files are only ever read.
//!
//! ## Architecture
//! - `core` - The deduplication engine
//! - `config` - The JSON run configuration
//! - `events` - Event-driven progress reporting
//! - `error` - Error types, split by severity

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DedupError, Result};

/// Initialize tracing for the application.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
/// Logs go to stderr so they never mix with report output. Calling this twice
/// keeps the first subscriber.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
