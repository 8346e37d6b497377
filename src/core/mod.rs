//! # Core Module
//!
//! The deduplication engine.
//!
//! ## Modules
//! - `scanner` - Walks the search roots and classifies photos and videos
//! - `hasher` - Content digests and perceptual hashes
//! - `probe` - External tool for video duration and frames
//! - `fingerprint` - Builds the per-file records
//! - `pipeline` - Bounded concurrent fingerprinting and the full run
//! - `comparator` - Anchor-based duplicate and similarity clustering
//! - `reporter` - The three-bucket report

pub mod comparator;
pub mod fingerprint;
pub mod hasher;
pub mod pipeline;
pub mod probe;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{ClusteringEngine, PoolClusters};
pub use fingerprint::{MediaRecord, PhotoRecord, VideoRecord};
pub use hasher::{HashAlgorithmKind, PerceptualHash};
pub use probe::{FfmpegProbe, MediaProbe};
pub use reporter::Report;
pub use scanner::{MediaItem, MediaKind};
