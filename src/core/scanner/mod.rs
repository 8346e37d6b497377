//! # Scanner Module
//!
//! Walks the search roots and classifies every regular file.
//!
//! ## Classification
//! - Photo: `.jpeg`, `.jpg`, `.png`, `.webp`, `.jfif`
//! - Video: `.mp4`, `.mov`, `.webm`
//! - Everything else is skipped.
//!
//! Entries are visited in file-name order, so the same tree always yields
//! the same discovery sequence. Any walk error is fatal: a partial scan of
//! a library would produce a misleading report.
//!
//! ## Example
//! ```rust,ignore
//! use media_dedup::core::scanner::{ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(&["/data/photos".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::MediaFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of media a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Classify a file extension (without the dot, any case)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpeg" | "jpg" | "png" | "webp" | "jfif" => Some(MediaKind::Photo),
            "mp4" | "mov" | "webm" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A classified file waiting to be fingerprinted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Position in discovery order, starting at 0
    pub sequence: u64,
    /// Path to the file
    pub path: PathBuf,
    /// Photo or video
    pub kind: MediaKind,
    /// File size in bytes
    pub size: u64,
}

/// Tallies gathered while walking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkSummary {
    pub directories: usize,
    pub photos: usize,
    pub videos: usize,
    pub skipped: usize,
    /// Size of every regular file seen, media or not
    pub total_bytes: u64,
}

/// Every media file found by [`WalkDirScanner::scan`], in discovery order
#[derive(Debug)]
pub struct ScanResult {
    pub items: Vec<MediaItem>,
    pub summary: WalkSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_extensions_are_classified() {
        for ext in ["jpeg", "jpg", "png", "webp", "jfif"] {
            assert_eq!(MediaKind::from_extension(ext), Some(MediaKind::Photo), "{ext}");
        }
    }

    #[test]
    fn video_extensions_are_classified() {
        for ext in ["mp4", "mov", "webm"] {
            assert_eq!(MediaKind::from_extension(ext), Some(MediaKind::Video), "{ext}");
        }
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(MediaKind::from_extension("JPG"), Some(MediaKind::Photo));
        assert_eq!(MediaKind::from_extension("MoV"), Some(MediaKind::Video));
    }

    #[test]
    fn other_extensions_are_skipped() {
        for ext in ["heic", "gif", "txt", "mkv", ""] {
            assert_eq!(MediaKind::from_extension(ext), None, "{ext}");
        }
    }
}
