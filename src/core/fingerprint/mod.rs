//! # Fingerprint Module
//!
//! Turns a classified file into a record the clustering engine can compare.
//!
//! - **Photo**: content hash of the bytes, decoded width and height, and one
//!   perceptual hash of the image.
//! - **Video**: content hash of the bytes, resolution and duration from the
//!   probe, and three perceptual hashes of frames sampled across the clip
//!   (see [`sample_timestamps`]).
//!
//! A file either produces a complete record or a [`FingerprintError`]; partial
//! records never leave this module.
//!
//! [`FingerprintError`]: crate::error::FingerprintError

mod fingerprinter;

pub use fingerprinter::{sample_timestamps, Fingerprinter, FRAME_SAMPLES};

use crate::core::hasher::{ContentHash, ImageHashValue};
use crate::core::scanner::MediaKind;
use std::path::{Path, PathBuf};

/// Fingerprints of one photo
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub content_hash: ContentHash,
    pub width: u32,
    pub height: u32,
    pub perceptual_hash: ImageHashValue,
}

/// Fingerprints of one video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub path: PathBuf,
    pub content_hash: ContentHash,
    pub width: u32,
    pub height: u32,
    /// Whole seconds, as reported by the probe
    pub duration_seconds: u32,
    /// Hashes of the frames at [`sample_timestamps`], in order
    pub frame_hashes: [ImageHashValue; FRAME_SAMPLES],
}

/// A fingerprinted file of either kind
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRecord {
    Photo(PhotoRecord),
    Video(VideoRecord),
}

impl MediaRecord {
    pub fn path(&self) -> &Path {
        match self {
            MediaRecord::Photo(record) => &record.path,
            MediaRecord::Video(record) => &record.path,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaRecord::Photo(_) => MediaKind::Photo,
            MediaRecord::Video(_) => MediaKind::Video,
        }
    }
}

/// Common view over photo and video records
pub trait Fingerprinted {
    fn path(&self) -> &Path;
    fn content_hash(&self) -> &ContentHash;
    fn dimensions(&self) -> (u32, u32);
}

impl Fingerprinted for PhotoRecord {
    fn path(&self) -> &Path {
        &self.path
    }

    fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Fingerprinted for VideoRecord {
    fn path(&self) -> &Path {
        &self.path
    }

    fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
