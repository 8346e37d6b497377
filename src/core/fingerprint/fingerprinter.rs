//! Per-file fingerprinting, run by the pipeline workers.

use super::{MediaRecord, PhotoRecord, VideoRecord};
use crate::core::hasher::fast_decode::FastDecoder;
use crate::core::hasher::{ContentHasher, HashAlgorithm, ImageHashValue};
use crate::core::probe::MediaProbe;
use crate::core::scanner::{MediaItem, MediaKind};
use crate::error::FingerprintError;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Number of frames hashed per video
pub const FRAME_SAMPLES: usize = 3;

/// Offsets (seconds) of the sampled frames for a clip of `duration` seconds.
///
/// The clip is split into thirds and each sample sits half a third before
/// the start of the next one, in whole seconds. The first offset is negative
/// for clips of six seconds or more; probes clamp it to 0.
pub fn sample_timestamps(duration: u32) -> [i64; FRAME_SAMPLES] {
    let third = i64::from(duration) / 3;
    let offset = third / 2;
    [0, 1, 2].map(|i| third * i - offset)
}

/// Produces [`MediaRecord`]s from classified files.
///
/// Shared by every worker; holds no per-file state.
pub struct Fingerprinter {
    hasher: Box<dyn HashAlgorithm>,
    probe: Arc<dyn MediaProbe>,
}

impl Fingerprinter {
    pub fn new(hasher: Box<dyn HashAlgorithm>, probe: Arc<dyn MediaProbe>) -> Self {
        Self { hasher, probe }
    }

    /// Fingerprint a file according to its kind
    pub fn fingerprint(&self, item: &MediaItem) -> Result<MediaRecord, FingerprintError> {
        match item.kind {
            MediaKind::Photo => self.fingerprint_photo(&item.path).map(MediaRecord::Photo),
            MediaKind::Video => self.fingerprint_video(&item.path).map(MediaRecord::Video),
        }
    }

    /// Read the photo once, then hash the bytes and the decoded pixels
    pub fn fingerprint_photo(&self, path: &Path) -> Result<PhotoRecord, FingerprintError> {
        let bytes = fs::read(path).map_err(|source| FingerprintError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let image = FastDecoder::decode_bytes(path, &bytes)?;
        let perceptual_hash = self.hasher.hash_image(&image)?;

        Ok(PhotoRecord {
            path: path.to_path_buf(),
            content_hash: ContentHasher::hash_bytes(&bytes),
            width: image.width(),
            height: image.height(),
            perceptual_hash,
        })
    }

    /// Probe the video, hash three sampled frames, then hash the file bytes
    pub fn fingerprint_video(&self, path: &Path) -> Result<VideoRecord, FingerprintError> {
        let info = self.probe.video_info(path)?;

        let mut frame_hashes: Vec<ImageHashValue> = Vec::with_capacity(FRAME_SAMPLES);
        let mut first_frame_size = None;

        for timestamp in sample_timestamps(info.duration_seconds) {
            // The frame is dropped at the end of each iteration, or on `?`
            let frame = self.probe.extract_frame(path, timestamp)?;
            if first_frame_size.is_none() {
                first_frame_size = Some((frame.width(), frame.height()));
            }
            frame_hashes.push(self.hasher.hash_image(&frame)?);
        }

        let frame_hashes: [ImageHashValue; FRAME_SAMPLES] =
            frame_hashes.try_into().map_err(|_| FingerprintError::Decode {
                path: path.to_path_buf(),
                reason: "wrong number of sampled frames".to_string(),
            })?;

        let (width, height) = info.resolution.or(first_frame_size).unwrap_or_default();

        tracing::debug!(
            path = %path.display(),
            duration = info.duration_seconds,
            width,
            height,
            "video fingerprinted"
        );

        Ok(VideoRecord {
            path: path.to_path_buf(),
            content_hash: ContentHasher::hash_file(path)?,
            width,
            height,
            duration_seconds: info.duration_seconds,
            frame_hashes,
        })
    }
}
