//! # Probe Module
//!
//! Access to an external media tool for the two things video fingerprinting
//! needs: the clip's duration and decoded still frames.
//!
//! The fingerprinter only sees the [`MediaProbe`] trait, so tests can swap
//! in a fake that returns fixed durations and frames. [`FfmpegProbe`] is the
//! real implementation; every call spawns a short-lived `ffmpeg` process and
//! blocks the calling worker until it exits.

mod ffmpeg;

pub use ffmpeg::FfmpegProbe;

use crate::error::ProbeError;
use image::DynamicImage;
use std::path::Path;

/// What the probe reports about a video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    /// Length of the clip in whole seconds
    pub duration_seconds: u32,
    /// Resolution of the first video stream, when the tool reports one
    pub resolution: Option<(u32, u32)>,
}

/// Capability to inspect videos and pull frames out of them
pub trait MediaProbe: Send + Sync {
    /// Check that the tool can be run at all
    fn check_available(&self) -> Result<(), ProbeError>;

    /// Duration (and resolution) of a video
    fn video_info(&self, path: &Path) -> Result<VideoInfo, ProbeError>;

    /// Decode a single frame at `timestamp` seconds.
    ///
    /// Negative timestamps are clamped to 0.
    fn extract_frame(&self, path: &Path, timestamp: i64) -> Result<DynamicImage, ProbeError>;

    /// Duration in whole seconds
    fn duration(&self, path: &Path) -> Result<u32, ProbeError> {
        self.video_info(path).map(|info| info.duration_seconds)
    }
}
