//! [`MediaProbe`] backed by the `ffmpeg` command-line tool.
//!
//! - Duration and resolution come from the banner `ffmpeg -i <file>` prints
//!   to stderr (`Duration: 00:01:05.12` and the `Video:` stream line).
//! - Frames are written by `ffmpeg -ss <t> -i <file> -frames:v 1 <png>` into
//!   a fresh temporary directory per call, decoded, and the directory is
//!   removed when the call returns, whatever the outcome.

use super::{MediaProbe, VideoInfo};
use crate::error::ProbeError;
use image::DynamicImage;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;
use tempfile::TempDir;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration:\s*(\d+):(\d{2}):(\d{2})").expect("duration pattern is valid")
});

static RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2,5})x(\d{2,5})\b").expect("resolution pattern is valid"));

/// Probe that shells out to ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegProbe {
    executable: PathBuf,
    scratch_dir: Option<PathBuf>,
}

impl FfmpegProbe {
    /// Use the given ffmpeg executable (a bare name is looked up on `PATH`)
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            scratch_dir: None,
        }
    }

    /// Create frame scratch directories under `dir` instead of the system
    /// temp directory
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn scratch(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("media-dedup-frame-");
        match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }

    fn run(&self, command: &mut Command) -> std::io::Result<Output> {
        tracing::debug!(?command, "running media probe");
        command.output()
    }
}

impl Default for FfmpegProbe {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl MediaProbe for FfmpegProbe {
    fn check_available(&self) -> Result<(), ProbeError> {
        let unavailable = |source| ProbeError::Unavailable {
            executable: self.executable.clone(),
            source,
        };

        let output = self
            .run(Command::new(&self.executable).arg("-version"))
            .map_err(unavailable)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(unavailable(std::io::Error::other(format!(
                "exited with {}",
                output.status
            ))))
        }
    }

    fn video_info(&self, path: &Path) -> Result<VideoInfo, ProbeError> {
        // Without an output file ffmpeg exits non-zero; the banner is still printed.
        let output = self
            .run(
                Command::new(&self.executable)
                    .arg("-hide_banner")
                    .arg("-i")
                    .arg(path),
            )
            .map_err(|e| ProbeError::DurationUnavailable {
                path: path.to_path_buf(),
                reason: format!("failed to run {}: {}", self.executable.display(), e),
            })?;

        let banner = String::from_utf8_lossy(&output.stderr);
        let duration_seconds =
            parse_duration(&banner).ok_or_else(|| ProbeError::DurationUnavailable {
                path: path.to_path_buf(),
                reason: "no duration in probe output".to_string(),
            })?;

        Ok(VideoInfo {
            duration_seconds,
            resolution: parse_resolution(&banner),
        })
    }

    fn extract_frame(&self, path: &Path, timestamp: i64) -> Result<DynamicImage, ProbeError> {
        let seconds = timestamp.max(0) as u64;
        let failure = |reason: String| ProbeError::FrameExtraction {
            path: path.to_path_buf(),
            timestamp: seconds,
            reason,
        };

        let scratch = self
            .scratch()
            .map_err(|e| failure(format!("cannot create scratch directory: {}", e)))?;
        let frame_path = scratch.path().join("frame.png");

        let output = self
            .run(
                Command::new(&self.executable)
                    .args(["-v", "error", "-y", "-ss", &seconds.to_string(), "-i"])
                    .arg(path)
                    .args(["-frames:v", "1"])
                    .arg(&frame_path),
            )
            .map_err(|e| failure(format!("failed to run {}: {}", self.executable.display(), e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if !frame_path.exists() {
            return Err(failure("no frame was written".to_string()));
        }

        image::open(&frame_path).map_err(|e| failure(format!("cannot decode frame: {}", e)))
    }
}

/// Whole seconds from the first `Duration: HH:MM:SS` in ffmpeg's banner
fn parse_duration(banner: &str) -> Option<u32> {
    let captures = DURATION.captures(banner)?;
    let field = |index: usize| captures.get(index)?.as_str().parse::<u32>().ok();

    field(1)?
        .checked_mul(3600)?
        .checked_add(field(2)? * 60)?
        .checked_add(field(3)?)
}

/// `WxH` from the first `Video:` stream line
fn parse_resolution(banner: &str) -> Option<(u32, u32)> {
    banner
        .lines()
        .filter(|line| line.contains("Video:"))
        .find_map(|line| {
            let captures = RESOLUTION.captures(line)?;
            let width = captures.get(1)?.as_str().parse().ok()?;
            let height = captures.get(2)?.as_str().parse().ok()?;
            Some((width, height))
        })
}
