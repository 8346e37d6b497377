//! # Config Module
//!
//! Run configuration, read from a JSON file:
//!
//! ```json
//! {
//!   "ffmpeg": "/usr/bin/ffmpeg",
//!   "search": ["/data/photos", "/data/phone-backup"],
//!   "photoAccept": 5,
//!   "videoAccept": 10,
//!   "queueLimit": 8
//! }
//! ```
//!
//! Only `search` is required; everything else has a default.

use crate::core::hasher::HashAlgorithmKind;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for a deduplication run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path of the ffmpeg executable used to probe videos
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,
    /// Directories (or files) to scan
    pub search: Vec<PathBuf>,
    /// Maximum Hamming distance for two photos to be similar
    #[serde(default = "default_photo_accept")]
    pub photo_accept: u32,
    /// Maximum summed frame distance for two videos to be similar
    #[serde(default = "default_video_accept")]
    pub video_accept: u32,
    /// Maximum number of files fingerprinted at once
    #[serde(default = "default_queue_limit")]
    pub queue_limit: usize,
    /// Perceptual hash algorithm, shared by photos and video frames
    #[serde(default)]
    pub hash_algorithm: HashAlgorithmKind,
    /// Perceptual hash side length (bits = size * size)
    #[serde(default = "default_hash_size")]
    pub hash_size: u32,
    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Where the JSON report is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_photo_accept() -> u32 {
    5
}

fn default_video_accept() -> u32 {
    10
}

fn default_queue_limit() -> usize {
    4
}

fn default_hash_size() -> u32 {
    8
}

fn default_output() -> PathBuf {
    PathBuf::from("./duplicate.json")
}

impl Config {
    /// Create a configuration for the given roots with default settings
    pub fn new(search: Vec<PathBuf>) -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            search,
            photo_accept: default_photo_accept(),
            video_accept: default_video_accept(),
            queue_limit: default_queue_limit(),
            hash_algorithm: HashAlgorithmKind::default(),
            hash_size: default_hash_size(),
            follow_symlinks: false,
            output: default_output(),
        }
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.is_empty() {
            return Err(ConfigError::Invalid(
                "search must list at least one directory".to_string(),
            ));
        }
        if self.queue_limit == 0 {
            return Err(ConfigError::Invalid(
                "queueLimit must be at least 1".to_string(),
            ));
        }
        if !(4..=64).contains(&self.hash_size) {
            return Err(ConfigError::Invalid(format!(
                "hashSize must be between 4 and 64, got {}",
                self.hash_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_reads_camel_case_fields() {
        let file = write_config(
            r#"{
                "ffmpeg": "/opt/ffmpeg/bin/ffmpeg",
                "search": ["/data/photos"],
                "photoAccept": 3,
                "videoAccept": 12,
                "queueLimit": 16
            }"#,
        );

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.search, vec![PathBuf::from("/data/photos")]);
        assert_eq!(config.photo_accept, 3);
        assert_eq!(config.video_accept, 12);
        assert_eq!(config.queue_limit, 16);
    }

    #[test]
    fn load_fills_defaults() {
        let file = write_config(r#"{ "search": ["/data"] }"#);

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config, Config::new(vec![PathBuf::from("/data")]));
        assert_eq!(config.hash_algorithm, HashAlgorithmKind::Perceptual);
    }

    #[test]
    fn hash_algorithm_is_lowercase_in_json() {
        let file = write_config(r#"{ "search": ["/data"], "hashAlgorithm": "difference" }"#);

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.hash_algorithm, HashAlgorithmKind::Difference);
    }

    #[test]
    fn zero_queue_limit_is_rejected() {
        let file = write_config(r#"{ "search": ["/data"], "queueLimit": 0 }"#);

        let error = Config::load(file.path()).unwrap_err();

        assert!(matches!(error, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_search_is_rejected() {
        let config = Config::new(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let file = write_config("{ search: ");

        let error = Config::load(file.path()).unwrap_err();

        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let error = Config::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
    }
}
