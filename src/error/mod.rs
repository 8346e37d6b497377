//! # Error Module
//!
//! Error types for the media deduplicator.
//!
//! ## Severity
//! - [`ScanError`] and [`ConfigError`] are fatal: the run stops and no report
//!   is written.
//! - [`FingerprintError`] (including [`ProbeError`]) is per file: the file is
//!   left out of its pool and the run continues.
//! - Clustering has no error path. A record without complete fingerprints
//!   reaching it is a bug and panics.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Media probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Could not start fingerprint workers: {0}")]
    WorkerPool(String),
}

/// Errors loading or validating the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The directory walk cannot continue. Always fatal.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Search root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A single file could not be fingerprinted
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image has no pixels")]
    EmptyImage,

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Failures reported by the external media probe
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Cannot run media probe {executable}: {source}")]
    Unavailable {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot determine duration of {path}: {reason}")]
    DurationUnavailable { path: PathBuf, reason: String },

    #[error("Cannot extract frame at {timestamp}s from {path}: {reason}")]
    FrameExtraction {
        path: PathBuf,
        timestamp: u64,
        reason: String,
    },
}

/// Errors writing the report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DedupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::RootNotFound {
            path: PathBuf::from("/media/holiday"),
        };
        assert!(error.to_string().contains("/media/holiday"));
    }

    #[test]
    fn probe_error_is_transparent_inside_fingerprint_error() {
        let error: FingerprintError = ProbeError::FrameExtraction {
            path: PathBuf::from("/clips/a.mp4"),
            timestamp: 20,
            reason: "no output".to_string(),
        }
        .into();

        let message = error.to_string();
        assert!(message.starts_with("Cannot extract frame at 20s"));
        assert!(message.contains("/clips/a.mp4"));
    }

    #[test]
    fn decode_error_includes_reason() {
        let error = FingerprintError::Decode {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn config_error_wraps_into_top_level() {
        let error: DedupError = ConfigError::Invalid("queueLimit must be at least 1".into()).into();
        assert!(error.to_string().contains("queueLimit"));
    }
}
