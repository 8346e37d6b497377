//! Event type definitions for progress reporting.

use crate::core::scanner::{MediaKind, WalkSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Scan(ScanEvent),
    Fingerprint(FingerprintEvent),
    Cluster(ClusterEvent),
    Pipeline(PipelineEvent),
}

/// Events from the directory walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    Started { roots: Vec<PathBuf> },
    DirectoryEntered { path: PathBuf },
    /// A photo or video was found and will be fingerprinted
    FileFound {
        path: PathBuf,
        kind: MediaKind,
        size: u64,
    },
    /// A regular file with an unsupported extension
    Skipped { path: PathBuf },
    Completed(WalkSummary),
}

/// Events from the fingerprint workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FingerprintEvent {
    /// A worker finished a file (successfully or not)
    Progress {
        completed: usize,
        dispatched: usize,
        path: PathBuf,
    },
    /// A file was excluded; the run continues
    Failed { path: PathBuf, message: String },
    /// Every dispatched file has finished
    Completed {
        photos: usize,
        videos: usize,
        failed: usize,
    },
}

/// Events from the clustering engine, one sequence per pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterEvent {
    Started { kind: MediaKind, pool_size: usize },
    DuplicateFound {
        kind: MediaKind,
        anchor: PathBuf,
        members: usize,
    },
    SimilarFound {
        kind: MediaKind,
        anchor: PathBuf,
        members: usize,
    },
    Completed {
        kind: MediaKind,
        duplicate_clusters: usize,
        similar_clusters: usize,
        leftovers: usize,
    },
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Started,
    PhaseChanged { phase: PipelinePhase },
    Completed { summary: RunSummary },
}

/// Phases of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Fingerprinting,
    Clustering,
    Reporting,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Fingerprinting => write!(f, "Fingerprinting"),
            PipelinePhase::Clustering => write!(f, "Clustering"),
            PipelinePhase::Reporting => write!(f, "Reporting"),
        }
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub walk: WalkSummary,
    pub photos_fingerprinted: usize,
    pub videos_fingerprinted: usize,
    pub failed: usize,
    pub duplicate_clusters: usize,
    pub similar_clusters: usize,
    pub other: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Cluster(ClusterEvent::SimilarFound {
            kind: MediaKind::Video,
            anchor: PathBuf::from("/clips/a.mp4"),
            members: 2,
        });

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();

        match back {
            Event::Cluster(ClusterEvent::SimilarFound { kind, members, .. }) => {
                assert_eq!(kind, MediaKind::Video);
                assert_eq!(members, 2);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn phase_display() {
        assert_eq!(PipelinePhase::Fingerprinting.to_string(), "Fingerprinting");
    }
}
