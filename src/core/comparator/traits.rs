//! Match predicates used by the clustering stages.

use crate::core::fingerprint::{Fingerprinted, PhotoRecord, VideoRecord};
use crate::core::hasher::PerceptualHash;

/// Decides whether a candidate joins an anchor's cluster
pub trait ClusterPredicate<R>: Send + Sync {
    /// `Some(distance)` when `candidate` matches `anchor`, `None` otherwise.
    ///
    /// Exact-match predicates report a distance of 0.
    fn compare(&self, anchor: &R, candidate: &R) -> Option<u32>;

    /// Human-readable description of the predicate
    fn description(&self) -> String;
}

/// Inclusive distance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStrategy {
    /// Maximum distance still considered a match
    threshold: u32,
}

impl ThresholdStrategy {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// A distance equal to the threshold is accepted
    pub fn accepts(&self, distance: u32) -> bool {
        distance <= self.threshold
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

/// Byte-identical files, by content hash.
///
/// Videos must also agree on duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDuplicate;

impl ClusterPredicate<PhotoRecord> for ContentDuplicate {
    fn compare(&self, anchor: &PhotoRecord, candidate: &PhotoRecord) -> Option<u32> {
        (anchor.content_hash() == candidate.content_hash()).then_some(0)
    }

    fn description(&self) -> String {
        "photos with identical content hashes".to_string()
    }
}

impl ClusterPredicate<VideoRecord> for ContentDuplicate {
    fn compare(&self, anchor: &VideoRecord, candidate: &VideoRecord) -> Option<u32> {
        let matches = anchor.duration_seconds == candidate.duration_seconds
            && anchor.content_hash() == candidate.content_hash();
        matches.then_some(0)
    }

    fn description(&self) -> String {
        "videos with identical content hashes".to_string()
    }
}

/// Photos whose perceptual hashes are within the threshold
#[derive(Debug, Clone, Copy)]
pub struct PhotoSimilarity {
    strategy: ThresholdStrategy,
}

impl PhotoSimilarity {
    pub fn new(threshold: u32) -> Self {
        Self {
            strategy: ThresholdStrategy::new(threshold),
        }
    }
}

impl ClusterPredicate<PhotoRecord> for PhotoSimilarity {
    fn compare(&self, anchor: &PhotoRecord, candidate: &PhotoRecord) -> Option<u32> {
        let distance = anchor.perceptual_hash.distance(&candidate.perceptual_hash);
        self.strategy.accepts(distance).then_some(distance)
    }

    fn description(&self) -> String {
        format!(
            "photos with perceptual distance <= {}",
            self.strategy.threshold()
        )
    }
}

/// Videos of equal duration whose summed frame distances are within the
/// threshold
#[derive(Debug, Clone, Copy)]
pub struct VideoSimilarity {
    strategy: ThresholdStrategy,
}

impl VideoSimilarity {
    pub fn new(threshold: u32) -> Self {
        Self {
            strategy: ThresholdStrategy::new(threshold),
        }
    }
}

impl ClusterPredicate<VideoRecord> for VideoSimilarity {
    fn compare(&self, anchor: &VideoRecord, candidate: &VideoRecord) -> Option<u32> {
        if anchor.duration_seconds != candidate.duration_seconds {
            return None;
        }

        let distance = anchor
            .frame_hashes
            .iter()
            .zip(candidate.frame_hashes.iter())
            .map(|(a, b)| a.distance(b))
            .sum();
        self.strategy.accepts(distance).then_some(distance)
    }

    fn description(&self) -> String {
        format!(
            "equal-length videos with summed frame distance <= {}",
            self.strategy.threshold()
        )
    }
}
