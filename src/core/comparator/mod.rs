//! # Comparator Module
//!
//! Clusters each fingerprinted pool into duplicates, similar files, and the
//! rest.
//!
//! ## How It Works
//! 1. **Duplicate stage**: anchor grouping over the whole pool with the
//!    content-hash predicate.
//! 2. **Similarity stage**: anchor grouping over the anchors the first stage
//!    left unmatched, with the perceptual predicate.
//! 3. Whatever the second stage leaves unmatched is reported as "other".
//!
//! Clusters are anchor-centred and not transitive (see [`AnchorGrouper`]).
//!
//! ## Predicates
//! | Pool   | Duplicate                         | Similar                                          |
//! |--------|-----------------------------------|--------------------------------------------------|
//! | Photos | equal content hash                | perceptual distance <= photo threshold           |
//! | Videos | equal content hash and duration   | equal duration, summed frame distance <= video threshold |

mod engine;
mod grouper;
mod traits;

pub use engine::ClusteringEngine;
pub use grouper::{AnchorGrouper, Cluster, Grouping};
pub use traits::{
    ClusterPredicate, ContentDuplicate, PhotoSimilarity, ThresholdStrategy, VideoSimilarity,
};

/// Byte-identical files claimed by an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCluster<R> {
    pub anchor: R,
    pub duplicates: Vec<R>,
}

/// A record claimed by a similarity anchor
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarMatch<R> {
    pub record: R,
    /// Photo: Hamming distance. Video: summed frame distances.
    pub distance: u32,
}

/// Perceptually close files claimed by an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarCluster<R> {
    pub anchor: R,
    pub similar: Vec<SimilarMatch<R>>,
}

/// Clustering result for one pool.
///
/// Every record of the pool appears exactly once across the three fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolClusters<R> {
    pub duplicates: Vec<DuplicateCluster<R>>,
    pub similar: Vec<SimilarCluster<R>>,
    pub leftovers: Vec<R>,
}

impl<R> PoolClusters<R> {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty() && self.similar.is_empty() && self.leftovers.is_empty()
    }
}

impl<R> Default for PoolClusters<R> {
    fn default() -> Self {
        Self {
            duplicates: Vec::new(),
            similar: Vec::new(),
            leftovers: Vec::new(),
        }
    }
}
