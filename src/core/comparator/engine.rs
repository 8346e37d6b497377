//! Two-stage clustering of a fingerprinted pool.

use super::grouper::AnchorGrouper;
use super::traits::{ClusterPredicate, ContentDuplicate, PhotoSimilarity, VideoSimilarity};
use super::{DuplicateCluster, PoolClusters, SimilarCluster, SimilarMatch};
use crate::core::fingerprint::{Fingerprinted, PhotoRecord, VideoRecord};
use crate::core::scanner::MediaKind;
use crate::events::{null_sender, ClusterEvent, Event, EventSender};

/// Runs the duplicate stage and then the similarity stage over each pool.
///
/// Single-threaded; call it after every worker has finished.
#[derive(Debug, Clone)]
pub struct ClusteringEngine {
    photo_similarity: PhotoSimilarity,
    video_similarity: VideoSimilarity,
}

impl ClusteringEngine {
    pub fn new(photo_threshold: u32, video_threshold: u32) -> Self {
        Self {
            photo_similarity: PhotoSimilarity::new(photo_threshold),
            video_similarity: VideoSimilarity::new(video_threshold),
        }
    }

    pub fn cluster_photos(&self, pool: Vec<PhotoRecord>) -> PoolClusters<PhotoRecord> {
        self.cluster_photos_with_events(pool, &null_sender())
    }

    pub fn cluster_photos_with_events(
        &self,
        pool: Vec<PhotoRecord>,
        events: &EventSender,
    ) -> PoolClusters<PhotoRecord> {
        cluster_pool(
            MediaKind::Photo,
            pool,
            &ContentDuplicate,
            &self.photo_similarity,
            events,
        )
    }

    pub fn cluster_videos(&self, pool: Vec<VideoRecord>) -> PoolClusters<VideoRecord> {
        self.cluster_videos_with_events(pool, &null_sender())
    }

    pub fn cluster_videos_with_events(
        &self,
        pool: Vec<VideoRecord>,
        events: &EventSender,
    ) -> PoolClusters<VideoRecord> {
        cluster_pool(
            MediaKind::Video,
            pool,
            &ContentDuplicate,
            &self.video_similarity,
            events,
        )
    }
}

fn cluster_pool<R, D, S>(
    kind: MediaKind,
    pool: Vec<R>,
    duplicate: &D,
    similar: &S,
    events: &EventSender,
) -> PoolClusters<R>
where
    R: Fingerprinted,
    D: ClusterPredicate<R>,
    S: ClusterPredicate<R>,
{
    events.send(Event::Cluster(ClusterEvent::Started {
        kind,
        pool_size: pool.len(),
    }));

    tracing::debug!(
        %kind,
        duplicate = %duplicate.description(),
        similar = %similar.description(),
        "clustering pool"
    );

    let grouper = AnchorGrouper::new();

    let duplicate_stage = grouper.group(pool, duplicate);
    let duplicates: Vec<DuplicateCluster<R>> = duplicate_stage
        .clusters
        .into_iter()
        .map(|cluster| {
            tracing::debug!(
                anchor = %cluster.anchor.path().display(),
                members = cluster.members.len(),
                "duplicate cluster"
            );
            events.send(Event::Cluster(ClusterEvent::DuplicateFound {
                kind,
                anchor: cluster.anchor.path().to_path_buf(),
                members: cluster.members.len(),
            }));
            DuplicateCluster {
                anchor: cluster.anchor,
                duplicates: cluster.members.into_iter().map(|(r, _)| r).collect(),
            }
        })
        .collect();

    let similar_stage = grouper.group(duplicate_stage.unclaimed, similar);
    let similar: Vec<SimilarCluster<R>> = similar_stage
        .clusters
        .into_iter()
        .map(|cluster| {
            tracing::debug!(
                anchor = %cluster.anchor.path().display(),
                members = cluster.members.len(),
                "similar cluster"
            );
            events.send(Event::Cluster(ClusterEvent::SimilarFound {
                kind,
                anchor: cluster.anchor.path().to_path_buf(),
                members: cluster.members.len(),
            }));
            SimilarCluster {
                anchor: cluster.anchor,
                similar: cluster
                    .members
                    .into_iter()
                    .map(|(record, distance)| SimilarMatch { record, distance })
                    .collect(),
            }
        })
        .collect();

    let leftovers = similar_stage.unclaimed;

    tracing::info!(
        %kind,
        duplicate_clusters = duplicates.len(),
        similar_clusters = similar.len(),
        leftovers = leftovers.len(),
        "pool clustered"
    );
    events.send(Event::Cluster(ClusterEvent::Completed {
        kind,
        duplicate_clusters: duplicates.len(),
        similar_clusters: similar.len(),
        leftovers: leftovers.len(),
    }));

    PoolClusters {
        duplicates,
        similar,
        leftovers,
    }
}
