//! Shared collections the fingerprint workers append to.

use crate::core::fingerprint::{MediaRecord, PhotoRecord, VideoRecord};
use crate::core::scanner::MediaKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Append-only collection filled concurrently by workers.
///
/// Each entry carries the discovery sequence of its file so the pool can be
/// put back into discovery order once every worker is done. The lock is held
/// only for the push.
#[derive(Debug)]
pub struct MediaPool<T> {
    entries: Mutex<Vec<(u64, T)>>,
}

impl<T> MediaPool<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn append(&self, sequence: u64, entry: T) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((sequence, entry));
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the pool, returning entries in discovery order
    pub fn into_sorted(self) -> Vec<T> {
        let mut entries = self
            .entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        entries.sort_by_key(|(sequence, _)| *sequence);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }
}

impl<T> Default for MediaPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A file that could not be fingerprinted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintFailure {
    pub path: PathBuf,
    pub kind: MediaKind,
    /// Rendered error message
    pub error: String,
}

/// Photo and video pools plus the failure list of one run
#[derive(Debug, Default)]
pub struct SharedPools {
    photos: MediaPool<PhotoRecord>,
    videos: MediaPool<VideoRecord>,
    failures: MediaPool<FingerprintFailure>,
}

impl SharedPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a record to the pool of its kind
    pub fn append(&self, sequence: u64, record: MediaRecord) {
        match record {
            MediaRecord::Photo(photo) => self.photos.append(sequence, photo),
            MediaRecord::Video(video) => self.videos.append(sequence, video),
        }
    }

    pub fn fail(&self, sequence: u64, failure: FingerprintFailure) {
        self.failures.append(sequence, failure);
    }

    pub fn into_pools(self) -> FingerprintPools {
        FingerprintPools {
            photos: self.photos.into_sorted(),
            videos: self.videos.into_sorted(),
            failures: self.failures.into_sorted(),
        }
    }
}

/// Everything the fingerprint phase produced, in discovery order
#[derive(Debug, Clone, Default)]
pub struct FingerprintPools {
    pub photos: Vec<PhotoRecord>,
    pub videos: Vec<VideoRecord>,
    pub failures: Vec<FingerprintFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_appends_are_all_kept() {
        let pool = Arc::new(MediaPool::new());

        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        pool.append(worker * 100 + i, worker * 100 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let pool = Arc::try_unwrap(pool).unwrap();
        assert_eq!(pool.len(), 800);
        let entries = pool.into_sorted();
        assert_eq!(entries, (0..800u64).collect::<Vec<_>>());
    }

    #[test]
    fn completion_order_does_not_leak_into_results() {
        let pool = MediaPool::new();
        pool.append(2, "c");
        pool.append(0, "a");
        pool.append(1, "b");

        assert_eq!(pool.into_sorted(), vec!["a", "b", "c"]);
    }

    #[test]
    fn failures_are_kept_apart_from_records() {
        let pools = SharedPools::new();
        pools.fail(
            0,
            FingerprintFailure {
                path: PathBuf::from("/broken.jpg"),
                kind: MediaKind::Photo,
                error: "bad".to_string(),
            },
        );

        let pools = pools.into_pools();

        assert!(pools.photos.is_empty());
        assert!(pools.videos.is_empty());
        assert_eq!(pools.failures.len(), 1);
    }
}
