//! Directory walking implementation using walkdir.

use super::{filter::MediaFilter, MediaItem, ScanResult, WalkSummary};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: MediaFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            filter: MediaFilter::new(),
        }
    }

    /// Walk every root and hand each media file to `dispatch` as soon as it
    /// is found, in discovery order.
    ///
    /// `dispatch` may block (the pipeline uses this for back-pressure). The
    /// first walk error stops the walk and is returned; items already
    /// dispatched stay dispatched.
    pub fn visit<F>(
        &self,
        roots: &[PathBuf],
        events: &EventSender,
        mut dispatch: F,
    ) -> Result<WalkSummary, ScanError>
    where
        F: FnMut(MediaItem),
    {
        events.send(Event::Scan(ScanEvent::Started {
            roots: roots.to_vec(),
        }));

        let mut summary = WalkSummary::default();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut sequence = 0u64;

        for root in roots {
            if !root.exists() {
                return Err(ScanError::RootNotFound { path: root.clone() });
            }

            let walker = WalkDir::new(root)
                .follow_links(self.config.follow_symlinks)
                .sort_by_file_name();

            for entry in walker {
                let entry = entry.map_err(walk_error)?;
                let file_type = entry.file_type();

                if file_type.is_dir() {
                    summary.directories += 1;
                    events.send(Event::Scan(ScanEvent::DirectoryEntered {
                        path: entry.path().to_path_buf(),
                    }));
                    continue;
                }

                if !file_type.is_file() {
                    continue;
                }

                // Overlapping roots reach the same file twice, possibly
                // under differently spelled paths
                if !seen.insert(identity(entry.path())) {
                    continue;
                }

                let size = entry.metadata().map_err(walk_error)?.len();
                summary.total_bytes += size;

                let path = entry.into_path();
                let Some(kind) = self.filter.classify(&path) else {
                    summary.skipped += 1;
                    events.send(Event::Scan(ScanEvent::Skipped { path }));
                    continue;
                };

                match kind {
                    super::MediaKind::Photo => summary.photos += 1,
                    super::MediaKind::Video => summary.videos += 1,
                }

                events.send(Event::Scan(ScanEvent::FileFound {
                    path: path.clone(),
                    kind,
                    size,
                }));

                dispatch(MediaItem {
                    sequence,
                    path,
                    kind,
                    size,
                });
                sequence += 1;
            }
        }

        tracing::info!(
            directories = summary.directories,
            photos = summary.photos,
            videos = summary.videos,
            skipped = summary.skipped,
            "walk finished"
        );
        events.send(Event::Scan(ScanEvent::Completed(summary.clone())));

        Ok(summary)
    }

    /// Walk every root and collect the media files
    pub fn scan(&self, roots: &[PathBuf]) -> Result<ScanResult, ScanError> {
        let mut items = Vec::new();
        let summary = self.visit(roots, &null_sender(), |item| items.push(item))?;
        Ok(ScanResult { items, summary })
    }
}

/// Canonical form of `path`, or the path itself when it cannot be resolved
fn identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn walk_error(error: walkdir::Error) -> ScanError {
    let path = error.path().map(|p| p.to_path_buf()).unwrap_or_default();

    if error.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::Walk {
            path,
            source: error,
        }
    }
}
