//! # Reporter Module
//!
//! Turns the clustered pools into the report written at the end of a run.
//!
//! The JSON shape is read by external viewers and must not change:
//!
//! ```json
//! {
//!   "duplicate": [{ "compare": { "path": "", "width": 0, "height": 0 }, "withs": [""] }],
//!   "similar":   [{ "compare": { "path": "", "width": 0, "height": 0 },
//!                   "with": [{ "path": "", "width": 0, "height": 0, "distance": 0 }] }],
//!   "other":     [{ "path": "", "hash": "" }]
//! }
//! ```
//!
//! Photo entries come before video entries in every bucket, each in anchor
//! order.

mod export;

pub use export::{export_csv, write_report, ExportFormat};

use crate::core::comparator::PoolClusters;
use crate::core::fingerprint::Fingerprinted;
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The anchor of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareInfo {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// A duplicate cluster: the anchor and the paths of its copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub compare: CompareInfo,
    pub withs: Vec<String>,
}

/// A member of a similarity cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarWith {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub distance: u32,
}

/// A similarity cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarEntry {
    pub compare: CompareInfo,
    pub with: Vec<SimilarWith>,
}

/// A file that matched nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherEntry {
    pub path: String,
    /// Content hash, lowercase hex
    pub hash: String,
}

/// Final report of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub duplicate: Vec<DuplicateEntry>,
    pub similar: Vec<SimilarEntry>,
    pub other: Vec<OtherEntry>,
}

impl Report {
    /// Assemble the report from the photo pool and the video pool
    pub fn build<P, V>(photos: &PoolClusters<P>, videos: &PoolClusters<V>) -> Self
    where
        P: Fingerprinted,
        V: Fingerprinted,
    {
        let mut report = Report::default();
        report.extend(photos);
        report.extend(videos);
        report
    }

    fn extend<R: Fingerprinted>(&mut self, clusters: &PoolClusters<R>) {
        self.duplicate
            .extend(clusters.duplicates.iter().map(|cluster| DuplicateEntry {
                compare: compare_info(&cluster.anchor),
                withs: cluster.duplicates.iter().map(display_path).collect(),
            }));

        self.similar
            .extend(clusters.similar.iter().map(|cluster| SimilarEntry {
                compare: compare_info(&cluster.anchor),
                with: cluster
                    .similar
                    .iter()
                    .map(|m| {
                        let (width, height) = m.record.dimensions();
                        SimilarWith {
                            path: display_path(&m.record),
                            width,
                            height,
                            distance: m.distance,
                        }
                    })
                    .collect(),
            }));

        self.other
            .extend(clusters.leftovers.iter().map(|record| OtherEntry {
                path: display_path(record),
                hash: record.content_hash().to_string(),
            }));
    }

    pub fn is_empty(&self) -> bool {
        self.duplicate.is_empty() && self.similar.is_empty() && self.other.is_empty()
    }

    /// Number of files named anywhere in the report
    pub fn file_count(&self) -> usize {
        let duplicates: usize = self.duplicate.iter().map(|e| 1 + e.withs.len()).sum();
        let similar: usize = self.similar.iter().map(|e| 1 + e.with.len()).sum();
        duplicates + similar + self.other.len()
    }

    /// Write pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write the report to `path` as JSON, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        write_report(self, path, ExportFormat::Json)
    }
}

fn compare_info<R: Fingerprinted>(record: &R) -> CompareInfo {
    let (width, height) = record.dimensions();
    CompareInfo {
        path: display_path(record),
        width,
        height,
    }
}

fn display_path<R: Fingerprinted>(record: &R) -> String {
    record.path().to_string_lossy().into_owned()
}

pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>, ReportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::{DuplicateCluster, SimilarCluster, SimilarMatch};
    use crate::core::fingerprint::{PhotoRecord, VideoRecord};
    use crate::core::hasher::{ContentHasher, HashAlgorithmKind, ImageHashValue};
    use std::path::PathBuf;

    fn photo(path: &str, bytes: &[u8]) -> PhotoRecord {
        PhotoRecord {
            path: PathBuf::from(path),
            content_hash: ContentHasher::hash_bytes(bytes),
            width: 4032,
            height: 3024,
            perceptual_hash: ImageHashValue::new(vec![0; 8], HashAlgorithmKind::Perceptual),
        }
    }

    fn video(path: &str) -> VideoRecord {
        let frame = ImageHashValue::new(vec![0; 8], HashAlgorithmKind::Perceptual);
        VideoRecord {
            path: PathBuf::from(path),
            content_hash: ContentHasher::hash_bytes(path.as_bytes()),
            width: 1920,
            height: 1080,
            duration_seconds: 30,
            frame_hashes: [frame.clone(), frame.clone(), frame],
        }
    }

    fn sample_report() -> Report {
        let photos = PoolClusters {
            duplicates: vec![DuplicateCluster {
                anchor: photo("/p/a.jpg", b"x"),
                duplicates: vec![photo("/p/b.jpg", b"x")],
            }],
            similar: vec![SimilarCluster {
                anchor: photo("/p/c.jpg", b"c"),
                similar: vec![SimilarMatch {
                    record: photo("/p/d.jpg", b"d"),
                    distance: 3,
                }],
            }],
            leftovers: vec![photo("/p/e.jpg", b"e")],
        };
        let videos = PoolClusters {
            leftovers: vec![video("/v/clip.mp4")],
            ..PoolClusters::default()
        };
        Report::build(&photos, &videos)
    }

    #[test]
    fn json_uses_the_published_field_names() {
        let report = sample_report();
        let mut buffer = Vec::new();
        report.write_json(&mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["duplicate"][0]["compare"]["path"], "/p/a.jpg");
        assert_eq!(value["duplicate"][0]["compare"]["width"], 4032);
        assert_eq!(value["duplicate"][0]["withs"][0], "/p/b.jpg");
        assert_eq!(value["similar"][0]["with"][0]["distance"], 3);
        assert_eq!(value["similar"][0]["with"][0]["height"], 3024);
        assert_eq!(value["other"][0]["path"], "/p/e.jpg");
        assert_eq!(
            value["other"][0]["hash"],
            ContentHasher::hash_bytes(b"e").as_str()
        );
    }

    #[test]
    fn photos_come_before_videos() {
        let report = sample_report();

        let others: Vec<&str> = report.other.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(others, vec!["/p/e.jpg", "/v/clip.mp4"]);
    }

    #[test]
    fn file_count_covers_every_bucket() {
        assert_eq!(sample_report().file_count(), 6);
    }

    #[test]
    fn empty_pools_give_empty_report() {
        let report = Report::build(
            &PoolClusters::<PhotoRecord>::default(),
            &PoolClusters::<VideoRecord>::default(),
        );

        assert!(report.is_empty());
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"duplicate":[],"similar":[],"other":[]}"#);
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("duplicate.json");

        sample_report().save(&path).unwrap();

        let saved: Report =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, sample_report());
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let result = sample_report().save(Path::new("/nonexistent/dir/report.json"));
        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
