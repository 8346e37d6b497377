//! Pipeline execution implementation.

use super::pool::{FingerprintFailure, FingerprintPools, SharedPools};
use crate::config::Config;
use crate::core::comparator::ClusteringEngine;
use crate::core::fingerprint::Fingerprinter;
use crate::core::hasher::{HashAlgorithmKind, HasherConfig};
use crate::core::probe::{FfmpegProbe, MediaProbe};
use crate::core::reporter::Report;
use crate::core::scanner::{ScanConfig, WalkDirScanner, WalkSummary};
use crate::error::DedupError;
use crate::events::{
    null_sender, Event, EventSender, FingerprintEvent, PipelineEvent, PipelinePhase, RunSummary,
};
use crossbeam_channel::{bounded, Receiver};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Result of a complete run
#[derive(Debug)]
pub struct PipelineResult {
    /// The three report buckets
    pub report: Report,
    /// Files left out of the report, in discovery order
    pub failures: Vec<FingerprintFailure>,
    pub summary: RunSummary,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directories (or files) to scan
    pub roots: Vec<PathBuf>,
    /// Maximum perceptual distance for similar photos
    pub photo_threshold: u32,
    /// Maximum summed frame distance for similar videos
    pub video_threshold: u32,
    /// Maximum number of files fingerprinted at once
    pub max_workers: usize,
    /// Perceptual hash algorithm
    pub algorithm: HashAlgorithmKind,
    /// Perceptual hash side length
    pub hash_size: u32,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            photo_threshold: 5,
            video_threshold: 10,
            max_workers: 4,
            algorithm: HashAlgorithmKind::Perceptual,
            hash_size: 8,
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    probe: Option<Arc<dyn MediaProbe>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            probe: None,
        }
    }

    /// Take every setting from a loaded configuration file
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .roots(config.search.clone())
            .photo_threshold(config.photo_accept)
            .video_threshold(config.video_accept)
            .max_workers(config.queue_limit)
            .algorithm(config.hash_algorithm)
            .hash_size(config.hash_size)
            .scan_config(ScanConfig {
                follow_symlinks: config.follow_symlinks,
            })
            .probe(Arc::new(FfmpegProbe::new(config.ffmpeg.clone())))
    }

    /// Set the directories to scan
    pub fn roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.config.roots = roots;
        self
    }

    pub fn photo_threshold(mut self, threshold: u32) -> Self {
        self.config.photo_threshold = threshold;
        self
    }

    pub fn video_threshold(mut self, threshold: u32) -> Self {
        self.config.video_threshold = threshold;
        self
    }

    /// Set the worker ceiling; values below 1 are raised to 1
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = workers.max(1);
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    pub fn hash_size(mut self, size: u32) -> Self {
        self.config.hash_size = size;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Set the media probe used for videos
    pub fn probe(mut self, probe: Arc<dyn MediaProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            probe: self
                .probe
                .unwrap_or_else(|| Arc::new(FfmpegProbe::default())),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases one admission slot when the worker holding it finishes
struct AdmissionPermit<'a> {
    slots: &'a Receiver<()>,
}

impl Drop for AdmissionPermit<'_> {
    fn drop(&mut self) {
        let _ = self.slots.try_recv();
    }
}

/// The deduplication pipeline
pub struct Pipeline {
    config: PipelineConfig,
    probe: Arc<dyn MediaProbe>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, DedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, DedupError> {
        let start_time = Instant::now();
        events.send(Event::Pipeline(PipelineEvent::Started));

        let (pools, walk) = self.fingerprint(events)?;
        let FingerprintPools {
            photos,
            videos,
            failures,
        } = pools;
        let photos_fingerprinted = photos.len();
        let videos_fingerprinted = videos.len();

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Clustering,
        }));

        let engine = ClusteringEngine::new(self.config.photo_threshold, self.config.video_threshold);
        let photo_clusters = engine.cluster_photos_with_events(photos, events);
        let video_clusters = engine.cluster_videos_with_events(videos, events);

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Reporting,
        }));

        let report = Report::build(&photo_clusters, &video_clusters);

        let summary = RunSummary {
            walk,
            photos_fingerprinted,
            videos_fingerprinted,
            failed: failures.len(),
            duplicate_clusters: report.duplicate.len(),
            similar_clusters: report.similar.len(),
            other: report.other.len(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            photos = summary.photos_fingerprinted,
            videos = summary.videos_fingerprinted,
            failed = summary.failed,
            duplicate_clusters = summary.duplicate_clusters,
            similar_clusters = summary.similar_clusters,
            duration_ms = summary.duration_ms,
            "run finished"
        );
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(PipelineResult {
            report,
            failures,
            summary,
        })
    }

    /// Walk the roots and fingerprint every media file.
    ///
    /// The walker runs on the calling thread and hands each file to a pool of
    /// `max_workers` threads, blocking while that many files are in flight.
    /// Returns once every dispatched file has finished. A walk error is
    /// returned only after the files already dispatched have completed.
    pub fn fingerprint(
        &self,
        events: &EventSender,
    ) -> Result<(FingerprintPools, WalkSummary), DedupError> {
        let workers = self.config.max_workers.max(1);
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("fingerprint-{}", index))
            .build()
            .map_err(|e| DedupError::WorkerPool(e.to_string()))?;

        let hasher = HasherConfig::new()
            .algorithm(self.config.algorithm)
            .hash_size(self.config.hash_size)
            .build();
        let fingerprinter = Fingerprinter::new(hasher, Arc::clone(&self.probe));
        let scanner = WalkDirScanner::new(self.config.scan_config.clone());

        let shared = SharedPools::new();
        let (admit, slots) = bounded::<()>(workers);
        let dispatched = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let walk = thread_pool.in_place_scope(|scope| {
            let walk = scanner.visit(&self.config.roots, events, |item| {
                // Blocks while every worker is busy
                if admit.send(()).is_err() {
                    return;
                }
                dispatched.fetch_add(1, Ordering::SeqCst);

                let permit = AdmissionPermit { slots: &slots };
                let (fingerprinter, shared) = (&fingerprinter, &shared);
                let (dispatched, completed, failed) = (&dispatched, &completed, &failed);

                scope.spawn(move |_| {
                    let _permit = permit;

                    match fingerprinter.fingerprint(&item) {
                        Ok(record) => shared.append(item.sequence, record),
                        Err(error) => {
                            tracing::warn!(path = %item.path.display(), %error, "fingerprinting failed");
                            failed.fetch_add(1, Ordering::SeqCst);
                            events.send(Event::Fingerprint(FingerprintEvent::Failed {
                                path: item.path.clone(),
                                message: error.to_string(),
                            }));
                            shared.fail(
                                item.sequence,
                                FingerprintFailure {
                                    path: item.path.clone(),
                                    kind: item.kind,
                                    error: error.to_string(),
                                },
                            );
                        }
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    events.send(Event::Fingerprint(FingerprintEvent::Progress {
                        completed: done,
                        dispatched: dispatched.load(Ordering::SeqCst),
                        path: item.path,
                    }));
                });
            });

            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Fingerprinting,
            }));
            walk
        });

        let walk = walk?;
        let pools = shared.into_pools();

        events.send(Event::Fingerprint(FingerprintEvent::Completed {
            photos: pools.photos.len(),
            videos: pools.videos.len(),
            failed: failed.load(Ordering::SeqCst),
        }));

        Ok((pools, walk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::probe::VideoInfo;
    use crate::error::ProbeError;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::fs;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Probe that records how many frame extractions run at once
    #[derive(Default)]
    struct SlowProbe {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl MediaProbe for SlowProbe {
        fn check_available(&self) -> Result<(), ProbeError> {
            Ok(())
        }

        fn video_info(&self, _path: &Path) -> Result<VideoInfo, ProbeError> {
            Ok(VideoInfo {
                duration_seconds: 9,
                resolution: Some((320, 240)),
            })
        }

        fn extract_frame(&self, _path: &Path, _timestamp: i64) -> Result<DynamicImage, ProbeError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
                16,
                16,
                Rgb([10, 20, 30]),
            )))
        }
    }

    fn write_png(dir: &Path, name: &str, shade: u8) -> PathBuf {
        let path = dir.join(name);
        let image = ImageBuffer::from_fn(32, 32, |x, _| Rgb([x as u8 * shade, 0, 0]));
        DynamicImage::ImageRgb8(image)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    #[test]
    fn pipeline_builder_creates_pipeline() {
        let pipeline = Pipeline::builder()
            .roots(vec![PathBuf::from("/photos")])
            .algorithm(HashAlgorithmKind::Difference)
            .photo_threshold(8)
            .max_workers(0)
            .build();

        assert_eq!(pipeline.config().photo_threshold, 8);
        assert_eq!(pipeline.config().max_workers, 1);
    }

    #[test]
    fn builder_reads_config_file_values() {
        let mut config = Config::new(vec![PathBuf::from("/data")]);
        config.photo_accept = 2;
        config.queue_limit = 12;
        config.follow_symlinks = true;

        let pipeline = PipelineBuilder::from_config(&config).build();

        assert_eq!(pipeline.config().photo_threshold, 2);
        assert_eq!(pipeline.config().max_workers, 12);
        assert!(pipeline.config().scan_config.follow_symlinks);
    }

    #[test]
    fn pipeline_handles_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = Pipeline::builder()
            .roots(vec![temp_dir.path().to_path_buf()])
            .probe(Arc::new(SlowProbe::default()))
            .build()
            .run()
            .unwrap();

        assert!(result.report.is_empty());
        assert!(result.failures.is_empty());
        assert_eq!(result.summary.walk.directories, 1);
    }

    #[test]
    fn workers_never_exceed_the_ceiling() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..12 {
            fs::write(temp_dir.path().join(format!("clip{:02}.mp4", i)), [i as u8]).unwrap();
        }
        let probe = Arc::new(SlowProbe::default());

        let (pools, _) = Pipeline::builder()
            .roots(vec![temp_dir.path().to_path_buf()])
            .max_workers(2)
            .probe(probe.clone())
            .build()
            .fingerprint(&null_sender())
            .unwrap();

        assert_eq!(pools.videos.len(), 12);
        assert!(probe.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn pools_come_back_in_discovery_order() {
        let temp_dir = TempDir::new().unwrap();
        for (i, name) in ["d.png", "a.png", "c.png", "b.png"].iter().enumerate() {
            write_png(temp_dir.path(), name, i as u8 + 1);
        }

        let (pools, walk) = Pipeline::builder()
            .roots(vec![temp_dir.path().to_path_buf()])
            .max_workers(4)
            .probe(Arc::new(SlowProbe::default()))
            .build()
            .fingerprint(&null_sender())
            .unwrap();

        let names: Vec<_> = pools
            .photos
            .iter()
            .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png", "d.png"]);
        assert_eq!(walk.photos, 4);
    }

    #[test]
    fn run_emits_phases_in_order() {
        use crate::events::EventChannel;

        let temp_dir = TempDir::new().unwrap();
        write_png(temp_dir.path(), "a.png", 1);
        let (sender, receiver) = EventChannel::new();

        Pipeline::builder()
            .roots(vec![temp_dir.path().to_path_buf()])
            .probe(Arc::new(SlowProbe::default()))
            .build()
            .run_with_events(&sender)
            .unwrap();
        drop(sender);

        let phases: Vec<PipelinePhase> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => Some(phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                PipelinePhase::Scanning,
                PipelinePhase::Fingerprinting,
                PipelinePhase::Clustering,
                PipelinePhase::Reporting,
            ]
        );
    }
}
