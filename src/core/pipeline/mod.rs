//! # Pipeline Module
//!
//! Orchestrates a complete run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Walk the roots and classify files (single thread)
//! 2. **Fingerprint** - Hash each file on a bounded worker pool, fed by the
//!    walker as files are found
//! 3. **Cluster** - Group each pool into duplicates, similar files, and the
//!    rest, once every worker has finished
//! 4. **Report** - Assemble the three report buckets
//!
//! ## Parallelism
//! Uses a rayon thread pool sized to `max_workers`. A bounded
//! crossbeam channel acts as the admission gate, so the walker stalls
//! instead of queueing an unbounded number of files.

mod executor;
mod pool;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
pub use pool::{FingerprintFailure, FingerprintPools, MediaPool, SharedPools};
