//! # Hasher Module
//!
//! Computes the two fingerprints every record carries.
//!
//! - **Content hash** ([`ContentHasher`]): SHA3-512 of the raw file bytes,
//!   used for exact duplicates.
//! - **Perceptual hash** ([`HashAlgorithm`]): a fixed-width fingerprint of the
//!   decoded pixels, compared by Hamming distance for near duplicates.
//!
//! ## Perceptual Algorithms
//! - **pHash (Perceptual Hash)** - DCT based, the default
//! - **dHash (Difference Hash)** - brightness gradients
//! - **aHash (Average Hash)** - brightness against the mean
//!
//! One hasher is built per run and shared by every worker, so photos and
//! video frames are always hashed the same way.
//!
//! ## Example
//! ```rust,ignore
//! use media_dedup::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Perceptual)
//!     .hash_size(8)
//!     .build();
//!
//! let hash = hasher.hash_file(&path)?;
//! ```

mod algorithms;
mod content;
pub mod fast_decode;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use content::{ContentHash, ContentHasher};
pub use traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue, PerceptualHash};

/// Configuration builder for perceptual hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    hash_size: u32,
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults (pHash, 64 bits)
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            algorithm: HashAlgorithmKind::Perceptual,
        }
    }

    /// Set the hash side length; the hash has `size * size` bits
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn HashAlgorithm> {
        match self.algorithm {
            HashAlgorithmKind::Average => Box::new(AverageHasher::new(self.hash_size)),
            HashAlgorithmKind::Difference => Box::new(DifferenceHasher::new(self.hash_size)),
            HashAlgorithmKind::Perceptual => Box::new(PerceptualHasher::new(self.hash_size)),
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_phash() {
        let config = HasherConfig::new();
        assert_eq!(config.algorithm, HashAlgorithmKind::Perceptual);
        assert_eq!(config.hash_size, 8);
    }

    #[test]
    fn build_honours_algorithm() {
        let hasher = HasherConfig::new()
            .algorithm(HashAlgorithmKind::Average)
            .hash_size(16)
            .build();

        assert_eq!(hasher.kind(), HashAlgorithmKind::Average);
    }
}
