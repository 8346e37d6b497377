//! Perceptual Hash (pHash) implementation.
//!
//! A DCT of the downscaled image keeps the low-frequency structure, so the
//! hash survives re-encoding, rescaling and mild colour changes. This is the
//! default for both photos and sampled video frames.

use super::super::traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use crate::error::FingerprintError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// Perceptual Hash (pHash) implementation using DCT
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a new pHash hasher producing `hash_size * hash_size` bits
    pub fn new(hash_size: u32) -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }
}

impl HashAlgorithm for PerceptualHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, FingerprintError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FingerprintError::EmptyImage);
        }

        let hash = self.hasher.hash_image(image);
        Ok(ImageHashValue::new(
            hash.as_bytes().to_vec(),
            HashAlgorithmKind::Perceptual,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}
