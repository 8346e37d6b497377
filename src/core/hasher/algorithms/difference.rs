//! Difference Hash (dHash) implementation.
//!
//! The image is shrunk to `(hash_size + 1)` x `hash_size` and each bit
//! records whether a pixel is brighter than its right-hand neighbour, which
//! captures the brightness gradient rather than absolute levels.

use super::super::traits::{pack_bits, HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::grayscale_thumbnail;
use crate::error::FingerprintError;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
pub struct DifferenceHasher {
    hash_size: u32,
}

impl DifferenceHasher {
    /// Create a new dHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, FingerprintError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FingerprintError::EmptyImage);
        }

        let size = self.hash_size;
        let gray = grayscale_thumbnail(image, size + 1, size);

        let bits = (0..size).flat_map(|y| {
            let gray = &gray;
            (0..size).map(move |x| gray.get_pixel(x, y)[0] > gray.get_pixel(x + 1, y)[0])
        });

        Ok(ImageHashValue::new(pack_bits(bits), HashAlgorithmKind::Difference))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}
