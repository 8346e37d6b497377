//! Average Hash (aHash) implementation.
//!
//! Each bit says whether a pixel of a `hash_size` x `hash_size` grayscale
//! thumbnail is brighter than the thumbnail's mean brightness.

use super::super::traits::{pack_bits, HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use super::grayscale_thumbnail;
use crate::error::FingerprintError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, FingerprintError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(FingerprintError::EmptyImage);
        }

        let gray = grayscale_thumbnail(image, self.hash_size, self.hash_size);
        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let mean = total / u64::from(self.hash_size * self.hash_size);

        let bits = gray.pixels().map(|p| p[0] as u64 > mean);
        Ok(ImageHashValue::new(pack_bits(bits), HashAlgorithmKind::Average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::PerceptualHash;
    use image::{ImageBuffer, Rgb};

    fn half_and_half(left_bright: bool) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(64, 64, |x, _| {
            let bright = (x < 32) == left_bright;
            if bright {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        }))
    }

    #[test]
    fn hash_has_hash_size_squared_bits() {
        let hasher = AverageHasher::new(8);
        let hash = hasher.hash_image(&half_and_half(true)).unwrap();
        assert_eq!(hash.bit_count(), 64);
    }

    #[test]
    fn inverted_image_flips_every_bit() {
        let hasher = AverageHasher::new(8);

        let a = hasher.hash_image(&half_and_half(true)).unwrap();
        let b = hasher.hash_image(&half_and_half(false)).unwrap();

        assert_eq!(a.distance(&b), 64);
    }

    #[test]
    fn empty_image_is_rejected() {
        let hasher = AverageHasher::new(8);
        let empty = DynamicImage::new_rgb8(0, 0);
        assert!(matches!(
            hasher.hash_image(&empty),
            Err(FingerprintError::EmptyImage)
        ));
    }
}
