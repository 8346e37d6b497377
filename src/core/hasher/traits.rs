//! Trait definitions for perceptual hashing.

use super::fast_decode::FastDecoder;
use crate::error::FingerprintError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Number of bits that differ between the two hashes.
    ///
    /// Both hashes must come from the same hasher. Comparing hashes of
    /// different widths means a record was built wrong and panics.
    fn distance(&self, other: &Self) -> u32;

    /// Get the raw hash bytes
    fn as_bytes(&self) -> &[u8];

    /// Get the hash as a hexadecimal string
    fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Total number of bits in this hash
    fn bit_count(&self) -> u32 {
        (self.as_bytes().len() * 8) as u32
    }
}

/// Available perceptual hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash)
    Average,
    /// Difference Hash (dHash)
    Difference,
    /// DCT-based Perceptual Hash (pHash)
    #[default]
    Perceptual,
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-decoded image (a photo or a video frame)
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, FingerprintError>;

    /// Decode a file and hash it
    fn hash_file(&self, path: &Path) -> Result<ImageHashValue, FingerprintError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// Concrete hash value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHashValue {
    bytes: Vec<u8>,
    algorithm: HashAlgorithmKind,
}

impl ImageHashValue {
    /// Create a new hash value
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Get the algorithm that produced this hash
    pub fn algorithm(&self) -> HashAlgorithmKind {
        self.algorithm
    }
}

impl PerceptualHash for ImageHashValue {
    fn distance(&self, other: &Self) -> u32 {
        assert_eq!(
            self.bytes.len(),
            other.bytes.len(),
            "perceptual hashes of different widths cannot be compared"
        );

        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Pack a row-major sequence of bits into bytes, most significant bit first.
pub(crate) fn pack_bits(bits: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (index, bit) in bits.into_iter().enumerate() {
        if index % 8 == 0 {
            bytes.push(0);
        }
        if bit {
            if let Some(last) = bytes.last_mut() {
                *last |= 1 << (7 - index % 8);
            }
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_hash(bytes: &[u8]) -> ImageHashValue {
        ImageHashValue::new(bytes.to_vec(), HashAlgorithmKind::Perceptual)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let hash = create_test_hash(&[0xFF, 0x00, 0xAA, 0x55]);
        assert_eq!(hash.distance(&hash), 0);
    }

    #[test]
    fn distance_counts_differing_bits() {
        let hash_a = create_test_hash(&[0b1111_0000, 0b1010_1010]);
        let hash_b = create_test_hash(&[0b0000_1111, 0b1111_1111]);

        assert_eq!(hash_a.distance(&hash_b), 12);
        assert_eq!(hash_b.distance(&hash_a), 12);
    }

    #[test]
    #[should_panic(expected = "different widths")]
    fn distance_between_mismatched_widths_panics() {
        let short = create_test_hash(&[0xFF]);
        let long = create_test_hash(&[0xFF, 0x00]);
        short.distance(&long);
    }

    #[test]
    fn to_hex_produces_correct_string() {
        let hash = create_test_hash(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(hash.to_hex(), "deadbeef");
        assert_eq!(hash.bit_count(), 32);
    }

    #[test]
    fn pack_bits_is_msb_first() {
        let bits = [true, false, false, false, false, false, false, true, true];
        assert_eq!(pack_bits(bits), vec![0b1000_0001, 0b1000_0000]);
    }

    #[test]
    fn algorithm_kind_defaults_to_perceptual() {
        assert_eq!(HashAlgorithmKind::default(), HashAlgorithmKind::Perceptual);
        assert_eq!(HashAlgorithmKind::Difference.to_string(), "dHash");
    }
}
