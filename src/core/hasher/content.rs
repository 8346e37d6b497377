//! Content hashing: a SHA3-512 digest of a file's raw bytes.
//!
//! Equal digests are treated as byte-identical files.

use crate::error::FingerprintError;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hex encoding of a 512-bit content digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes content digests
pub struct ContentHasher;

impl ContentHasher {
    /// Hash bytes already in memory
    pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
        Self::finish(Sha3_512::digest(bytes).as_slice())
    }

    /// Stream a file through the digest without loading it whole
    pub fn hash_file(path: &Path) -> Result<ContentHash, FingerprintError> {
        let io_error = |source| FingerprintError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        let mut hasher = Sha3_512::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let read = reader.read(&mut buffer).map_err(io_error)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(Self::finish(hasher.finalize().as_slice()))
    }

    fn finish(digest: &[u8]) -> ContentHash {
        ContentHash(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }
}
