//! Content identity computation
//!
//! Files are streamed through an incremental digest in fixed-size blocks, so
//! memory use is bounded regardless of file size. The digest is pluggable
//! through [`ContentDigest`]; SHA-1 is the default and BLAKE3 is available.

use crate::error::{Operation, SyncError};
use crate::types::ContentIdentity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Read block size (64 KiB)
pub const BLOCK_SIZE: usize = 64 * 1024;

/// Incremental digest over a file's byte stream
pub trait ContentDigest {
    /// Feed one block of bytes
    fn update(&mut self, block: &[u8]);

    /// Consume the digest and produce the identity
    fn finalize(self) -> ContentIdentity
    where
        Self: Sized;
}

impl ContentDigest for sha1::Sha1 {
    fn update(&mut self, block: &[u8]) {
        sha1::Digest::update(self, block);
    }

    fn finalize(self) -> ContentIdentity {
        ContentIdentity::from_digest(&sha1::Digest::finalize(self))
    }
}

impl ContentDigest for blake3::Hasher {
    fn update(&mut self, block: &[u8]) {
        blake3::Hasher::update(self, block);
    }

    fn finalize(self) -> ContentIdentity {
        ContentIdentity::from_digest(blake3::Hasher::finalize(&self).as_bytes())
    }
}

/// Selectable digest algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-1, 160-bit
    #[default]
    Sha1,
    /// BLAKE3, 256-bit
    Blake3,
}

impl DigestAlgorithm {
    /// Digest length in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Blake3 => 32,
        }
    }

    /// Hash everything readable from `reader`
    pub fn hash_reader<R: Read>(&self, reader: R) -> io::Result<ContentIdentity> {
        match self {
            DigestAlgorithm::Sha1 => digest_stream(sha1::Sha1::default(), reader),
            DigestAlgorithm::Blake3 => digest_stream(blake3::Hasher::new(), reader),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => f.write_str("sha1"),
            DigestAlgorithm::Blake3 => f.write_str("blake3"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            "blake3" => Ok(DigestAlgorithm::Blake3),
            other => Err(SyncError::ConfigError(format!(
                "Unknown digest algorithm: {} (must be 'sha1' or 'blake3')",
                other
            ))),
        }
    }
}

fn digest_stream<D: ContentDigest, R: Read>(
    mut digest: D,
    mut reader: R,
) -> io::Result<ContentIdentity> {
    let mut buffer = vec![0u8; BLOCK_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        digest.update(&buffer[..read]);
    }
    Ok(digest.finalize())
}

/// Computes content identities for files
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher {
    algorithm: DigestAlgorithm,
}

impl ContentHasher {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Hash the file at `path`
    ///
    /// The file is opened read-only and closed as soon as the last block has
    /// been read. Open and read failures are returned as-is, never retried.
    pub fn hash(&self, path: &Path) -> Result<ContentIdentity, SyncError> {
        let file = File::open(path).map_err(|e| SyncError::io(Operation::Hash, path, e))?;
        self.algorithm
            .hash_reader(file)
            .map_err(|e| SyncError::io(Operation::Hash, path, e))
    }
}

/// Hash a file with the default algorithm
pub fn hash_file(path: &Path) -> Result<ContentIdentity, SyncError> {
    ContentHasher::default().hash(path)
}
