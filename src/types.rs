//! Core value types shared by the scanner, planner and executor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded content digest identifying a file by its bytes.
///
/// Two files with identical bytes have the same identity regardless of name
/// or location. Digest collisions are treated as content equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentIdentity(String);

impl ContentIdentity {
    /// Build an identity from raw digest bytes
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    /// Full hex representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for logs and tables
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }

    /// Digest length in bits
    pub fn bits(&self) -> usize {
        self.0.len() * 4
    }
}

impl fmt::Debug for ContentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentIdentity({})", self.short())
    }
}

impl fmt::Display for ContentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
