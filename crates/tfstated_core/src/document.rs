//! The state document and its content checksum.

use sha2::{Digest, Sha256};
use std::fmt;

/// Content-addressed digest of a state document.
///
/// Computed with SHA-256 over the document bytes. Deterministic: the same
/// content always yields the same checksum, so a client can detect that the
/// state it last saw is stale.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 32]);

impl Checksum {
    /// Computes the checksum of the given content.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        Self(Sha256::digest(content).into())
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Renders the digest as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.to_hex())
    }
}

/// The current state document: opaque content plus its checksum.
///
/// The content is never interpreted by this crate. An empty document is the
/// valid state of a backend that has never been written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDocument {
    /// The serialized state, verbatim.
    pub content: Vec<u8>,
    /// Checksum of `content`, recomputed on every write.
    pub checksum: Checksum,
}

impl StateDocument {
    /// Creates a document from content, computing its checksum.
    #[must_use]
    pub fn new(content: Vec<u8>) -> Self {
        let checksum = Checksum::of(&content);
        Self { content, checksum }
    }

    /// Creates the empty document of a fresh backend.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Returns true if no content has ever been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_deterministic() {
        let a = Checksum::of(b"some state");
        let b = Checksum::of(b"some state");
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn checksum_differs_per_content() {
        assert_ne!(Checksum::of(b"v1"), Checksum::of(b"v2"));
    }

    #[test]
    fn checksum_hex_is_64_chars() {
        let sum = Checksum::of(b"x");
        assert_eq!(sum.to_hex().len(), 64);
        assert_eq!(sum.to_string(), sum.to_hex());
    }

    #[test]
    fn empty_document() {
        let doc = StateDocument::empty();
        assert!(doc.is_empty());
        assert_eq!(doc.checksum, Checksum::of(b""));
    }

    #[test]
    fn document_checksum_matches_content() {
        let doc = StateDocument::new(b"{\"version\": 4}".to_vec());
        assert!(!doc.is_empty());
        assert_eq!(doc.checksum, Checksum::of(b"{\"version\": 4}"));
    }
}
