//! Content fingerprints for module sources and synthesized harnesses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 fingerprint of a text artifact.
///
/// Two artifacts with the same `ContentHash` are assumed to be byte-identical.
/// Verdicts record the fingerprint of the harness they were produced from so
/// a reported witness can be replayed against the same text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes a content hash of UTF-8 text.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Returns the first eight hex digits, enough to tell artifacts apart in logs.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::of_text("module m; endmodule");
        let b = ContentHash::of_text("module m; endmodule");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::of_text("assign b = a;");
        let b = ContentHash::of_text("assign b = ~a;");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_full_hex() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(s.starts_with(&h.short()));
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::from_bytes(b"test");
        assert_eq!(format!("{h:?}"), format!("ContentHash({})", h.short()));
        assert_eq!(h.short().len(), 8);
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::of_text("harness");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
