use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content hash of a seed's encoded bytes, used for corpus deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Deterministic digest of the encoded bytes: same bytes, same
    /// fingerprint, always.
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Where a seed came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Derived from a formal-verification counterexample.
    Formal,
    /// Discovered by the fuzzer itself.
    Fuzz,
}

/// An encoded fuzzer input. Immutable after creation; the corpus owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    bytes: Vec<u8>,
    provenance: Provenance,
    fingerprint: Fingerprint,
}

impl Seed {
    pub fn new(bytes: Vec<u8>, provenance: Provenance) -> Self {
        let fingerprint = Fingerprint::of(&bytes);
        Self {
            bytes,
            provenance,
            fingerprint,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}
