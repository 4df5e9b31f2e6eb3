use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use seedbridge_types::{Fingerprint, Provenance, Seed};

/// The seed corpus for one campaign.
///
/// Two invariants:
/// - fingerprint uniqueness holds for the corpus's entire lifetime, not just
///   the pending queue: a seed that was drained, injected, and later
///   reported back by the fuzzer is rejected on re-add;
/// - `try_add` and `drain` are internally synchronized, so the coordinator
///   and the fuzzer polling loop call them without external locking.
pub struct Corpus {
    inner: Mutex<CorpusInner>,
}

struct CorpusInner {
    /// Every fingerprint ever accepted, drained or not.
    seen: HashSet<Fingerprint>,
    /// Seeds accepted but not yet handed to the fuzzer.
    pending: VecDeque<Seed>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CorpusInner {
                seen: HashSet::new(),
                pending: VecDeque::new(),
            }),
        }
    }

    /// Add a seed if its fingerprint is new. Returns false for duplicates;
    /// idempotent, safe to call repeatedly with the same seed.
    pub fn try_add(&self, seed: Seed) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.seen.insert(seed.fingerprint()) {
            return false;
        }
        inner.pending.push_back(seed);
        true
    }

    /// Record a fuzz-discovered input so formal seeds dedupe against it.
    pub fn try_add_fuzz(&self, bytes: Vec<u8>) -> bool {
        self.try_add(Seed::new(bytes, Provenance::Fuzz))
    }

    /// Remove and return all not-yet-injected seeds, in add order.
    ///
    /// The returned sequence is finite; the queue refills only through new
    /// `try_add` calls.
    pub fn drain(&self) -> Vec<Seed> {
        let mut inner = self.inner.lock().unwrap();
        inner.pending.drain(..).collect()
    }

    /// Total seeds ever accepted.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seeds waiting for injection.
    pub fn pending_len(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new()
    }
}
