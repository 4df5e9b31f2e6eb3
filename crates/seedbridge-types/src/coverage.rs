use serde::{Deserialize, Serialize};

/// A point-in-time reading of cumulative coverage from the fuzzer.
///
/// Timestamps are fuzzer-supplied milliseconds and arrive in increasing
/// order; delivery cadence is not bounded. Samples live only inside the
/// stall detector's sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSample {
    /// Milliseconds since campaign start.
    pub timestamp_ms: u64,
    /// Cumulative edge/path count. Monotone non-decreasing.
    pub covered: u64,
}

impl CoverageSample {
    pub fn new(timestamp_ms: u64, covered: u64) -> Self {
        Self {
            timestamp_ms,
            covered,
        }
    }
}
