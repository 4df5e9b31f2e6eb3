//! Campaign-level bridge statistics.
//!
//! A one-way summary sink: counters accumulate inside the coordinator loop
//! and are surfaced once when the campaign ends. Nothing here feeds back
//! into scheduling decisions.

use serde::{Deserialize, Serialize};

/// Counters for one bridged campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeStats {
    /// Plateau triggers accepted by the coordinator.
    pub triggers: u64,
    /// Triggers suppressed because a solver call was already in flight.
    pub suppressed_triggers: u64,
    /// Solver runs that timed out (after the single retry).
    pub solver_timeouts: u64,
    /// Solver runs that crashed or produced nothing parseable (after retry).
    pub solver_crashes: u64,
    /// Runs where the solver proved the property within bounds.
    pub no_counterexample_runs: u64,
    /// Successful runs whose output contained no extractable bindings.
    pub empty_extractions: u64,
    /// Deterministic encoding failures (incomplete binding, type mismatch).
    pub encode_failures: u64,
    /// Seeds rejected by the corpus as already known.
    pub duplicate_seeds: u64,
    /// Fresh seeds handed to the fuzzer.
    pub seeds_injected: u64,
}

/// Finished-campaign summary, returned by the coordinator on exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub contract: String,
    pub function: String,
    pub stats: BridgeStats,
    /// Total seeds ever accepted by the corpus.
    pub corpus_size: usize,
    /// Seeds still awaiting injection at exit.
    pub pending_seeds: usize,
    /// Whether the campaign ended by external cancellation.
    pub cancelled: bool,
}
