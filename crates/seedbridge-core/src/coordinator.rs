//! The hybrid coordinator: the supervising loop between fuzzer and solver.
//!
//! Consumes coverage samples in arrival order, asks the stall detector when
//! to escalate, and runs the solver pipeline (invoke -> extract -> encode ->
//! corpus) as a spawned task so sample consumption never blocks on a
//! subprocess. At most one solver invocation is in flight per target; the
//! loop ends only when the coverage feed closes or cancellation is
//! signalled. Nothing the solver does is fatal to the campaign: a hung,
//! crashed, or garbled run degrades it to pure fuzzing.

use std::sync::Arc;
use std::time::Duration;

use seedbridge_corpus::{encode, Corpus, EncodeError};
use seedbridge_solver::{extract, SolverStatus, VerificationBackend};
use seedbridge_types::{CoverageSample, Seed, Target};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::analytics::{BridgeStats, CampaignSummary};
use crate::config::BridgeConfig;
use crate::stall::StallDetector;

/// Soft failures of one trigger's pipeline. All of these are logged and
/// counted; none of them stop the loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum PipelineError {
    #[error("solver run failed with {0:?} after one retry")]
    SolverFailed(SolverStatus),

    #[error("no counterexample within solver bounds")]
    NoCounterexample,

    #[error("solver output contained no extractable bindings")]
    NoBindings,

    /// Deterministic for the given raw output; never retried.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub struct HybridCoordinator<B> {
    backend: Arc<B>,
    corpus: Arc<Corpus>,
    config: BridgeConfig,
}

impl<B: VerificationBackend + 'static> HybridCoordinator<B> {
    pub fn new(backend: Arc<B>, corpus: Arc<Corpus>, config: BridgeConfig) -> Self {
        Self {
            backend,
            corpus,
            config,
        }
    }

    /// Supervise one target until the coverage feed closes or `shutdown`
    /// fires. `inject` hands a freshly accepted seed to the external fuzzer
    /// (fire-and-forget).
    pub async fn run<F>(
        self,
        target: Target,
        mut feed: mpsc::Receiver<CoverageSample>,
        mut inject: F,
        mut shutdown: watch::Receiver<bool>,
    ) -> CampaignSummary
    where
        F: FnMut(&Seed) + Send,
    {
        let target = Arc::new(target);
        let mut detector = StallDetector::new(&self.config);
        let mut stats = BridgeStats::default();
        let mut in_flight: Option<JoinHandle<Result<Seed, PipelineError>>> = None;
        let mut cancelled = false;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as cancellation too.
                    if changed.is_err() || *shutdown.borrow_and_update() {
                        cancelled = true;
                        break;
                    }
                }

                joined = async {
                    // Branch is disabled when nothing is in flight.
                    in_flight.as_mut().expect("in-flight branch enabled").await
                }, if in_flight.is_some() => {
                    in_flight = None;
                    self.settle(joined, &mut stats, &mut inject);
                }

                maybe_sample = feed.recv() => {
                    let Some(sample) = maybe_sample else {
                        // Feed closed: the campaign is over. Let an
                        // in-flight pipeline finish so its seed is not lost.
                        if let Some(handle) = in_flight.take() {
                            let joined = handle.await;
                            self.settle(joined, &mut stats, &mut inject);
                        }
                        break;
                    };

                    detector.observe(sample);
                    if detector.should_trigger() {
                        if in_flight.is_some() {
                            // Cooldown expired before the solver returned;
                            // still at most one subprocess per target.
                            stats.suppressed_triggers += 1;
                            debug!(function = %target.function, "trigger suppressed, solver in flight");
                        } else {
                            stats.triggers += 1;
                            info!(
                                function = %target.function,
                                covered = sample.covered,
                                "coverage plateau, escalating to solver"
                            );
                            let backend = Arc::clone(&self.backend);
                            let target = Arc::clone(&target);
                            let deadline = Duration::from_secs(self.config.solver_timeout_secs);
                            in_flight = Some(tokio::spawn(async move {
                                run_pipeline(backend, target, deadline).await
                            }));
                        }
                    }
                }
            }
        }

        if let Some(handle) = in_flight {
            // Aborting the task drops the subprocess future, which kills
            // and reaps the child.
            handle.abort();
        }

        CampaignSummary {
            contract: target.contract.clone(),
            function: target.function.clone(),
            stats,
            corpus_size: self.corpus.len(),
            pending_seeds: self.corpus.pending_len(),
            cancelled,
        }
    }

    /// Fold one finished pipeline into the corpus and the stats.
    fn settle<F>(
        &self,
        joined: Result<Result<Seed, PipelineError>, JoinError>,
        stats: &mut BridgeStats,
        inject: &mut F,
    ) where
        F: FnMut(&Seed) + Send,
    {
        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "solver pipeline task failed");
                return;
            }
        };

        match result {
            Ok(seed) => {
                if self.corpus.try_add(seed.clone()) {
                    stats.seeds_injected += 1;
                    info!(fingerprint = %seed.fingerprint(), "injecting formal seed");
                    inject(&seed);
                } else {
                    // Duplicate seed is a no-op signal, not an error.
                    stats.duplicate_seeds += 1;
                    debug!(fingerprint = %seed.fingerprint(), "duplicate seed, skipped");
                }
            }
            Err(e) => {
                match &e {
                    PipelineError::SolverFailed(SolverStatus::Timeout) => {
                        stats.solver_timeouts += 1;
                    }
                    PipelineError::SolverFailed(_) => stats.solver_crashes += 1,
                    PipelineError::NoCounterexample => stats.no_counterexample_runs += 1,
                    PipelineError::NoBindings => stats.empty_extractions += 1,
                    PipelineError::Encode(_) => stats.encode_failures += 1,
                }
                debug!(error = %e, "pipeline produced no seed");
            }
        }
    }
}

/// One trigger's worth of work: invoke the solver (retrying environmental
/// failures exactly once), extract bindings, encode the seed.
async fn run_pipeline<B: VerificationBackend>(
    backend: Arc<B>,
    target: Arc<Target>,
    deadline: Duration,
) -> Result<Seed, PipelineError> {
    let mut run = backend.invoke(&target, deadline).await;
    if run.is_retryable() {
        warn!(
            backend = backend.id(),
            status = ?run.status,
            "solver run failed, retrying once"
        );
        run = backend.invoke(&target, deadline).await;
    }

    match run.status {
        SolverStatus::Success => {
            let bindings = extract(&run.stdout);
            if bindings.is_empty() {
                return Err(PipelineError::NoBindings);
            }
            // Incomplete binding sets surface here as diagnostics; they are
            // never injected and never retried.
            Ok(encode(&target, &bindings)?)
        }
        SolverStatus::NoCounterexample => Err(PipelineError::NoCounterexample),
        status => Err(PipelineError::SolverFailed(status)),
    }
}
