use std::time::Duration;

use async_trait::async_trait;
use seedbridge_types::Target;

/// Outcome classification for one solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Counterexample-shaped output was produced. Exit code is irrelevant;
    /// solver tools commonly exit non-zero on "bug found".
    Success,
    /// Clean exit, nothing to extract. The property held within bounds.
    NoCounterexample,
    /// The wall-clock deadline expired and the process was killed.
    Timeout,
    /// The process failed to spawn, or exited abnormally with no parseable
    /// output.
    CrashedProcess,
}

/// Raw result of one solver invocation. Created per call, discarded after
/// binding extraction; never persisted beyond logging.
#[derive(Debug, Clone)]
pub struct SolverRun {
    pub status: SolverStatus,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl SolverRun {
    /// A run worth retrying: the failure was environmental, not a property
    /// of the target.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.status,
            SolverStatus::Timeout | SolverStatus::CrashedProcess
        )
    }
}

/// A verification tool behind a uniform invocation surface.
///
/// `invoke` never errors at the Rust level: every failure mode is folded
/// into the returned [`SolverStatus`], so a crashing or hanging backend can
/// never abort the campaign loop. Implementations must enforce `deadline`
/// as a hard bound and reap their subprocess on every exit path.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Short identifier for logging.
    fn id(&self) -> &'static str;

    /// Run the backend against one target, bounded by `deadline`.
    async fn invoke(&self, target: &Target, deadline: Duration) -> SolverRun;
}
