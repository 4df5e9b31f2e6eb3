//! Subprocess invocation of the halmos-style symbolic solver.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use seedbridge_types::Target;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::backend::{SolverRun, SolverStatus, VerificationBackend};
use crate::extract;

/// Runs an external solver binary scoped to one target function.
///
/// Command shape: `<binary> [extra_args..] --scope <path> --function <name>`.
/// The deadline is enforced here as a hard wall-clock bound; the solver's
/// own timeout flags, if any, go in `extra_args`.
#[derive(Debug, Clone)]
pub struct HalmosBackend {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl HalmosBackend {
    pub fn new() -> Self {
        Self::with_binary("halmos")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
        }
    }

    /// Append a pass-through argument, placed before `--scope`.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Classify a finished process. A non-zero exit that still produced
    /// counterexample-shaped text is a success: solver tools exit non-zero
    /// on "bug found".
    fn classify(exit_ok: bool, stdout: &str) -> SolverStatus {
        if extract::contains_bindings(stdout) {
            SolverStatus::Success
        } else if exit_ok {
            SolverStatus::NoCounterexample
        } else {
            SolverStatus::CrashedProcess
        }
    }
}

impl Default for HalmosBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationBackend for HalmosBackend {
    fn id(&self) -> &'static str {
        "halmos"
    }

    async fn invoke(&self, target: &Target, deadline: Duration) -> SolverRun {
        let start = Instant::now();

        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.extra_args)
            .arg("--scope")
            .arg(&target.scope)
            .arg("--function")
            .arg(&target.function)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the output future (deadline expiry, task abort) must
            // kill and reap the child. No zombies on any exit path.
            .kill_on_drop(true);

        let result = tokio::time::timeout(deadline, cmd.output()).await;
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                let status = Self::classify(output.status.success(), &stdout);

                debug!(
                    function = %target.function,
                    ?status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "solver run finished"
                );

                SolverRun {
                    status,
                    stdout,
                    stderr,
                    elapsed,
                }
            }
            Ok(Err(e)) => {
                warn!(function = %target.function, error = %e, "solver failed to execute");
                SolverRun {
                    status: SolverStatus::CrashedProcess,
                    stdout: String::new(),
                    stderr: e.to_string(),
                    elapsed,
                }
            }
            Err(_) => {
                warn!(
                    function = %target.function,
                    deadline_ms = deadline.as_millis() as u64,
                    "solver exceeded deadline, killed"
                );
                SolverRun {
                    status: SolverStatus::Timeout,
                    stdout: String::new(),
                    stderr: String::new(),
                    elapsed,
                }
            }
        }
    }
}
