//! Solver-facing side of the bridge: bounded subprocess invocation of a
//! verification backend plus tolerant extraction of counterexample bindings
//! from its free-form output.

pub mod backend;
pub mod extract;
pub mod invoke;

pub use backend::{SolverRun, SolverStatus, VerificationBackend};
pub use extract::{contains_bindings, extract};
pub use invoke::HalmosBackend;
