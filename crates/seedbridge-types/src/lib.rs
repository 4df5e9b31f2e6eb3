//! Shared data model for the seedbridge hybrid engine.
//!
//! Types cross the boundary between the solver-facing side (targets,
//! counterexample bindings) and the fuzzer-facing side (seeds, coverage
//! samples). Nothing here performs I/O.

pub mod binding;
pub mod coverage;
pub mod seed;
pub mod target;

pub use binding::{Binding, BindingSet, BindingValue};
pub use coverage::CoverageSample;
pub use seed::{Fingerprint, Provenance, Seed};
pub use target::{Param, ParamType, Target};
