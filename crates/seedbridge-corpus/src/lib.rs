//! Fuzzer-facing side of the bridge: encoding counterexample bindings into
//! corpus seeds, and the deduplicated injection queue the fuzzer drains.

pub mod corpus;
pub mod encode;

pub use corpus::Corpus;
pub use encode::{encode, EncodeError};
