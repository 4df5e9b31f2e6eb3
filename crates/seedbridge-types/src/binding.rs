use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::target::Target;

/// A counterexample value, kept at full width.
///
/// Solver witnesses routinely exceed machine-integer range (256-bit contract
/// arguments), so numeric values are stored as arbitrary-precision integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingValue {
    Uint(BigUint),
    Bytes(Vec<u8>),
}

impl BindingValue {
    pub fn from_u64(v: u64) -> Self {
        BindingValue::Uint(BigUint::from(v))
    }
}

/// One parameter name bound to a concrete witness value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub value: BindingValue,
}

/// An ordered collection of bindings extracted from one solver run.
///
/// Order is first-seen name order from the raw output; at most one binding
/// per name. Re-inserting a name replaces the value in place (last
/// occurrence wins), which matches solvers that print trace lines before the
/// final counterexample block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the binding for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: BindingValue) {
        let name = name.into();
        match self.bindings.iter_mut().find(|b| b.name == name) {
            Some(existing) => existing.value = value,
            None => self.bindings.push(Binding { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&BindingValue> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Whether every parameter in the target's signature is bound.
    ///
    /// Incomplete sets are diagnostic records only; they must never be
    /// encoded into a seed.
    pub fn is_complete_for(&self, target: &Target) -> bool {
        target.params.iter().all(|p| self.get(&p.name).is_some())
    }
}
