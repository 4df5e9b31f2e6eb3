use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Declared type of a single function parameter.
///
/// Widths follow the contract ABI convention: every parameter occupies a
/// fixed number of whole bytes in the encoded seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint { bits: u16 },
    /// 160-bit account address.
    Address,
    /// Single-byte boolean (0 or 1).
    Bool,
    /// Fixed-length byte string.
    FixedBytes { len: u8 },
}

impl ParamType {
    pub fn bit_width(&self) -> u32 {
        match self {
            ParamType::Uint { bits } => u32::from(*bits),
            ParamType::Address => 160,
            ParamType::Bool => 8,
            ParamType::FixedBytes { len } => u32::from(*len) * 8,
        }
    }

    /// Encoded width in bytes.
    pub fn byte_width(&self) -> usize {
        (self.bit_width() as usize).div_ceil(8)
    }
}

/// One named, typed parameter in a target's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn uint(name: impl Into<String>, bits: u16) -> Self {
        Self::new(name, ParamType::Uint { bits })
    }
}

/// A function under test: contract identifier, solver scope, and signature.
///
/// Immutable once a campaign starts; the coordinator only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Contract or module identifier, used for logging and injection routing.
    pub contract: String,
    /// File or module path handed to the solver as its analysis scope.
    pub scope: PathBuf,
    /// Name of the function the solver should attack.
    pub function: String,
    /// Ordered signature. Seed encoding follows this order exactly.
    pub params: Vec<Param>,
}

impl Target {
    pub fn new(
        contract: impl Into<String>,
        scope: impl Into<PathBuf>,
        function: impl Into<String>,
        params: Vec<Param>,
    ) -> Self {
        Self {
            contract: contract.into(),
            scope: scope.into(),
            function: function.into(),
            params,
        }
    }

    /// Total encoded seed width in bytes for this signature.
    pub fn encoded_width(&self) -> usize {
        self.params.iter().map(|p| p.ty.byte_width()).sum()
    }
}
