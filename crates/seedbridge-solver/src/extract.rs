//! Tolerant counterexample extraction.
//!
//! Solver output has no contractual structure. This is a best-effort
//! pattern-matching pass, not a parser: anything that does not look like a
//! `<name>: <literal>` binding is ignored, and "nothing found" is an empty
//! [`BindingSet`], a valid terminal value rather than an error.

use std::sync::OnceLock;

use num_bigint::BigUint;
use regex::Regex;
use seedbridge_types::{BindingSet, BindingValue};

/// Matches `<identifier>: 0x<hex>` or `<identifier>: <decimal>`.
/// Hex first so `0x3e6` is never consumed as the decimal literal `0`.
fn binding_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\w+)\s*:\s*(0x[0-9a-fA-F]+|[0-9]+)").expect("binding pattern is valid")
    })
}

/// Scan raw solver output for argument bindings. Never fails.
///
/// Duplicate names keep their first-seen position but take the value of the
/// last occurrence: solvers print intermediate trace lines before the final
/// counterexample block, and the last value is the authoritative witness.
/// Ordering is first-seen name order; the seed encoder reorders to the
/// target's signature.
pub fn extract(raw: &str) -> BindingSet {
    let mut set = BindingSet::new();
    for caps in binding_pattern().captures_iter(raw) {
        let name = &caps[1];
        let literal = &caps[2];
        if let Some(value) = parse_literal(literal) {
            set.insert(name, BindingValue::Uint(value));
        }
    }
    set
}

/// Cheap probe: does this output contain anything extractable at all?
/// Used by the invoker to classify a run before full extraction.
pub fn contains_bindings(raw: &str) -> bool {
    binding_pattern().is_match(raw)
}

/// Normalize a literal to its integer value, at full width. Leading zero
/// padding is immaterial; values wider than a machine word are preserved.
fn parse_literal(literal: &str) -> Option<BigUint> {
    if let Some(hex) = literal.strip_prefix("0x") {
        BigUint::parse_bytes(hex.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(literal.as_bytes(), 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(v: u64) -> BindingValue {
        BindingValue::from_u64(v)
    }

    #[test]
    fn test_extracts_each_well_formed_line() {
        let raw = "a: 0x01\nb: 42\nc: 0xdeadbeef";
        let set = extract(raw);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("a"), Some(&uint(1)));
        assert_eq!(set.get("b"), Some(&uint(42)));
        assert_eq!(set.get("c"), Some(&uint(0xdead_beef)));
    }

    #[test]
    fn test_duplicate_name_last_occurrence_wins() {
        let raw = "x: 0x3e5\ny: 10\nx: 0x3e6";
        let set = extract(raw);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("x"), Some(&uint(0x3e6)));
        assert_eq!(set.get("y"), Some(&uint(10)));
    }

    #[test]
    fn test_zero_padded_hex_normalizes() {
        let raw = "x: 0x00000000000000000000000000000000000000000000000000000000000003e5";
        let set = extract(raw);
        assert_eq!(set.get("x"), Some(&uint(0x3e5)));
    }

    #[test]
    fn test_full_width_values_survive() {
        let raw = "x: 0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let set = extract(raw);
        let BindingValue::Uint(v) = set.get("x").unwrap() else {
            panic!("expected uint binding");
        };
        assert_eq!(v.bits(), 256);
    }

    #[test]
    fn test_garbage_yields_empty_set() {
        assert!(extract("").is_empty());
        assert!(extract("Running 1 test for Vault...\n[PASS]").is_empty());
    }

    #[test]
    fn test_bindings_amid_noise() {
        let raw = "Counterexample:\n    p_amount: 0x64\nTraceback (most recent call last)";
        let set = extract(raw);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("p_amount"), Some(&uint(100)));
    }

    #[test]
    fn test_contains_bindings_probe() {
        assert!(contains_bindings("x: 0x1"));
        assert!(contains_bindings("y: 7"));
        assert!(!contains_bindings("unsat"));
    }
}
