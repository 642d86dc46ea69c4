//! Canonicalization of values and statements.
//!
//! Everything here is a pure function of its input and the
//! [`EquivalenceRules`](crate::EquivalenceRules) in force.

pub mod statement;
pub mod value;

pub use statement::normalize_statement;
pub use value::{canonical_scalar, condition_values, string_set};
