//! Data model for policy documents and comparison results.
//!
//! Parsed forms ([`PolicyDocument`], [`Statement`]) mirror the JSON shape.
//! Normalized forms ([`NormalizedStatement`], [`NormalizedPrincipal`]) are
//! order-independent and derive `Ord`/`Hash` so they can be used as keys.

mod comparison;
mod condition;
mod document;
mod effect;
mod normalized;
mod principal;

pub use comparison::{Comparison, Side, StatementPair, UnmatchedStatement, VersionMismatch};
pub use condition::{ConditionOperator, QualifiedOperator, SetQualifier};
pub use document::{DEFAULT_POLICY_VERSION, PolicyDocument, Statement};
pub use effect::Effect;
pub use normalized::{ConditionBlock, NormalizedStatement, ValueSet};
pub use principal::{NormalizedPrincipal, PrincipalType};
