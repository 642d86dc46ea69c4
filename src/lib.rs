//! Semantic equivalence checking for JSON access-policy documents.
//!
//! Two policy texts are equivalent when they grant the same permissions,
//! regardless of statement order, scalar-versus-array spelling, key order,
//! list order, or `Sid` values.
//!
//! ```rust
//! use policy_equivalence::are_equivalent;
//! let written = r#"{"Statement":[
//!     {"Sid":"A","Effect":"Allow","Action":"s3:GetObject","Resource":"arn:x"},
//!     {"Sid":"B","Effect":"Deny","Action":"s3:DeleteObject","Resource":"arn:x"}
//! ]}"#;
//! let read_back = r#"{"Statement":[
//!     {"Effect":"Deny","Action":["s3:DeleteObject"],"Resource":["arn:x"]},
//!     {"Effect":"Allow","Action":["s3:GetObject"],"Resource":["arn:x"]}
//! ]}"#;
//! assert!(are_equivalent(written, read_back).unwrap());
//! ```

pub use comparator::{PolicyComparator, are_equivalent};
pub use error::{CheckError, FetchError, PolicyError};
pub use loader::parse_policy;
pub use matcher::{Excess, Matching, StatementDiff, match_statements};
pub use rules::{EquivalenceRules, WildcardPrincipal};
pub use traits::PolicySource;
pub use types::{
    Comparison, ConditionBlock, ConditionOperator, DEFAULT_POLICY_VERSION, Effect,
    NormalizedPrincipal, NormalizedStatement, PolicyDocument, PrincipalType, QualifiedOperator,
    SetQualifier, Side, Statement, StatementPair, UnmatchedStatement, ValueSet, VersionMismatch,
};

pub mod harness;
pub mod normalize;

mod comparator;
mod error;
mod loader;
mod matcher;
mod rules;
mod traits;
mod types;
