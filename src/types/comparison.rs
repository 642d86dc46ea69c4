//! Comparison verdicts and diagnostics.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use strum_macros::{AsRefStr, Display as StrumDisplay};
use utoipa::ToSchema;

use super::normalized::NormalizedStatement;

/// Which of the two compared documents a diagnostic refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema, StrumDisplay, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// The effective versions of both documents, when they differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct VersionMismatch {
    pub left: String,
    pub right: String,
}

/// Indices of two statements that normalize identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatementPair {
    pub left: usize,
    pub right: usize,
}

/// A statement that has no partner on the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UnmatchedStatement {
    pub side: Side,
    /// Position in the document's statement list.
    pub index: usize,
    pub sid: Option<String>,
    #[schema(value_type = Object)]
    pub statement: NormalizedStatement,
}

impl Display for UnmatchedStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let json = self.statement.canonical_json().map_err(|_| std::fmt::Error)?;
        write!(f, "only in {}: statement {}", self.side, self.index)?;
        if let Some(sid) = &self.sid {
            write!(f, " (sid {sid:?})")?;
        }
        write!(f, ": {json}")
    }
}

/// Result of comparing two policy documents.
///
/// `pairs` is only populated when every statement found a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Comparison {
    pub equivalent: bool,
    pub version: Option<VersionMismatch>,
    pub pairs: Vec<StatementPair>,
    pub unmatched: Vec<UnmatchedStatement>,
}

impl Comparison {
    pub fn unmatched_on(&self, side: Side) -> impl Iterator<Item = &UnmatchedStatement> {
        self.unmatched.iter().filter(move |u| u.side == side)
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.equivalent {
            return write!(f, "equivalent");
        }
        write!(f, "not equivalent")?;
        if let Some(version) = &self.version {
            write!(f, "\n  version: {:?} vs {:?}", version.left, version.right)?;
        }
        for unmatched in &self.unmatched {
            write!(f, "\n  {unmatched}")?;
        }
        Ok(())
    }
}
