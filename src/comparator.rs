use tracing::{debug, info};

use crate::error::PolicyError;
use crate::loader;
use crate::matcher::{Matching, match_statements};
use crate::normalize::normalize_statement;
use crate::rules::EquivalenceRules;
use crate::types::{
    Comparison, NormalizedStatement, PolicyDocument, Side, UnmatchedStatement, VersionMismatch,
};

/// Compares policy documents for semantic equivalence.
///
/// Stateless apart from its rules; `Copy`, and safe to share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyComparator {
    rules: EquivalenceRules,
}

impl PolicyComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: EquivalenceRules) -> Self {
        PolicyComparator { rules }
    }

    pub fn rules(&self) -> &EquivalenceRules {
        &self.rules
    }

    /// `Ok(true)` when both documents grant the same permissions, `Ok(false)`
    /// when both are valid but differ, `Err` when either cannot be read.
    pub fn are_equivalent(&self, left: &str, right: &str) -> Result<bool, PolicyError> {
        Ok(self.compare(left, right)?.equivalent)
    }

    /// Like [`are_equivalent`](Self::are_equivalent), but returns the pairing
    /// or the unmatched statements as well.
    pub fn compare(&self, left: &str, right: &str) -> Result<Comparison, PolicyError> {
        let left_doc = loader::parse_policy(left)?;
        let right_doc = loader::parse_policy(right)?;

        debug!(
            event = "Compare",
            phase = "Parsed",
            left_statements = left_doc.statements.len(),
            right_statements = right_doc.statements.len(),
            left_version = left_doc.effective_version(),
            right_version = right_doc.effective_version()
        );

        let version = (left_doc.effective_version() != right_doc.effective_version()).then(|| {
            VersionMismatch {
                left: left_doc.effective_version().to_string(),
                right: right_doc.effective_version().to_string(),
            }
        });

        let left_norm = self.normalize_document(&left_doc)?;
        let right_norm = self.normalize_document(&right_doc)?;

        debug!(event = "Compare", phase = "Normalized");

        let comparison = match match_statements(&left_norm, &right_norm) {
            Matching::Paired(pairs) => Comparison {
                equivalent: version.is_none(),
                version,
                pairs,
                unmatched: Vec::new(),
            },
            Matching::Unpaired(diff) => {
                let mut unmatched = Vec::new();
                for (side, doc, excess) in [
                    (Side::Left, &left_doc, diff.left_excess),
                    (Side::Right, &right_doc, diff.right_excess),
                ] {
                    for entry in excess {
                        for index in entry.indices {
                            unmatched.push(UnmatchedStatement {
                                side,
                                index,
                                sid: doc.statements[index].sid.clone(),
                                statement: entry.statement.clone(),
                            });
                        }
                    }
                }
                unmatched.sort_by_key(|u| (u.side, u.index));
                Comparison {
                    equivalent: false,
                    version,
                    pairs: Vec::new(),
                    unmatched,
                }
            }
        };

        debug!(event = "Compare", phase = "Result", equivalent = comparison.equivalent);
        if !comparison.equivalent {
            info!(
                event = "Compare",
                phase = "Mismatch",
                version_differs = comparison.version.is_some(),
                unmatched = comparison.unmatched.len()
            );
        }

        Ok(comparison)
    }

    fn normalize_document(
        &self,
        doc: &PolicyDocument,
    ) -> Result<Vec<NormalizedStatement>, PolicyError> {
        doc.statements
            .iter()
            .map(|statement| normalize_statement(statement, &self.rules))
            .collect()
    }
}

/// Compare two policy texts under the default rules.
///
/// ```rust
/// use policy_equivalence::are_equivalent;
/// let a = r#"{"Statement":[{"Effect":"Allow","Action":"s3:GetObject","Resource":"arn:x"}]}"#;
/// let b = r#"{"Statement":[{"Effect":"Allow","Action":["s3:GetObject"],"Resource":["arn:x"]}]}"#;
/// assert!(are_equivalent(a, b).unwrap());
/// ```
pub fn are_equivalent(left: &str, right: &str) -> Result<bool, PolicyError> {
    PolicyComparator::default().are_equivalent(left, right)
}

#[cfg(test)]
mod tests;
