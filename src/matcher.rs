//! Multiset matching of normalized statements.
//!
//! Statement equivalence is plain equality of normalized forms, so a perfect
//! pairing exists exactly when both sides hold the same statements with the
//! same multiplicities. Grouping by the normalized statement is enough; no
//! general bipartite matching is needed.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use itertools::Itertools;

use crate::types::{NormalizedStatement, StatementPair};

/// Statements one side holds more copies of than the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excess {
    pub statement: NormalizedStatement,
    /// Number of copies without a partner.
    pub count: usize,
    /// Source indices of the unpartnered copies.
    pub indices: Vec<usize>,
}

/// Counterexample to a perfect pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementDiff {
    pub left_excess: Vec<Excess>,
    pub right_excess: Vec<Excess>,
}

impl StatementDiff {
    pub fn is_empty(&self) -> bool {
        self.left_excess.is_empty() && self.right_excess.is_empty()
    }
}

/// Outcome of matching two statement sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matching {
    /// Every statement has exactly one partner. Sorted by left index.
    Paired(Vec<StatementPair>),
    Unpaired(StatementDiff),
}

impl Matching {
    pub fn is_paired(&self) -> bool {
        matches!(self, Matching::Paired(_))
    }
}

/// Pair up `left` and `right` under equality, or report the excess on each side.
///
/// Copies of the same statement are paired in source order; when one side has
/// more copies, its trailing copies are reported as excess.
pub fn match_statements(left: &[NormalizedStatement], right: &[NormalizedStatement]) -> Matching {
    let left_groups = group_indices(left);
    let right_groups = group_indices(right);

    let mut pairs = Vec::new();
    let mut diff = StatementDiff::default();

    for key in left_groups.keys().merge(right_groups.keys()).dedup() {
        let lhs = left_groups.get(key).map(Vec::as_slice).unwrap_or_default();
        let rhs = right_groups.get(key).map(Vec::as_slice).unwrap_or_default();

        pairs.extend(
            lhs.iter()
                .zip(rhs)
                .map(|(&left, &right)| StatementPair { left, right }),
        );

        match lhs.len().cmp(&rhs.len()) {
            Ordering::Equal => {}
            Ordering::Greater => diff.left_excess.push(excess(key, &lhs[rhs.len()..])),
            Ordering::Less => diff.right_excess.push(excess(key, &rhs[lhs.len()..])),
        }
    }

    if diff.is_empty() {
        pairs.sort_by_key(|pair| pair.left);
        Matching::Paired(pairs)
    } else {
        Matching::Unpaired(diff)
    }
}

fn group_indices(statements: &[NormalizedStatement]) -> BTreeMap<&NormalizedStatement, Vec<usize>> {
    let mut groups: BTreeMap<&NormalizedStatement, Vec<usize>> = BTreeMap::new();
    for (index, statement) in statements.iter().enumerate() {
        groups.entry(statement).or_default().push(index);
    }
    groups
}

fn excess(statement: &NormalizedStatement, indices: &[usize]) -> Excess {
    Excess {
        statement: statement.clone(),
        count: indices.len(),
        indices: indices.to_vec(),
    }
}
