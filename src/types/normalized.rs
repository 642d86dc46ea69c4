//! Order-independent statement form used for comparison.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::effect::Effect;
use super::principal::NormalizedPrincipal;

/// A set of strings; scalar and single-element list forms both land here.
pub type ValueSet = BTreeSet<String>;

/// Operator name -> condition key -> values.
pub type ConditionBlock = BTreeMap<String, BTreeMap<String, ValueSet>>;

/// A statement with every order-irrelevant field stored as a set or ordered
/// map and the `Sid` dropped.
///
/// Two statements are equivalent exactly when their normalized forms are
/// equal, so this type doubles as the canonical key for matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedStatement {
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<NormalizedPrincipal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_principal: Option<NormalizedPrincipal>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub action: ValueSet,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub not_action: ValueSet,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub resource: ValueSet,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub not_resource: ValueSet,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: ConditionBlock,
}

impl NormalizedStatement {
    /// An empty statement with the given effect.
    pub fn new(effect: Effect) -> Self {
        NormalizedStatement {
            effect,
            principal: None,
            not_principal: None,
            action: ValueSet::new(),
            not_action: ValueSet::new(),
            resource: ValueSet::new(),
            not_resource: ValueSet::new(),
            condition: ConditionBlock::new(),
        }
    }

    /// Stable single-line JSON rendering: keys in field order, set members
    /// and map keys sorted.
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
