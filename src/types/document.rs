//! Parsed, not yet normalized, policy documents.

use std::collections::BTreeMap;

use serde_json::Value;

use super::effect::Effect;

/// Version assumed when a document does not carry a `Version` field.
pub const DEFAULT_POLICY_VERSION: &str = "2008-10-17";

/// A policy document as parsed. Statement order is kept but carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDocument {
    pub version: Option<String>,
    pub id: Option<String>,
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// The version used for comparison: the explicit one, or the schema default.
    pub fn effective_version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_POLICY_VERSION)
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// One statement as parsed.
///
/// Only `Sid` and `Effect` are decoded up front. The remaining fields keep
/// their raw JSON so that normalization can report exact paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sid: Option<String>,
    pub effect: Effect,
    pub principal: Option<Value>,
    pub not_principal: Option<Value>,
    pub action: Option<Value>,
    pub not_action: Option<Value>,
    pub resource: Option<Value>,
    pub not_resource: Option<Value>,
    pub condition: Option<Value>,
    pub(crate) path: String,
    /// Canonical field name to the spelling the input used, e.g. `Action` to `action`.
    pub(crate) spellings: BTreeMap<&'static str, &'static str>,
}

impl Statement {
    /// A statement with only an effect, located at `path`.
    pub fn new(effect: Effect, path: impl Into<String>) -> Self {
        Statement {
            sid: None,
            effect,
            principal: None,
            not_principal: None,
            action: None,
            not_action: None,
            resource: None,
            not_resource: None,
            condition: None,
            path: path.into(),
            spellings: BTreeMap::new(),
        }
    }

    /// JSON path of this statement within its document, e.g. `$.Statement[2]`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// JSON path of one of this statement's fields, using the spelling the
    /// input used for it.
    pub fn field_path(&self, canonical: &str) -> String {
        let spelling = self.spellings.get(canonical).copied().unwrap_or(canonical);
        format!("{}.{spelling}", self.path)
    }
}
