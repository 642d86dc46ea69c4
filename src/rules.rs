//! Equivalence rules that are specific to a policy system.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// How a bare `"*"` principal relates to the explicit `{"AWS": "*"}` form.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WildcardPrincipal {
    /// `"*"` only equals `"*"`.
    #[default]
    Distinct,
    /// `"*"` is shorthand for `{"AWS": ["*"]}`.
    AwsWildcard,
}

/// Rules the normalizer applies on top of the structural ones.
///
/// The defaults compare strictly. Deserializes from a partial object, e.g.
/// `{"wildcard_principal": "aws_wildcard"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EquivalenceRules {
    pub wildcard_principal: WildcardPrincipal,
    /// Rewrite bare 12-digit account ids in `AWS` principals to
    /// `arn:aws:iam::<id>:root`.
    pub expand_account_ids: bool,
}

impl EquivalenceRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules a provider applies when it stores a policy: `"*"` reads back
    /// as `{"AWS": ["*"]}` and bare account ids read back as root ARNs.
    pub fn provider_compatible() -> Self {
        Self {
            wildcard_principal: WildcardPrincipal::AwsWildcard,
            expand_account_ids: true,
        }
    }

    pub fn with_wildcard_principal(mut self, wildcard_principal: WildcardPrincipal) -> Self {
        self.wildcard_principal = wildcard_principal;
        self
    }

    pub fn with_account_id_expansion(mut self, enabled: bool) -> Self {
        self.expand_account_ids = enabled;
        self
    }
}
