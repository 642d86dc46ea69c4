//! Principal systems and the normalized principal form.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

use super::normalized::ValueSet;

/// The principal systems a `Principal` / `NotPrincipal` map may name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
pub enum PrincipalType {
    #[strum(serialize = "AWS")]
    Aws,
    Service,
    Federated,
    CanonicalUser,
}

impl Serialize for PrincipalType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_ref())
    }
}

/// A principal after normalization.
///
/// `Any` is the bare `"*"` form. It is a different value from a map that
/// happens to contain a `"*"` identifier unless the comparator's rules say
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NormalizedPrincipal {
    Any,
    Mapped(BTreeMap<PrincipalType, ValueSet>),
}

impl NormalizedPrincipal {
    /// The `{"AWS": ["*"]}` form.
    pub fn aws_wildcard() -> Self {
        let mut map = BTreeMap::new();
        map.insert(PrincipalType::Aws, ValueSet::from(["*".to_string()]));
        NormalizedPrincipal::Mapped(map)
    }
}

impl Serialize for NormalizedPrincipal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NormalizedPrincipal::Any => serializer.serialize_str("*"),
            NormalizedPrincipal::Mapped(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (kind, ids) in map {
                    out.serialize_entry(kind, ids)?;
                }
                out.end()
            }
        }
    }
}
