//! Condition operator grammar.
//!
//! An operator name is `[ForAllValues:|ForAnyValue:]<Base>[IfExists]`, where
//! `Base` is one of [`ConditionOperator`]. `Null` never takes the `IfExists`
//! suffix.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};

/// Base condition operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum ConditionOperator {
    StringEquals,
    StringNotEquals,
    StringEqualsIgnoreCase,
    StringNotEqualsIgnoreCase,
    StringLike,
    StringNotLike,
    NumericEquals,
    NumericNotEquals,
    NumericLessThan,
    NumericLessThanEquals,
    NumericGreaterThan,
    NumericGreaterThanEquals,
    DateEquals,
    DateNotEquals,
    DateLessThan,
    DateLessThanEquals,
    DateGreaterThan,
    DateGreaterThanEquals,
    Bool,
    BinaryEquals,
    IpAddress,
    NotIpAddress,
    ArnEquals,
    ArnLike,
    ArnNotEquals,
    ArnNotLike,
    Null,
}

/// Multi-valued context key qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum SetQualifier {
    ForAllValues,
    ForAnyValue,
}

/// A fully parsed operator name such as `ForAnyValue:StringLikeIfExists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualifiedOperator {
    pub qualifier: Option<SetQualifier>,
    pub operator: ConditionOperator,
    pub if_exists: bool,
}

const IF_EXISTS: &str = "IfExists";

impl FromStr for QualifiedOperator {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (qualifier, rest) = match s.split_once(':') {
            Some((prefix, rest)) => (Some(SetQualifier::from_str(prefix)?), rest),
            None => (None, s),
        };

        if let Ok(operator) = ConditionOperator::from_str(rest) {
            return Ok(QualifiedOperator {
                qualifier,
                operator,
                if_exists: false,
            });
        }

        let base = rest
            .strip_suffix(IF_EXISTS)
            .ok_or(strum::ParseError::VariantNotFound)?;
        match ConditionOperator::from_str(base)? {
            ConditionOperator::Null => Err(strum::ParseError::VariantNotFound),
            operator => Ok(QualifiedOperator {
                qualifier,
                operator,
                if_exists: true,
            }),
        }
    }
}

impl Display for QualifiedOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(qualifier) = self.qualifier {
            write!(f, "{qualifier}:")?;
        }
        write!(f, "{}", self.operator)?;
        if self.if_exists {
            write!(f, "{IF_EXISTS}")?;
        }
        Ok(())
    }
}
