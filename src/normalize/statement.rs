//! Statement normalization.

use std::collections::BTreeMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::PolicyError;
use crate::rules::{EquivalenceRules, WildcardPrincipal};
use crate::types::{
    ConditionBlock, NormalizedPrincipal, NormalizedStatement, PrincipalType, QualifiedOperator,
    Statement, ValueSet,
};

use super::value::{condition_values, json_type, string_set};

static ACCOUNT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{12}$").expect("account id pattern is valid"));

/// Turn one parsed statement into its order-independent form.
///
/// The `Sid` is dropped; every other field is folded into sets and ordered
/// maps. Pure: the same statement and rules always yield the same result.
pub fn normalize_statement(
    statement: &Statement,
    rules: &EquivalenceRules,
) -> Result<NormalizedStatement, PolicyError> {
    Ok(NormalizedStatement {
        effect: statement.effect,
        principal: normalize_principal(
            statement.principal.as_ref(),
            &statement.field_path("Principal"),
            rules,
        )?,
        not_principal: normalize_principal(
            statement.not_principal.as_ref(),
            &statement.field_path("NotPrincipal"),
            rules,
        )?,
        action: string_set(statement.action.as_ref(), &statement.field_path("Action"))?,
        not_action: string_set(
            statement.not_action.as_ref(),
            &statement.field_path("NotAction"),
        )?,
        resource: string_set(statement.resource.as_ref(), &statement.field_path("Resource"))?,
        not_resource: string_set(
            statement.not_resource.as_ref(),
            &statement.field_path("NotResource"),
        )?,
        condition: normalize_condition(
            statement.condition.as_ref(),
            &statement.field_path("Condition"),
        )?,
    })
}

fn normalize_principal(
    value: Option<&Value>,
    path: &str,
    rules: &EquivalenceRules,
) -> Result<Option<NormalizedPrincipal>, PolicyError> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value {
        Value::String(s) if s == "*" => Ok(Some(match rules.wildcard_principal {
            WildcardPrincipal::Distinct => NormalizedPrincipal::Any,
            WildcardPrincipal::AwsWildcard => NormalizedPrincipal::aws_wildcard(),
        })),
        Value::Object(entries) => {
            let mut map = BTreeMap::new();
            for (type_name, ids) in entries {
                let kind = PrincipalType::from_str(type_name).map_err(|_| {
                    PolicyError::unsupported(
                        path,
                        format!("principal type '{type_name}'"),
                    )
                })?;
                let mut ids = string_set(Some(ids), &format!("{path}.{type_name}"))?;
                if kind == PrincipalType::Aws && rules.expand_account_ids {
                    ids = expand_account_ids(ids);
                }
                // A type with no identifiers grants nothing.
                if !ids.is_empty() {
                    map.insert(kind, ids);
                }
            }
            Ok(Some(NormalizedPrincipal::Mapped(map)))
        }
        Value::String(s) => Err(PolicyError::malformed(
            path,
            format!("expected \"*\" or an object of principal identifiers, found string {s:?}"),
        )),
        other => Err(PolicyError::malformed(
            path,
            format!(
                "expected \"*\" or an object of principal identifiers, found {}",
                json_type(other)
            ),
        )),
    }
}

fn expand_account_ids(ids: ValueSet) -> ValueSet {
    ids.into_iter()
        .map(|id| {
            if ACCOUNT_ID.is_match(&id) {
                format!("arn:aws:iam::{id}:root")
            } else {
                id
            }
        })
        .collect()
}

fn normalize_condition(value: Option<&Value>, path: &str) -> Result<ConditionBlock, PolicyError> {
    let Some(value) = value else {
        return Ok(ConditionBlock::new());
    };
    let Value::Object(operators) = value else {
        return Err(PolicyError::malformed(
            path,
            format!("expected an object, found {}", json_type(value)),
        ));
    };

    let mut block = ConditionBlock::new();
    for (operator, body) in operators {
        QualifiedOperator::from_str(operator).map_err(|_| {
            PolicyError::unsupported(path, format!("condition operator '{operator}'"))
        })?;

        let operator_path = format!("{path}.{operator}");
        let Value::Object(keys) = body else {
            return Err(PolicyError::malformed(
                operator_path,
                format!("expected an object of condition keys, found {}", json_type(body)),
            ));
        };

        let mut normalized_keys = BTreeMap::new();
        for (key, values) in keys {
            normalized_keys.insert(
                key.clone(),
                condition_values(values, &format!("{operator_path}.{key}"))?,
            );
        }
        if !normalized_keys.is_empty() {
            block.insert(operator.clone(), normalized_keys);
        }
    }
    Ok(block)
}
