use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::PolicyError;
use crate::normalize::value::json_type;
use crate::types::{Effect, PolicyDocument, Statement};

const VERSION: &[&str] = &["Version", "version"];
const ID: &[&str] = &["Id", "id"];
const STATEMENT: &[&str] = &["Statement", "statements", "statement"];
const DOCUMENT_FIELDS: &[&[&str]] = &[VERSION, ID, STATEMENT];

const SID: &[&str] = &["Sid", "sid"];
const EFFECT: &[&str] = &["Effect", "effect"];
const PRINCIPAL: &[&str] = &["Principal", "principal"];
const NOT_PRINCIPAL: &[&str] = &["NotPrincipal", "notPrincipal"];
const ACTION: &[&str] = &["Action", "action"];
const NOT_ACTION: &[&str] = &["NotAction", "notAction"];
const RESOURCE: &[&str] = &["Resource", "resource"];
const NOT_RESOURCE: &[&str] = &["NotResource", "notResource"];
const CONDITION: &[&str] = &["Condition", "condition"];
const STATEMENT_FIELDS: &[&[&str]] = &[
    SID,
    EFFECT,
    PRINCIPAL,
    NOT_PRINCIPAL,
    ACTION,
    NOT_ACTION,
    RESOURCE,
    NOT_RESOURCE,
    CONDITION,
];

/// Parse policy JSON text into a `PolicyDocument`.
///
/// JSON syntax errors and shape errors map into `PolicyError::MalformedPolicy`;
/// unknown fields map into `PolicyError::UnsupportedConstruct`.
///
/// Example:
/// ```rust
/// use policy_equivalence::parse_policy;
/// let text = r#"{
///     "Version": "2012-10-17",
///     "Statement": [{"Effect": "Allow", "Action": "s3:GetObject", "Resource": "*"}]
/// }"#;
/// let doc = parse_policy(text).unwrap();
/// assert_eq!(doc.statements.len(), 1);
/// ```
pub fn parse_policy(text: &str) -> Result<PolicyDocument, PolicyError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(object) = &value else {
        return Err(PolicyError::malformed(
            "$",
            format!("expected an object, found {}", json_type(&value)),
        ));
    };

    reject_unknown(object, DOCUMENT_FIELDS, "$")?;

    let version = optional_string(object, VERSION, "$")?;
    // Only type-checked; the id never affects equivalence.
    let id = optional_string(object, ID, "$")?;

    let statements = match spelled_field(object, STATEMENT, "$")? {
        None => Vec::new(),
        Some((spelling, Value::Array(items))) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_statement(item, format!("$.{spelling}[{i}]")))
            .collect::<Result<_, _>>()?,
        Some((spelling, single @ Value::Object(_))) => {
            vec![parse_statement(single, format!("$.{spelling}"))?]
        }
        Some((spelling, other)) => {
            return Err(PolicyError::malformed(
                format!("$.{spelling}"),
                format!(
                    "expected a statement object or an array of statements, found {}",
                    json_type(other)
                ),
            ));
        }
    };

    Ok(PolicyDocument {
        version,
        id,
        statements,
    })
}

fn parse_statement(value: &Value, path: String) -> Result<Statement, PolicyError> {
    let Value::Object(object) = value else {
        return Err(PolicyError::malformed(
            path,
            format!("expected a statement object, found {}", json_type(value)),
        ));
    };

    reject_unknown(object, STATEMENT_FIELDS, &path)?;

    let effect = match spelled_field(object, EFFECT, &path)? {
        None => {
            return Err(PolicyError::malformed(
                format!("{path}.Effect"),
                "missing required field",
            ));
        }
        Some((spelling, Value::String(s))) => Effect::from_str(s).map_err(|_| {
            PolicyError::malformed(
                format!("{path}.{spelling}"),
                format!("expected \"Allow\" or \"Deny\", found {s:?}"),
            )
        })?,
        Some((spelling, other)) => {
            return Err(PolicyError::malformed(
                format!("{path}.{spelling}"),
                format!("expected a string, found {}", json_type(other)),
            ));
        }
    };

    let mut spellings = BTreeMap::new();
    for accepted in STATEMENT_FIELDS {
        if let Some((spelling, _)) = spelled_field(object, accepted, &path)? {
            spellings.insert(accepted[0], spelling);
        }
    }

    Ok(Statement {
        sid: optional_string(object, SID, &path)?,
        effect,
        principal: field(object, PRINCIPAL, &path)?.cloned(),
        not_principal: field(object, NOT_PRINCIPAL, &path)?.cloned(),
        action: field(object, ACTION, &path)?.cloned(),
        not_action: field(object, NOT_ACTION, &path)?.cloned(),
        resource: field(object, RESOURCE, &path)?.cloned(),
        not_resource: field(object, NOT_RESOURCE, &path)?.cloned(),
        condition: field(object, CONDITION, &path)?.cloned(),
        path,
        spellings,
    })
}

fn field<'a>(
    object: &'a Map<String, Value>,
    spellings: &[&'static str],
    path: &str,
) -> Result<Option<&'a Value>, PolicyError> {
    Ok(spelled_field(object, spellings, path)?.map(|(_, value)| value))
}

/// Look a field up under any of its accepted spellings, returning the spelling
/// the input used. The first spelling is the canonical one.
fn spelled_field<'a>(
    object: &'a Map<String, Value>,
    spellings: &[&'static str],
    path: &str,
) -> Result<Option<(&'static str, &'a Value)>, PolicyError> {
    let mut found: Option<(&'static str, &'a Value)> = None;
    for spelling in spellings {
        if let Some(value) = object.get(*spelling) {
            if let Some((previous, _)) = found {
                return Err(PolicyError::malformed(
                    format!("{path}.{}", spellings[0]),
                    format!("field given as both '{previous}' and '{spelling}'"),
                ));
            }
            found = Some((*spelling, value));
        }
    }
    Ok(found)
}

fn optional_string(
    object: &Map<String, Value>,
    spellings: &[&'static str],
    path: &str,
) -> Result<Option<String>, PolicyError> {
    match spelled_field(object, spellings, path)? {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((spelling, other)) => Err(PolicyError::malformed(
            format!("{path}.{spelling}"),
            format!("expected a string, found {}", json_type(other)),
        )),
    }
}

fn reject_unknown(
    object: &Map<String, Value>,
    known: &[&[&str]],
    path: &str,
) -> Result<(), PolicyError> {
    match object
        .keys()
        .find(|key| !known.iter().any(|spellings| spellings.contains(&key.as_str())))
    {
        Some(key) => Err(PolicyError::unsupported(
            format!("{path}.{key}"),
            format!("field '{key}'"),
        )),
        None => Ok(()),
    }
}
