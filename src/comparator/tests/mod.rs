use super::*;
use crate::rules::WildcardPrincipal;
use crate::types::StatementPair;
use yare::parameterized;


const BUCKET_POLICY: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [
        {
            "Sid": "",
            "Effect": "Allow",
            "Principal": {"AWS": "*"},
            "Action": "s3:*",
            "Resource": [
                "arn:aws:s3:::tf-test-bucket",
                "arn:aws:s3:::tf-test-bucket/*"
            ]
        }
    ]
}"#;

// The same policy as echoed back by a read: no Sid, reordered resources,
// arrays everywhere and a different key order.
const BUCKET_POLICY_READ_BACK: &str = r#"{
    "Statement": [
        {
            "Resource": [
                "arn:aws:s3:::tf-test-bucket/*",
                "arn:aws:s3:::tf-test-bucket"
            ],
            "Action": ["s3:*"],
            "Principal": {"AWS": ["*"]},
            "Effect": "Allow"
        }
    ],
    "Version": "2012-10-17"
}"#;

const TWO_STATEMENTS: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [
        {"Sid": "Read", "Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:x/*"},
        {"Sid": "NoDelete", "Effect": "Deny", "Action": "s3:DeleteObject", "Resource": "arn:x/*"}
    ]
}"#;

const TWO_STATEMENTS_SWAPPED: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [
        {"Sid": "NoDelete", "Effect": "Deny", "Action": "s3:DeleteObject", "Resource": "arn:x/*"},
        {"Sid": "Read", "Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:x/*"}
    ]
}"#;

const WITH_CONDITION: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [{
        "Effect": "Deny",
        "Principal": "*",
        "Action": "s3:*",
        "Resource": ["arn:x", "arn:x/*"],
        "Condition": {
            "Bool": {"aws:SecureTransport": "false"},
            "ForAnyValue:StringLike": {"aws:PrincipalTag/team": ["ops", "dev*"]},
            "NumericLessThanIfExists": {"s3:max-keys": 10}
        }
    }]
}"#;

const WITH_CONDITION_REORDERED: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [{
        "Condition": {
            "NumericLessThanIfExists": {"s3:max-keys": "10"},
            "ForAnyValue:StringLike": {"aws:PrincipalTag/team": ["dev*", "ops"]},
            "Bool": {"aws:SecureTransport": false}
        },
        "Resource": ["arn:x/*", "arn:x"],
        "Action": ["s3:*"],
        "Principal": "*",
        "Effect": "Deny"
    }]
}"#;

fn comparator() -> PolicyComparator {
    PolicyComparator::default()
}

fn assert_equivalent(left: &str, right: &str) {
    let comparison = comparator().compare(left, right).unwrap();
    assert!(comparison.equivalent, "expected equivalent:\n{comparison}");
}

fn assert_not_equivalent(left: &str, right: &str) -> Comparison {
    let comparison = comparator().compare(left, right).unwrap();
    assert!(!comparison.equivalent, "expected a difference");
    comparison
}

fn single_statement(statement: &str) -> String {
    format!(r#"{{"Version": "2012-10-17", "Statement": [{statement}]}}"#)
}

#[test]
fn test_bucket_policy_matches_read_back() {
    assert_equivalent(BUCKET_POLICY, BUCKET_POLICY_READ_BACK);
}

#[test]
fn test_scalar_and_array_forms() {
    assert!(
        are_equivalent(
            r#"{"Statement":[{"Effect":"Allow","Action":"s3:GetObject","Resource":"arn:x"}]}"#,
            r#"{"Statement":[{"Effect":"Allow","Action":["s3:GetObject"],"Resource":["arn:x"]}]}"#,
        )
        .unwrap()
    );
}

#[test]
fn test_swapped_statements() {
    assert_equivalent(TWO_STATEMENTS, TWO_STATEMENTS_SWAPPED);
    let comparison = comparator()
        .compare(TWO_STATEMENTS, TWO_STATEMENTS_SWAPPED)
        .unwrap();
    assert_eq!(
        comparison.pairs,
        vec![
            StatementPair { left: 0, right: 1 },
            StatementPair { left: 1, right: 0 },
        ]
    );
}

#[test]
fn test_extra_statement_is_named() {
    let extra = r#"{
        "Version": "2012-10-17",
        "Statement": [
            {"Sid": "Read", "Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:x/*"},
            {"Sid": "NoDelete", "Effect": "Deny", "Action": "s3:DeleteObject", "Resource": "arn:x/*"},
            {"Sid": "Extra", "Effect": "Allow", "Action": "s3:PutObject", "Resource": "arn:x/*"}
        ]
    }"#;
    let comparison = assert_not_equivalent(TWO_STATEMENTS, extra);
    assert!(comparison.pairs.is_empty());
    assert_eq!(comparison.unmatched.len(), 1);

    let unmatched = &comparison.unmatched[0];
    assert_eq!(unmatched.side, Side::Right);
    assert_eq!(unmatched.index, 2);
    assert_eq!(unmatched.sid.as_deref(), Some("Extra"));
    assert!(unmatched.statement.action.contains("s3:PutObject"));

    insta::assert_snapshot!(comparison.to_string(), @r#"
    not equivalent
      only in right: statement 2 (sid "Extra"): {"Effect":"Allow","Action":["s3:PutObject"],"Resource":["arn:x/*"]}
    "#);
}

#[test]
fn test_condition_block_order_and_types() {
    assert_equivalent(WITH_CONDITION, WITH_CONDITION_REORDERED);
}

#[parameterized(
    different_effect = {
        r#"{"Effect": "Allow", "Action": "a"}"#,
        r#"{"Effect": "Deny", "Action": "a"}"#
    },
    different_action = {
        r#"{"Effect": "Allow", "Action": "s3:GetObject"}"#,
        r#"{"Effect": "Allow", "Action": "s3:getobject"}"#
    },
    action_vs_not_action = {
        r#"{"Effect": "Allow", "Action": "a"}"#,
        r#"{"Effect": "Allow", "NotAction": "a"}"#
    },
    resource_vs_not_resource = {
        r#"{"Effect": "Allow", "Resource": "r"}"#,
        r#"{"Effect": "Allow", "NotResource": "r"}"#
    },
    principal_vs_not_principal = {
        r#"{"Effect": "Allow", "Principal": {"AWS": "x"}}"#,
        r#"{"Effect": "Allow", "NotPrincipal": {"AWS": "x"}}"#
    },
    principal_absent_vs_empty = {
        r#"{"Effect": "Allow", "Action": "a"}"#,
        r#"{"Effect": "Allow", "Action": "a", "Principal": {}}"#
    },
    principal_type = {
        r#"{"Effect": "Allow", "Principal": {"AWS": "x"}}"#,
        r#"{"Effect": "Allow", "Principal": {"Service": "x"}}"#
    },
    extra_resource = {
        r#"{"Effect": "Allow", "Resource": ["r1"]}"#,
        r#"{"Effect": "Allow", "Resource": ["r1", "r2"]}"#
    },
    condition_value = {
        r#"{"Effect": "Allow", "Condition": {"StringEquals": {"k": "v1"}}}"#,
        r#"{"Effect": "Allow", "Condition": {"StringEquals": {"k": "v2"}}}"#
    },
    condition_operator = {
        r#"{"Effect": "Allow", "Condition": {"StringEquals": {"k": "v"}}}"#,
        r#"{"Effect": "Allow", "Condition": {"StringLike": {"k": "v"}}}"#
    },
    condition_vs_none = {
        r#"{"Effect": "Allow", "Action": "a", "Condition": {"Bool": {"k": true}}}"#,
        r#"{"Effect": "Allow", "Action": "a"}"#
    },
    numeric_representation = {
        r#"{"Effect": "Allow", "Condition": {"NumericEquals": {"k": 1.5}}}"#,
        r#"{"Effect": "Allow", "Condition": {"NumericEquals": {"k": "1.50"}}}"#
    },
)]
fn test_statement_differences(left: &str, right: &str) {
    let comparison = assert_not_equivalent(&single_statement(left), &single_statement(right));
    assert_eq!(comparison.unmatched_on(Side::Left).count(), 1);
    assert_eq!(comparison.unmatched_on(Side::Right).count(), 1);
}

#[parameterized(
    empty_condition = {
        r#"{"Effect": "Allow", "Action": "a"}"#,
        r#"{"Effect": "Allow", "Action": "a", "Condition": {}}"#
    },
    empty_action_list = {
        r#"{"Effect": "Allow", "Resource": "r"}"#,
        r#"{"Effect": "Allow", "Resource": "r", "Action": []}"#
    },
    duplicate_list_entries = {
        r#"{"Effect": "Allow", "Action": ["a", "a", "b"]}"#,
        r#"{"Effect": "Allow", "Action": ["b", "a"]}"#
    },
    integral_float = {
        r#"{"Effect": "Allow", "Condition": {"NumericEquals": {"k": 1}}}"#,
        r#"{"Effect": "Allow", "Condition": {"NumericEquals": {"k": 1.0}}}"#
    },
    principal_lists = {
        r#"{"Effect": "Allow", "Principal": {"AWS": ["arn:b", "arn:a"], "Service": "s"}}"#,
        r#"{"Effect": "Allow", "Principal": {"Service": ["s"], "AWS": ["arn:a", "arn:b"]}}"#
    },
    lowercase_field_names = {
        r#"{"sid": "x", "effect": "Allow", "action": "a", "notResource": "r"}"#,
        r#"{"Effect": "Allow", "Action": ["a"], "NotResource": ["r"]}"#
    },
    empty_condition_operator = {
        r#"{"Effect": "Allow", "Action": "a", "Condition": {"StringEquals": {}}}"#,
        r#"{"Effect": "Allow", "Action": "a"}"#
    },
    empty_principal_identifiers = {
        r#"{"Effect": "Allow", "Principal": {"AWS": [], "Service": "s"}}"#,
        r#"{"Effect": "Allow", "Principal": {"Service": "s"}}"#
    },
)]
fn test_statement_equivalences(left: &str, right: &str) {
    assert_equivalent(&single_statement(left), &single_statement(right));
}

#[test]
fn test_single_statement_object_equals_array() {
    assert_equivalent(
        r#"{"Statement": {"Effect": "Allow", "Action": "a"}}"#,
        r#"{"Statement": [{"Effect": "Allow", "Action": "a"}]}"#,
    );
}

#[test]
fn test_zero_statement_documents() {
    assert_equivalent("{}", r#"{"Statement": []}"#);
    let comparison = assert_not_equivalent("{}", &single_statement(r#"{"Effect": "Allow"}"#));
    assert_eq!(comparison.unmatched.len(), 1);
    assert_eq!(comparison.unmatched[0].side, Side::Right);
}

#[test]
fn test_id_is_ignored() {
    assert_equivalent(
        r#"{"Id": "one", "Statement": [{"Effect": "Allow", "Action": "a"}]}"#,
        r#"{"Id": "two", "Statement": [{"Effect": "Allow", "Action": "a"}]}"#,
    );
}

#[parameterized(
    both_absent = { "{}", "{}", true },
    absent_and_default = { "{}", r#"{"Version": "2008-10-17"}"#, true },
    both_current = { r#"{"Version": "2012-10-17"}"#, r#"{"Version": "2012-10-17"}"#, true },
    absent_and_current = { "{}", r#"{"Version": "2012-10-17"}"#, false },
    default_and_current = { r#"{"Version": "2008-10-17"}"#, r#"{"Version": "2012-10-17"}"#, false },
)]
fn test_version_handling(left: &str, right: &str, expected: bool) {
    assert_eq!(comparator().are_equivalent(left, right).unwrap(), expected);
}

#[test]
fn test_version_mismatch_reported() {
    let comparison = assert_not_equivalent("{}", r#"{"Version": "2012-10-17"}"#);
    assert_eq!(
        comparison.version,
        Some(VersionMismatch {
            left: "2008-10-17".to_string(),
            right: "2012-10-17".to_string(),
        })
    );
    assert!(comparison.unmatched.is_empty());
    insta::assert_snapshot!(comparison.to_string(), @r#"
    not equivalent
      version: "2008-10-17" vs "2012-10-17"
    "#);
}

#[test]
fn test_comparator_is_shareable_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let comparator = Arc::new(PolicyComparator::with_rules(
        EquivalenceRules::new().with_wildcard_principal(WildcardPrincipal::AwsWildcard),
    ));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let comparator = Arc::clone(&comparator);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert!(
                        comparator
                            .are_equivalent(BUCKET_POLICY, BUCKET_POLICY_READ_BACK)
                            .unwrap()
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
