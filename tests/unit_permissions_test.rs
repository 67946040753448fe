use proptest::prelude::*;
use std::collections::HashMap;
use strato::core::StratoError;
use strato::core::directory::{Directory, GroupRecord, UserRecord};
use strato::core::permissions::{PermissionGrant, Permissions};

fn user(group: Option<&str>, permissions: PermissionGrant) -> UserRecord {
    UserRecord {
        password_hash: "$argon2id$irrelevant".to_string(),
        group: group.map(str::to_string),
        permissions,
    }
}

fn group(permissions: PermissionGrant) -> GroupRecord {
    GroupRecord { permissions }
}

fn dev_grant() -> PermissionGrant {
    PermissionGrant {
        max_running_instances: Some(1),
        allowed_instance_types: Some(vec!["t2.micro".to_string()]),
        ami_choices: Some(HashMap::from([(
            "ubuntu".to_string(),
            "ami-1".to_string(),
        )])),
    }
}

fn directory(users: Vec<(&str, UserRecord)>, groups: Vec<(&str, GroupRecord)>) -> Directory {
    Directory::new(
        users
            .into_iter()
            .map(|(name, record)| (name.to_string(), record))
            .collect(),
        groups
            .into_iter()
            .map(|(name, record)| (name.to_string(), record))
            .collect(),
    )
}

#[test]
fn test_group_grant_applies_to_member_with_no_overrides() {
    let dir = directory(
        vec![("alice", user(Some("dev"), PermissionGrant::default()))],
        vec![("dev", group(dev_grant()))],
    );

    let perms = dir.effective_permissions("alice").unwrap();
    assert_eq!(perms.max_running_instances, 1);
    assert_eq!(perms.allowed_instance_types, vec!["t2.micro"]);
    assert_eq!(perms.ami_choices.get("ubuntu").unwrap(), "ami-1");
}

#[test]
fn test_user_override_replaces_field_wholesale() {
    // Bob's override of the instance types must replace the group's set
    // entirely, not union with it. Other fields still fall back to the group.
    let override_grant = PermissionGrant {
        allowed_instance_types: Some(vec!["t3.large".to_string()]),
        ..Default::default()
    };
    let dir = directory(
        vec![("bob", user(Some("dev"), override_grant))],
        vec![("dev", group(dev_grant()))],
    );

    let perms = dir.effective_permissions("bob").unwrap();
    assert_eq!(perms.allowed_instance_types, vec!["t3.large"]);
    assert!(!perms.allowed_instance_types.contains(&"t2.micro".to_string()));
    // Untouched fields inherit from the group.
    assert_eq!(perms.max_running_instances, 1);
    assert_eq!(perms.ami_choices.get("ubuntu").unwrap(), "ami-1");
}

#[test]
fn test_user_with_no_group_gets_own_overrides_over_empty_base() {
    let own_grant = PermissionGrant {
        allowed_instance_types: Some(vec!["t3.large".to_string()]),
        ..Default::default()
    };
    let dir = directory(vec![("carol", user(None, own_grant))], vec![]);

    let perms = dir.effective_permissions("carol").unwrap();
    assert_eq!(perms.allowed_instance_types, vec!["t3.large"]);
    // Absent fields sit at the most restrictive default.
    assert_eq!(perms.max_running_instances, 0);
    assert!(perms.ami_choices.is_empty());
}

#[test]
fn test_dangling_group_reference_is_treated_as_no_group() {
    let dir = directory(
        vec![("dave", user(Some("ghosts"), PermissionGrant::default()))],
        vec![],
    );

    let perms = dir.effective_permissions("dave").unwrap();
    assert_eq!(perms, Permissions::default());
}

#[test]
fn test_unknown_user_fails() {
    let dir = directory(vec![], vec![]);
    let err = dir.effective_permissions("nobody").unwrap_err();
    assert_eq!(err, StratoError::UserNotFound("nobody".to_string()));
}

#[test]
fn test_empty_grant_overlay_changes_nothing() {
    let mut base = Permissions {
        max_running_instances: 3,
        allowed_instance_types: vec!["t2.micro".to_string()],
        ami_choices: HashMap::from([("ubuntu".to_string(), "ami-1".to_string())]),
    };
    let expected = base.clone();
    PermissionGrant::default().overlay_onto(&mut base);
    assert_eq!(base, expected);
}

fn arb_grant() -> impl Strategy<Value = PermissionGrant> {
    let types = proptest::option::of(proptest::collection::vec("[a-z0-9.]{1,8}", 0..4));
    let choices = proptest::option::of(proptest::collection::hash_map(
        "[a-z]{1,6}",
        "ami-[a-f0-9]{8}",
        0..4,
    ));
    (proptest::option::of(0u32..10), types, choices).prop_map(
        |(max_running_instances, allowed_instance_types, ami_choices)| PermissionGrant {
            max_running_instances,
            allowed_instance_types,
            ami_choices,
        },
    )
}

proptest! {
    // For every field: the resolved value is the user's if present, else the
    // group's if present, else the restrictive default.
    #[test]
    fn prop_field_precedence_user_then_group_then_default(
        group_grant in arb_grant(),
        user_grant in arb_grant(),
    ) {
        let dir = directory(
            vec![("u", user(Some("g"), user_grant.clone()))],
            vec![("g", group(group_grant.clone()))],
        );
        let perms = dir.effective_permissions("u").unwrap();

        let expected_max = user_grant
            .max_running_instances
            .or(group_grant.max_running_instances)
            .unwrap_or_default();
        let expected_types = user_grant
            .allowed_instance_types
            .clone()
            .or(group_grant.allowed_instance_types.clone())
            .unwrap_or_default();
        let expected_choices = user_grant
            .ami_choices
            .clone()
            .or(group_grant.ami_choices.clone())
            .unwrap_or_default();

        prop_assert_eq!(perms.max_running_instances, expected_max);
        prop_assert_eq!(perms.allowed_instance_types, expected_types);
        prop_assert_eq!(perms.ami_choices, expected_choices);
    }
}
