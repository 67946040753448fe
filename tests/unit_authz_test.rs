use std::collections::HashMap;
use std::sync::Arc;
use strato::core::StratoError;
use strato::core::authz::{AuthorizationGate, CreateInstanceAction, DenyReason, check_static};
use strato::core::gateway::{CreateSpec, MemoryGateway, ResourceGateway, ResourceKind};
use strato::core::permissions::Permissions;

fn dev_permissions(max_running: u32) -> Permissions {
    Permissions {
        max_running_instances: max_running,
        allowed_instance_types: vec!["t2.micro".to_string(), "t2.small".to_string()],
        ami_choices: HashMap::from([
            ("ubuntu".to_string(), "ami-1".to_string()),
            ("amazon-linux".to_string(), "ami-2".to_string()),
        ]),
    }
}

fn action(instance_type: &str, ami: &str) -> CreateInstanceAction {
    CreateInstanceAction {
        instance_type: instance_type.to_string(),
        ami: ami.to_string(),
    }
}

fn instance_spec(owner: &str, name: &str) -> CreateSpec {
    CreateSpec {
        kind: ResourceKind::Instance,
        name: name.to_string(),
        owner: owner.to_string(),
        shape: Some("t2.micro".to_string()),
        image: Some("ami-1".to_string()),
        public: false,
    }
}

#[test]
fn test_alias_resolves_to_canonical_image() {
    let allowed = check_static(&dev_permissions(1), &action("t2.micro", "ubuntu")).unwrap();
    assert_eq!(allowed.canonical_image, "ami-1");
}

#[test]
fn test_canonical_image_passes_through_unchanged() {
    let allowed = check_static(&dev_permissions(1), &action("t2.micro", "ami-2")).unwrap();
    assert_eq!(allowed.canonical_image, "ami-2");
}

#[test]
fn test_alias_key_wins_when_string_is_both_key_and_value() {
    let mut permissions = dev_permissions(1);
    // "ami-2" is a value for amazon-linux AND an alias pointing elsewhere.
    permissions
        .ami_choices
        .insert("ami-2".to_string(), "ami-other".to_string());
    let allowed = check_static(&permissions, &action("t2.micro", "ami-2")).unwrap();
    assert_eq!(allowed.canonical_image, "ami-other");
}

#[test]
fn test_disallowed_shape_is_first_failing_check() {
    // The shape check runs before the image check, so a request failing both
    // reports the shape denial.
    let reason = check_static(&dev_permissions(1), &action("t3.xlarge", "no-such-image"))
        .unwrap_err();
    assert_eq!(reason, DenyReason::ShapeNotPermitted);
}

#[test]
fn test_unknown_image_is_denied() {
    let reason = check_static(&dev_permissions(1), &action("t2.micro", "ami-999")).unwrap_err();
    assert_eq!(reason, DenyReason::ImageNotPermitted);
}

#[test]
fn test_empty_permissions_deny_everything() {
    let reason = check_static(&Permissions::default(), &action("t2.micro", "ubuntu")).unwrap_err();
    assert_eq!(reason, DenyReason::ShapeNotPermitted);
}

#[tokio::test]
async fn test_limit_counts_only_running_instances_of_the_owner() {
    let gateway = Arc::new(MemoryGateway::new());

    // One running instance for alice, one stopped, plus one of bob's.
    gateway.create(instance_spec("alice", "web-1")).await.unwrap();
    let stopped = gateway.create(instance_spec("alice", "web-2")).await.unwrap();
    gateway
        .set_state(
            ResourceKind::Instance,
            &stopped.id,
            strato::core::gateway::StateChange::Stop,
        )
        .await
        .unwrap();
    gateway.create(instance_spec("bob", "db-1")).await.unwrap();

    let gate = AuthorizationGate::new(gateway);

    // Cap of 2: only the single running instance counts, so alice is allowed.
    let allowed = gate
        .authorize_create("alice", &dev_permissions(2), &action("t2.micro", "ubuntu"))
        .await
        .unwrap();
    assert_eq!(allowed.canonical_image, "ami-1");

    // Cap of 1: the running instance fills the quota.
    let err = gate
        .authorize_create("alice", &dev_permissions(1), &action("t2.micro", "ubuntu"))
        .await
        .unwrap_err();
    assert_eq!(err, StratoError::Denied(DenyReason::ConcurrentLimitExceeded));
}

#[tokio::test]
async fn test_zero_cap_denies_even_with_no_instances() {
    let gate = AuthorizationGate::new(Arc::new(MemoryGateway::new()));
    let err = gate
        .authorize_create("alice", &dev_permissions(0), &action("t2.micro", "ubuntu"))
        .await
        .unwrap_err();
    assert_eq!(err, StratoError::Denied(DenyReason::ConcurrentLimitExceeded));
}

#[tokio::test]
async fn test_static_denial_short_circuits_before_the_gateway_is_queried() {
    let gate = AuthorizationGate::new(Arc::new(MemoryGateway::new()));
    let err = gate
        .authorize_create("alice", &dev_permissions(0), &action("t3.xlarge", "ubuntu"))
        .await
        .unwrap_err();
    // Shape denial, not the limit denial the empty cap would produce.
    assert_eq!(err, StratoError::Denied(DenyReason::ShapeNotPermitted));
}

#[test]
fn test_denial_messages_are_stable() {
    assert_eq!(
        DenyReason::ShapeNotPermitted.to_string(),
        "Instance type permission denied."
    );
    assert_eq!(
        DenyReason::ImageNotPermitted.to_string(),
        "AMI choice permission denied."
    );
    assert_eq!(
        DenyReason::ConcurrentLimitExceeded.to_string(),
        "Too many running instances for the user."
    );
}
