use chrono::{Duration, Utc};
use std::collections::HashMap;
use strato::cli::credentials::CredentialStore;
use strato::core::permissions::Permissions;
use tempfile::tempdir;

fn sample_permissions() -> Permissions {
    Permissions {
        max_running_instances: 2,
        allowed_instance_types: vec!["t2.micro".to_string()],
        ami_choices: HashMap::from([("ubuntu".to_string(), "ami-1".to_string())]),
    }
}

#[test]
fn test_login_round_trip() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::open_at(dir.path().to_path_buf()).unwrap();
    let expires_at = Utc::now() + Duration::minutes(30);

    store
        .save_login("alice", "tok.sig", expires_at, &sample_permissions())
        .unwrap();

    assert_eq!(store.username().as_deref(), Some("alice"));
    assert_eq!(store.token().unwrap(), "tok.sig");
    assert_eq!(
        store.expires_at().unwrap().timestamp(),
        expires_at.timestamp()
    );
    assert_eq!(store.permissions(), sample_permissions());
}

#[test]
fn test_missing_token_reports_not_logged_in() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::open_at(dir.path().to_path_buf()).unwrap();
    let err = store.token().unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
}

#[test]
fn test_expired_token_is_refused() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::open_at(dir.path().to_path_buf()).unwrap();
    store
        .save_login(
            "alice",
            "tok.sig",
            Utc::now() - Duration::minutes(1),
            &sample_permissions(),
        )
        .unwrap();

    let err = store.token().unwrap_err();
    assert!(err.to_string().contains("session has expired"));
}

#[test]
fn test_clear_removes_everything() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::open_at(dir.path().to_path_buf()).unwrap();
    store
        .save_login(
            "alice",
            "tok.sig",
            Utc::now() + Duration::minutes(30),
            &sample_permissions(),
        )
        .unwrap();

    store.clear().unwrap();
    assert!(store.username().is_none());
    assert!(store.token().is_err());
    assert_eq!(store.permissions(), Permissions::default());

    // Clearing an already-empty store is fine.
    store.clear().unwrap();
}

#[test]
fn test_unreadable_permission_snapshot_falls_back_to_default() {
    let dir = tempdir().unwrap();
    let store = CredentialStore::open_at(dir.path().to_path_buf()).unwrap();
    std::fs::write(dir.path().join("permissions.json"), "not json").unwrap();
    assert_eq!(store.permissions(), Permissions::default());
}
