use strato::core::StratoError;
use strato::core::gateway::{
    CreateSpec, MemoryGateway, ResourceGateway, ResourceKind, ResourceState, StateChange,
};

fn spec(kind: ResourceKind, owner: &str, name: &str) -> CreateSpec {
    CreateSpec {
        kind,
        name: name.to_string(),
        owner: owner.to_string(),
        shape: (kind == ResourceKind::Instance).then(|| "t2.micro".to_string()),
        image: (kind == ResourceKind::Instance).then(|| "ami-1".to_string()),
        public: false,
    }
}

#[tokio::test]
async fn test_instance_create_yields_id_and_public_ip() {
    let gateway = MemoryGateway::new();
    let created = gateway
        .create(spec(ResourceKind::Instance, "alice", "web-1"))
        .await
        .unwrap();

    assert!(created.id.starts_with("i-"));
    let address = created.address.unwrap();
    assert!(address.starts_with("54."));

    let listed = gateway
        .list(ResourceKind::Instance, Some("alice"), None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].state, ResourceState::Running);
    assert_eq!(listed[0].name, "web-1");
}

#[tokio::test]
async fn test_bucket_id_is_its_name_and_names_are_globally_unique() {
    let gateway = MemoryGateway::new();
    let created = gateway
        .create(spec(ResourceKind::Bucket, "alice", "assets"))
        .await
        .unwrap();
    assert_eq!(created.id, "assets");

    // Even a different owner cannot reuse the name.
    let err = gateway
        .create(spec(ResourceKind::Bucket, "bob", "assets"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StratoError::Conflict("Bucket assets already exists".to_string())
    );
}

#[tokio::test]
async fn test_list_filters_by_owner_and_state() {
    let gateway = MemoryGateway::new();
    let a1 = gateway
        .create(spec(ResourceKind::Instance, "alice", "web-1"))
        .await
        .unwrap();
    gateway
        .create(spec(ResourceKind::Instance, "alice", "web-2"))
        .await
        .unwrap();
    gateway
        .create(spec(ResourceKind::Instance, "bob", "db-1"))
        .await
        .unwrap();
    gateway
        .set_state(ResourceKind::Instance, &a1.id, StateChange::Stop)
        .await
        .unwrap();

    let all_alice = gateway
        .list(ResourceKind::Instance, Some("alice"), None)
        .await
        .unwrap();
    assert_eq!(all_alice.len(), 2);

    let running_alice = gateway
        .list(ResourceKind::Instance, Some("alice"), Some(ResourceState::Running))
        .await
        .unwrap();
    assert_eq!(running_alice.len(), 1);
    assert_eq!(running_alice[0].name, "web-2");

    let everyone = gateway.list(ResourceKind::Instance, None, None).await.unwrap();
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn test_list_enumerates_in_creation_order() {
    let gateway = MemoryGateway::new();
    for name in ["a", "b", "c", "d"] {
        gateway
            .create(spec(ResourceKind::Instance, "alice", name))
            .await
            .unwrap();
    }
    let names: Vec<String> = gateway
        .list(ResourceKind::Instance, Some("alice"), None)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_state_transitions_are_validated() {
    let gateway = MemoryGateway::new();
    let created = gateway
        .create(spec(ResourceKind::Instance, "alice", "web-1"))
        .await
        .unwrap();

    // Starting a running instance is rejected.
    let err = gateway
        .set_state(ResourceKind::Instance, &created.id, StateChange::Start)
        .await
        .unwrap_err();
    assert!(matches!(err, StratoError::Upstream(_)));

    gateway
        .set_state(ResourceKind::Instance, &created.id, StateChange::Stop)
        .await
        .unwrap();
    gateway
        .set_state(ResourceKind::Instance, &created.id, StateChange::Start)
        .await
        .unwrap();

    let listed = gateway
        .list(ResourceKind::Instance, Some("alice"), None)
        .await
        .unwrap();
    assert_eq!(listed[0].state, ResourceState::Running);
}

#[tokio::test]
async fn test_terminated_instances_stay_listed() {
    let gateway = MemoryGateway::new();
    let created = gateway
        .create(spec(ResourceKind::Instance, "alice", "web-1"))
        .await
        .unwrap();
    gateway
        .delete(ResourceKind::Instance, &created.id)
        .await
        .unwrap();

    let listed = gateway
        .list(ResourceKind::Instance, Some("alice"), None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].state, ResourceState::Terminated);

    // And no longer count as running.
    let running = gateway
        .list(ResourceKind::Instance, Some("alice"), Some(ResourceState::Running))
        .await
        .unwrap();
    assert!(running.is_empty());
}

#[tokio::test]
async fn test_bucket_and_zone_deletion_removes_the_record() {
    let gateway = MemoryGateway::new();
    let bucket = gateway
        .create(spec(ResourceKind::Bucket, "alice", "assets"))
        .await
        .unwrap();
    let zone = gateway
        .create(spec(ResourceKind::DnsZone, "alice", "example.com"))
        .await
        .unwrap();
    assert!(zone.id.starts_with('Z'));

    gateway.delete(ResourceKind::Bucket, &bucket.id).await.unwrap();
    gateway.delete(ResourceKind::DnsZone, &zone.id).await.unwrap();

    assert!(gateway.list(ResourceKind::Bucket, None, None).await.unwrap().is_empty());
    assert!(gateway.list(ResourceKind::DnsZone, None, None).await.unwrap().is_empty());

    // The name is reusable once the bucket is gone.
    gateway
        .create(spec(ResourceKind::Bucket, "bob", "assets"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_with_mismatched_kind_leaves_the_resource_intact() {
    let gateway = MemoryGateway::new();
    gateway
        .create(spec(ResourceKind::Bucket, "alice", "assets"))
        .await
        .unwrap();

    // Addressing a bucket id under the wrong kind is NotFound and must not
    // destroy the bucket.
    let err = gateway
        .delete(ResourceKind::DnsZone, "assets")
        .await
        .unwrap_err();
    assert!(matches!(err, StratoError::NotFound(_)));

    let buckets = gateway
        .list(ResourceKind::Bucket, Some("alice"), None)
        .await
        .unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].name, "assets");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bucket_creates_admit_exactly_one_winner() {
    let gateway = std::sync::Arc::new(MemoryGateway::new());

    for round in 0..100 {
        let name = format!("bucket-{round}");
        let a = {
            let gateway = gateway.clone();
            let name = name.clone();
            tokio::spawn(
                async move { gateway.create(spec(ResourceKind::Bucket, "alice", &name)).await },
            )
        };
        let b = {
            let gateway = gateway.clone();
            let name = name.clone();
            tokio::spawn(
                async move { gateway.create(spec(ResourceKind::Bucket, "bob", &name)).await },
            )
        };
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        assert!(
            a.is_ok() ^ b.is_ok(),
            "round {round}: expected exactly one winner, got {a:?} / {b:?}"
        );
        // With exactly one winner, `and` always yields the loser's error.
        let err = a.and(b).unwrap_err();
        assert_eq!(
            err,
            StratoError::Conflict(format!("Bucket {name} already exists"))
        );
    }

    // Exactly one record per name survived across both owners.
    let all = gateway.list(ResourceKind::Bucket, None, None).await.unwrap();
    assert_eq!(all.len(), 100);
}

#[tokio::test]
async fn test_delete_unknown_resource_fails() {
    let gateway = MemoryGateway::new();
    let err = gateway
        .delete(ResourceKind::Instance, "i-doesnotexist")
        .await
        .unwrap_err();
    assert!(matches!(err, StratoError::NotFound(_)));
}

#[tokio::test]
async fn test_put_object_requires_an_existing_bucket() {
    let gateway = MemoryGateway::new();
    let err = gateway.put_object("assets", "k", b"v").await.unwrap_err();
    assert!(matches!(err, StratoError::NotFound(_)));

    gateway
        .create(spec(ResourceKind::Bucket, "alice", "assets"))
        .await
        .unwrap();
    gateway.put_object("assets", "k", b"v").await.unwrap();
}
