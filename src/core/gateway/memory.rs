// src/core/gateway/memory.rs

//! An in-process simulated provider.
//!
//! Backs the `memory` provider mode and the test suite. State transitions
//! that a real provider would take minutes to complete happen synchronously,
//! but the observable contract (tagging, filtering, terminal states) matches
//! the HTTP gateway exactly.

use crate::core::StratoError;
use crate::core::gateway::{
    CreateSpec, Created, ResourceGateway, ResourceKind, ResourceRecord, ResourceState,
    StateChange,
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredResource {
    seq: u64,
    kind: ResourceKind,
    name: String,
    owner: String,
    state: ResourceState,
    address: Option<String>,
    objects: Vec<String>,
}

/// Simulated provider keyed by canonical resource id.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    resources: DashMap<String, StoredResource>,
    next_seq: AtomicU64,
    rng: Mutex<Option<SmallRng>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    fn synthetic_public_ip(&self) -> String {
        let mut guard = self.rng.lock().expect("rng mutex poisoned");
        let rng = guard.get_or_insert_with(SmallRng::from_entropy);
        format!(
            "54.{}.{}.{}",
            rng.gen_range(1..=254u8),
            rng.gen_range(1..=254u8),
            rng.gen_range(1..=254u8)
        )
    }

    fn new_id(kind: ResourceKind, name: &str) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        match kind {
            ResourceKind::Instance => format!("i-{}", &hex[..17]),
            // Bucket names are themselves the canonical provider identifier.
            ResourceKind::Bucket => name.to_string(),
            ResourceKind::DnsZone => format!("Z{}", hex[..13].to_uppercase()),
        }
    }
}

#[async_trait]
impl ResourceGateway for MemoryGateway {
    async fn create(&self, spec: CreateSpec) -> Result<Created, StratoError> {
        let id = Self::new_id(spec.kind, &spec.name);
        let (state, address) = match spec.kind {
            ResourceKind::Instance => (ResourceState::Running, Some(self.synthetic_public_ip())),
            ResourceKind::Bucket => (
                ResourceState::Available,
                Some(format!("https://{}.storage.strato.cloud", spec.name)),
            ),
            ResourceKind::DnsZone => (ResourceState::Available, None),
        };

        debug!(kind = %spec.kind, id = %id, owner = %spec.owner, "creating resource");
        let stored = StoredResource {
            seq: self.next_seq(),
            kind: spec.kind,
            name: spec.name,
            owner: spec.owner,
            state,
            address: address.clone(),
            objects: Vec::new(),
        };

        if spec.kind == ResourceKind::Bucket {
            // Bucket names are globally unique at the provider, regardless of
            // owner; the entry holds the shard lock so the uniqueness check
            // and the insert are one atomic step.
            match self.resources.entry(id.clone()) {
                Entry::Occupied(_) => {
                    return Err(StratoError::Conflict(format!("Bucket {id} already exists")));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(stored);
                }
            }
        } else {
            self.resources.insert(id.clone(), stored);
        }
        Ok(Created { id, address })
    }

    async fn list(
        &self,
        kind: ResourceKind,
        owner: Option<&str>,
        state: Option<ResourceState>,
    ) -> Result<Vec<ResourceRecord>, StratoError> {
        let mut matches: Vec<(u64, ResourceRecord)> = self
            .resources
            .iter()
            .filter(|entry| entry.kind == kind)
            .filter(|entry| owner.is_none_or(|o| entry.owner == o))
            .filter(|entry| state.is_none_or(|s| entry.state == s))
            .map(|entry| {
                (
                    entry.seq,
                    ResourceRecord {
                        id: entry.key().clone(),
                        name: entry.name.clone(),
                        state: entry.state,
                        address: entry.address.clone(),
                    },
                )
            })
            .collect();
        // Stable creation-order enumeration, like a provider's paginated listing.
        matches.sort_by_key(|(seq, _)| *seq);
        Ok(matches.into_iter().map(|(_, record)| record).collect())
    }

    async fn set_state(
        &self,
        kind: ResourceKind,
        id: &str,
        change: StateChange,
    ) -> Result<(), StratoError> {
        let mut entry = self
            .resources
            .get_mut(id)
            .filter(|entry| entry.kind == kind)
            .ok_or_else(|| StratoError::NotFound(format!("Resource {id} not found")))?;

        entry.state = match (change, entry.state) {
            (StateChange::Start, ResourceState::Stopped) => ResourceState::Running,
            (StateChange::Stop, ResourceState::Running) => ResourceState::Stopped,
            (_, current) => {
                return Err(StratoError::Upstream(format!(
                    "cannot {change} resource {id} in state {current}"
                )));
            }
        };
        Ok(())
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), StratoError> {
        match kind {
            ResourceKind::Instance => {
                let mut entry = self
                    .resources
                    .get_mut(id)
                    .filter(|entry| entry.kind == kind)
                    .ok_or_else(|| StratoError::NotFound(format!("Resource {id} not found")))?;
                // Terminated instances stay visible in listings, as they do
                // at the provider.
                entry.state = ResourceState::Terminated;
            }
            ResourceKind::Bucket | ResourceKind::DnsZone => {
                // The kind check must precede the removal: a kind-mismatched
                // id is NotFound, not destroyed.
                self.resources
                    .remove_if(id, |_, entry| entry.kind == kind)
                    .ok_or_else(|| StratoError::NotFound(format!("Resource {id} not found")))?;
            }
        }
        Ok(())
    }

    async fn put_object(
        &self,
        bucket_id: &str,
        key: &str,
        _content: &[u8],
    ) -> Result<(), StratoError> {
        let mut entry = self
            .resources
            .get_mut(bucket_id)
            .filter(|entry| entry.kind == ResourceKind::Bucket)
            .ok_or_else(|| StratoError::NotFound(format!("Bucket {bucket_id} not found")))?;
        entry.objects.push(key.to_string());
        Ok(())
    }
}
