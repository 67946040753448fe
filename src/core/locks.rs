// src/core/locks.rs

//! Per-owner advisory locks serializing check-then-create sequences.
//!
//! The concurrency-limit check and the subsequent provisioning call are not
//! covered by any provider-side transaction. Holding the owner's lock across
//! both closes the check-then-act window between concurrent requests from the
//! same user; requests from different owners never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one owner, creating it on first use. The guard
    /// must be held until the create call has returned.
    pub async fn acquire(&self, owner: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(owner.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
