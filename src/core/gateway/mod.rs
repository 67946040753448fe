// src/core/gateway/mod.rs

//! The resource gateway boundary: the interface through which all cloud
//! provisioning calls are issued.
//!
//! Every created resource is tagged with its owner and a fixed
//! "managed-by-Strato" marker; every list and delete call filters or
//! verifies by that same marker. Two implementations exist: an in-process
//! simulated provider used for development and tests, and an HTTP client
//! against a real provider endpoint.

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::MemoryGateway;

use crate::core::StratoError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The fixed marker distinguishing resources governed by this system from
/// unrelated resources in the same cloud account.
pub const MANAGEMENT_MARKER: &str = "Strato";

/// The kinds of resources the control plane manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Instance,
    Bucket,
    DnsZone,
}

/// Kind-specific lifecycle states. Compute resources move through the
/// pending/running/stopping/stopped/terminated cycle; buckets and zones are
/// either available or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    Terminated,
    Available,
    Deleted,
}

/// A lifecycle transition requested through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StateChange {
    Start,
    Stop,
}

/// Everything the provider needs to create a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpec {
    pub kind: ResourceKind,
    pub name: String,
    pub owner: String,
    /// Instance type for compute resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    /// Canonical image id for compute resources. Alias resolution happens
    /// before the gateway is reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Public-read flag for buckets.
    #[serde(default)]
    pub public: bool,
}

/// The provider's answer to a successful create call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One managed resource as reported by a list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: String,
    pub name: String,
    pub state: ResourceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// The provisioning interface consumed by the control plane.
///
/// Calls are coarse-grained and may block for the provider's full
/// state-transition wait; they are issued concurrently across independent
/// requests but never parallelized within one request. Every wait is bounded
/// by the provider timeout; a timeout is reported as a failure, never
/// silently retried.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Creates a resource tagged with the owner and the management marker,
    /// waiting until it reaches its initial terminal state.
    async fn create(&self, spec: CreateSpec) -> Result<Created, StratoError>;

    /// Lists managed resources of one kind, optionally filtered by owner and
    /// lifecycle state. Only resources carrying the management marker are
    /// ever returned.
    async fn list(
        &self,
        kind: ResourceKind,
        owner: Option<&str>,
        state: Option<ResourceState>,
    ) -> Result<Vec<ResourceRecord>, StratoError>;

    /// Starts or stops a compute resource, waiting for the target state.
    async fn set_state(
        &self,
        kind: ResourceKind,
        id: &str,
        change: StateChange,
    ) -> Result<(), StratoError>;

    /// Deletes (or terminates) a managed resource, waiting for completion.
    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), StratoError>;

    /// Stores an object in a managed bucket. Ownership is verified by the
    /// caller before this is reached.
    async fn put_object(
        &self,
        bucket_id: &str,
        key: &str,
        content: &[u8],
    ) -> Result<(), StratoError>;
}
