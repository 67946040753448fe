// src/server/routes/ec2.rs

//! Compute instance endpoints.
//!
//! Every mutating handler runs the full control flow: permission resolution,
//! authorization gate, and (for delete/start/stop) ownership resolution,
//! before any gateway call is issued.

use crate::core::StratoError;
use crate::core::authz::CreateInstanceAction;
use crate::core::gateway::{CreateSpec, ResourceKind, ResourceState, StateChange};
use crate::core::metrics;
use crate::core::ownership::resolve_owned_reference;
use crate::server::context::ServerContext;
use crate::server::extract::AuthedUser;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub instance_type: String,
    pub ami: String,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub instance_id: String,
    pub instance_public_ip: String,
}

pub async fn create(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<CreateRequest>,
) -> Result<Json<CreateResponse>, StratoError> {
    let permissions = ctx.directory.effective_permissions(&user.username)?;

    // The concurrency-limit check and the create call race against other
    // requests from the same owner; the owner lock serializes them.
    let _guard = ctx.create_locks.acquire(&user.username).await;

    let existing = ctx
        .gateway
        .list(ResourceKind::Instance, Some(&user.username), None)
        .await?;
    if existing
        .iter()
        .any(|r| r.name == request.name && r.state != ResourceState::Terminated)
    {
        return Err(StratoError::Conflict(format!(
            "An instance named '{}' already exists",
            request.name
        )));
    }

    let action = CreateInstanceAction {
        instance_type: request.instance_type.clone(),
        ami: request.ami.clone(),
    };
    let allowed = ctx
        .authz
        .authorize_create(&user.username, &permissions, &action)
        .await?;

    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["instance", "create"])
        .inc();
    let created = ctx
        .gateway
        .create(CreateSpec {
            kind: ResourceKind::Instance,
            name: request.name.clone(),
            owner: user.username.clone(),
            shape: Some(request.instance_type),
            image: Some(allowed.canonical_image),
            public: false,
        })
        .await?;
    info!(owner = %user.username, instance_id = %created.id, "instance launched");

    Ok(Json(CreateResponse {
        instance_id: created.id,
        instance_public_ip: created.address.unwrap_or_else(|| "N/A".to_string()),
    }))
}

#[derive(Debug, Serialize)]
pub struct InstanceInfo {
    pub instance_id: String,
    pub name: String,
    pub public_ip: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub instances: Vec<InstanceInfo>,
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
) -> Result<Json<ListResponse>, StratoError> {
    let records = ctx
        .gateway
        .list(ResourceKind::Instance, Some(&user.username), None)
        .await?;
    let instances = records
        .into_iter()
        .map(|record| InstanceInfo {
            instance_id: record.id,
            name: record.name,
            public_ip: record.address.unwrap_or_else(|| "N/A".to_string()),
            state: record.state.to_string(),
        })
        .collect();
    Ok(Json(ListResponse { instances }))
}

#[derive(Debug, Deserialize)]
pub struct InstanceRequest {
    /// Display name or canonical instance id.
    pub instance: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub instance_id: String,
    pub status: String,
}

pub async fn terminate(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<InstanceRequest>,
) -> Result<Json<StatusResponse>, StratoError> {
    let instance_id = resolve_owned_reference(
        ctx.gateway.as_ref(),
        &user.username,
        ResourceKind::Instance,
        &request.instance,
        None,
    )
    .await?
    .ok_or_else(|| StratoError::NotFound("Instance not found".to_string()))?;

    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["instance", "terminate"])
        .inc();
    ctx.gateway
        .delete(ResourceKind::Instance, &instance_id)
        .await?;
    info!(owner = %user.username, %instance_id, "instance terminated");

    Ok(Json(StatusResponse {
        instance_id,
        status: "terminated".to_string(),
    }))
}

pub async fn start(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<InstanceRequest>,
) -> Result<Json<StatusResponse>, StratoError> {
    change_state(
        &ctx,
        &user,
        &request.instance,
        ResourceState::Stopped,
        StateChange::Start,
        "started",
    )
    .await
}

pub async fn stop(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<InstanceRequest>,
) -> Result<Json<StatusResponse>, StratoError> {
    change_state(
        &ctx,
        &user,
        &request.instance,
        ResourceState::Running,
        StateChange::Stop,
        "stopped",
    )
    .await
}

/// Shared start/stop flow: ownership resolution with the required current
/// state, then the gateway transition.
async fn change_state(
    ctx: &ServerContext,
    user: &AuthedUser,
    reference: &str,
    required_state: ResourceState,
    change: StateChange,
    status: &str,
) -> Result<Json<StatusResponse>, StratoError> {
    let instance_id = resolve_owned_reference(
        ctx.gateway.as_ref(),
        &user.username,
        ResourceKind::Instance,
        reference,
        Some(required_state),
    )
    .await?
    .ok_or_else(|| {
        StratoError::NotFound(format!(
            "Instance not found, or is not in a {required_state} state \
             (Note: you can only start and stop instances that you own \
             and that are managed by Strato)"
        ))
    })?;

    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["instance", change.to_string().as_str()])
        .inc();
    ctx.gateway
        .set_state(ResourceKind::Instance, &instance_id, change)
        .await?;
    info!(owner = %user.username, %instance_id, %change, "instance state changed");

    Ok(Json(StatusResponse {
        instance_id,
        status: status.to_string(),
    }))
}
