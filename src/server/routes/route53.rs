// src/server/routes/route53.rs

//! DNS zone endpoints.

use crate::core::StratoError;
use crate::core::gateway::{CreateSpec, ResourceKind, ResourceState};
use crate::core::metrics;
use crate::core::ownership::resolve_owned_reference;
use crate::server::context::ServerContext;
use crate::server::extract::AuthedUser;
use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ZoneCreateRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ZoneStatusResponse {
    pub zone_id: String,
    pub status: String,
}

pub async fn zone_create(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<ZoneCreateRequest>,
) -> Result<Json<ZoneStatusResponse>, StratoError> {
    let _guard = ctx.create_locks.acquire(&user.username).await;

    let existing = ctx
        .gateway
        .list(ResourceKind::DnsZone, Some(&user.username), None)
        .await?;
    if existing
        .iter()
        .any(|r| r.name == request.name && r.state != ResourceState::Deleted)
    {
        return Err(StratoError::Conflict(format!(
            "A DNS zone named '{}' already exists",
            request.name
        )));
    }

    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["dns-zone", "create"])
        .inc();
    let created = ctx
        .gateway
        .create(CreateSpec {
            kind: ResourceKind::DnsZone,
            name: request.name.clone(),
            owner: user.username.clone(),
            shape: None,
            image: None,
            public: false,
        })
        .await?;
    info!(owner = %user.username, zone_id = %created.id, "DNS zone created");

    Ok(Json(ZoneStatusResponse {
        zone_id: created.id,
        status: "created".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ZoneInfo {
    pub zone_id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ZoneListResponse {
    pub zones: Vec<ZoneInfo>,
}

pub async fn zone_list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
) -> Result<Json<ZoneListResponse>, StratoError> {
    let records = ctx
        .gateway
        .list(ResourceKind::DnsZone, Some(&user.username), None)
        .await?;
    let zones = records
        .into_iter()
        .map(|record| ZoneInfo {
            zone_id: record.id,
            name: record.name,
        })
        .collect();
    Ok(Json(ZoneListResponse { zones }))
}

pub async fn zone_delete(
    State(ctx): State<Arc<ServerContext>>,
    Path(zone): Path<String>,
    user: AuthedUser,
) -> Result<Json<ZoneStatusResponse>, StratoError> {
    let zone_id = resolve_owned_reference(
        ctx.gateway.as_ref(),
        &user.username,
        ResourceKind::DnsZone,
        &zone,
        None,
    )
    .await?
    .ok_or_else(|| {
        StratoError::NotFound(format!(
            "Zone {zone} does not exist or is not owned by user {}",
            user.username
        ))
    })?;

    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["dns-zone", "delete"])
        .inc();
    ctx.gateway.delete(ResourceKind::DnsZone, &zone_id).await?;
    info!(owner = %user.username, %zone_id, "DNS zone deleted");

    Ok(Json(ZoneStatusResponse {
        zone_id,
        status: "deleted".to_string(),
    }))
}
