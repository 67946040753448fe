// src/server/routes/s3.rs

//! Object-storage bucket endpoints.

use crate::core::StratoError;
use crate::core::gateway::{CreateSpec, ResourceKind};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
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
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub bucket_name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub async fn create(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<CreateRequest>,
) -> Result<Json<CreateResponse>, StratoError> {
    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["bucket", "create"])
        .inc();
    let created = ctx
        .gateway
        .create(CreateSpec {
            kind: ResourceKind::Bucket,
            name: request.name.clone(),
            owner: user.username.clone(),
            shape: None,
            image: None,
            public: request.public,
        })
        .await?;
    info!(owner = %user.username, bucket = %created.id, public = request.public, "bucket created");

    Ok(Json(CreateResponse {
        bucket_name: created.id,
        status: "created".to_string(),
        url: created.address,
    }))
}

#[derive(Debug, Serialize)]
pub struct BucketInfo {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub buckets: Vec<BucketInfo>,
}

pub async fn list(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
) -> Result<Json<ListResponse>, StratoError> {
    let records = ctx
        .gateway
        .list(ResourceKind::Bucket, Some(&user.username), None)
        .await?;
    let buckets = records
        .into_iter()
        .map(|record| BucketInfo { name: record.name })
        .collect();
    Ok(Json(ListResponse { buckets }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub bucket: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub bucket_name: String,
    pub status: String,
}

pub async fn remove(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, StratoError> {
    let bucket_id = resolve_owned_bucket(&ctx, &user, &request.bucket).await?;

    metrics::PROVISION_CALLS_TOTAL
        .with_label_values(&["bucket", "delete"])
        .inc();
    ctx.gateway.delete(ResourceKind::Bucket, &bucket_id).await?;
    info!(owner = %user.username, bucket = %bucket_id, "bucket deleted");

    Ok(Json(DeleteResponse {
        bucket_name: bucket_id,
        status: "deleted".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    /// Object content, base64-encoded so binary payloads survive the JSON
    /// body.
    pub content_base64: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub bucket_name: String,
    pub key: String,
    pub status: String,
}

pub async fn upload(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, StratoError> {
    let bucket_id = resolve_owned_bucket(&ctx, &user, &request.bucket).await?;
    let content = BASE64.decode(&request.content_base64).map_err(|_| {
        StratoError::InvalidRequest("content_base64 is not valid base64".to_string())
    })?;

    ctx.gateway
        .put_object(&bucket_id, &request.key, &content)
        .await?;
    info!(owner = %user.username, bucket = %bucket_id, key = %request.key, "object uploaded");

    Ok(Json(UploadResponse {
        bucket_name: bucket_id,
        key: request.key,
        status: "uploaded".to_string(),
    }))
}

async fn resolve_owned_bucket(
    ctx: &ServerContext,
    user: &AuthedUser,
    reference: &str,
) -> Result<String, StratoError> {
    resolve_owned_reference(
        ctx.gateway.as_ref(),
        &user.username,
        ResourceKind::Bucket,
        reference,
        None,
    )
    .await?
    .ok_or_else(|| {
        StratoError::NotFound(format!(
            "Bucket {reference} does not exist, or is not owned by user {}",
            user.username
        ))
    })
}
