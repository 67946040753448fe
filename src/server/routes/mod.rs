// src/server/routes/mod.rs

//! REST endpoint handlers and router assembly.

mod auth;
mod ec2;
mod route53;
mod s3;

use crate::server::context::ServerContext;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Strato" }))
}

/// Builds the full application router over the shared context.
pub fn router(ctx: Arc<ServerContext>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/ec2/create", post(ec2::create))
        .route("/ec2/list", get(ec2::list))
        .route("/ec2/delete", delete(ec2::terminate))
        .route("/ec2/start", post(ec2::start))
        .route("/ec2/stop", post(ec2::stop))
        .route("/s3/create", post(s3::create))
        .route("/s3/list", get(s3::list))
        .route("/s3/delete", delete(s3::remove))
        .route("/s3/upload", post(s3::upload))
        .route("/route53/zone/create", post(route53::zone_create))
        .route("/route53/zone/{zone}/delete", delete(route53::zone_delete))
        .route("/route53/zones", get(route53::zone_list))
        .with_state(ctx)
}
