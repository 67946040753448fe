// src/server/routes/auth.rs

//! Login and identity endpoints.

use crate::core::StratoError;
use crate::core::auth::password::verify_password;
use crate::core::metrics;
use crate::core::permissions::Permissions;
use crate::server::context::ServerContext;
use crate::server::extract::AuthedUser;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Uniform delay applied to failed logins to mitigate timing probes.
const FAILED_LOGIN_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user_permissions: Permissions,
}

pub async fn login(
    State(ctx): State<Arc<ServerContext>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StratoError> {
    let failed = |detail: &str| {
        metrics::LOGIN_ATTEMPTS_TOTAL
            .with_label_values(&["failure"])
            .inc();
        StratoError::Authentication(detail.to_string())
    };

    let Some(user) = ctx.directory.user(&request.username) else {
        tokio::time::sleep(FAILED_LOGIN_DELAY).await;
        return Err(failed("Username does not exist."));
    };

    if !verify_password(&request.password, &user.password_hash) {
        tokio::time::sleep(FAILED_LOGIN_DELAY).await;
        return Err(failed("Incorrect username or password"));
    }

    let issued = ctx.tokens.issue(&request.username)?;
    let user_permissions = ctx.directory.effective_permissions(&request.username)?;
    metrics::LOGIN_ATTEMPTS_TOTAL
        .with_label_values(&["success"])
        .inc();
    info!(username = %request.username, "login successful");

    Ok(Json(LoginResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        expires_at: issued.expires_at,
        user_permissions,
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub permissions: Permissions,
}

/// Returns the caller's identity and effective permissions. Doubles as the
/// CLI's token-validity probe.
pub async fn me(
    State(ctx): State<Arc<ServerContext>>,
    user: AuthedUser,
) -> Result<Json<MeResponse>, StratoError> {
    let permissions = ctx.directory.effective_permissions(&user.username)?;
    Ok(Json(MeResponse {
        username: user.username,
        permissions,
    }))
}
