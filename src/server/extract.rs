// src/server/extract.rs

//! Bearer-token extraction for authenticated routes.

use crate::core::StratoError;
use crate::server::context::ServerContext;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

/// The authenticated caller, extracted from the `Authorization: Bearer`
/// header. Rejection carries the usual 401 taxonomy.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub username: String,
}

impl FromRequestParts<Arc<ServerContext>> for AuthedUser {
    type Rejection = StratoError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<ServerContext>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                StratoError::Authentication("Not authenticated".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            StratoError::Authentication("Invalid authentication credentials".to_string())
        })?;

        let username = ctx.tokens.validate(token)?;
        Ok(AuthedUser { username })
    }
}
