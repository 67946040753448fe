// src/core/errors.rs

//! Defines the primary error type for the entire application.

use crate::core::authz::DenyReason;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// The main error enum, representing all possible failures within the control plane.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StratoError {
    /// Bad credentials or an invalid/expired bearer token. Maps to HTTP 401.
    #[error("{0}")]
    Authentication(String),

    /// The requested action failed an authorization check. Maps to HTTP 401
    /// with the specific first-failing reason, matching the order the checks
    /// are evaluated in.
    #[error("{0}")]
    Denied(DenyReason),

    /// The referenced user has no record in the directory.
    #[error("Unknown user '{0}'")]
    UserNotFound(String),

    /// Ownership resolution failed. Deliberately indistinguishable from
    /// "resource does not exist" so other users' resources are not leaked.
    #[error("{0}")]
    NotFound(String),

    /// A resource with the same name already exists. Maps to HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// The cloud provider call failed or timed out. Maps to HTTP 502.
    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// A request body that parsed but carried an unusable value. Maps to
    /// HTTP 400.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl StratoError {
    /// The HTTP status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StratoError::Authentication(_) => StatusCode::UNAUTHORIZED,
            // The original API reports authorization denials as 401.
            StratoError::Denied(_) => StatusCode::UNAUTHORIZED,
            StratoError::UserNotFound(_) => StatusCode::UNAUTHORIZED,
            StratoError::NotFound(_) => StatusCode::NOT_FOUND,
            StratoError::Conflict(_) => StatusCode::CONFLICT,
            StratoError::Upstream(_) => StatusCode::BAD_GATEWAY,
            StratoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StratoError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for StratoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR || status == StatusCode::BAD_GATEWAY {
            tracing::error!("request failed: {self}");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for StratoError {
    fn from(e: std::io::Error) -> Self {
        StratoError::Internal(e.to_string())
    }
}

impl From<reqwest::Error> for StratoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StratoError::Upstream(format!("provider call timed out: {e}"))
        } else {
            // reqwest errors may embed the full request URL; strip it so
            // provider credentials in query strings never reach a client.
            StratoError::Upstream(e.without_url().to_string())
        }
    }
}

impl From<serde_json::Error> for StratoError {
    fn from(e: serde_json::Error) -> Self {
        StratoError::Internal(format!("JSON serialization/deserialization error: {e}"))
    }
}
