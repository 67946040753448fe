// src/core/gateway/http.rs

//! A resource gateway backed by a provider's REST API.
//!
//! The provider endpoint performs the actual provisioning and blocks until
//! the resource reaches its target state, so every request here carries a
//! bounded timeout. A timed-out call is reported as failed to the caller; the
//! resource's true state is reconciled by the next listing query.

use crate::core::StratoError;
use crate::core::gateway::{
    CreateSpec, Created, MANAGEMENT_MARKER, ResourceGateway, ResourceKind, ResourceRecord,
    ResourceState, StateChange,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    resources: Vec<ResourceRecord>,
}

/// Provisioning client for a remote provider endpoint.
#[derive(Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: String,
}

impl HttpGateway {
    pub fn new(base_url: &Url, wait_timeout: Duration) -> Result<Self, StratoError> {
        let client = reqwest::Client::builder()
            .timeout(wait_timeout)
            .build()
            .map_err(|e| StratoError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Maps a non-success provider response onto the error taxonomy.
    async fn error_from_response(response: reqwest::Response) -> StratoError {
        let status = response.status();
        let detail = response
            .json::<ProviderErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| format!("provider returned {status}"));
        match status {
            StatusCode::NOT_FOUND => StratoError::NotFound(detail),
            StatusCode::CONFLICT => StratoError::Conflict(detail),
            _ => StratoError::Upstream(detail),
        }
    }
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn create(&self, spec: CreateSpec) -> Result<Created, StratoError> {
        debug!(kind = %spec.kind, name = %spec.name, "provider create call");
        let response = self
            .client
            .post(format!("{}/v1/resources", self.base))
            .json(&json!({ "resource": spec, "managed_by": MANAGEMENT_MARKER }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response.json::<Created>().await?)
    }

    async fn list(
        &self,
        kind: ResourceKind,
        owner: Option<&str>,
        state: Option<ResourceState>,
    ) -> Result<Vec<ResourceRecord>, StratoError> {
        let mut query: Vec<(&str, String)> = vec![
            ("kind", kind.to_string()),
            // Resources not carrying the management tag are invisible here.
            ("managed_by", MANAGEMENT_MARKER.to_string()),
        ];
        if let Some(owner) = owner {
            query.push(("owner", owner.to_string()));
        }
        if let Some(state) = state {
            query.push(("state", state.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/v1/resources", self.base))
            .query(&query)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(response.json::<ListResponse>().await?.resources)
    }

    async fn set_state(
        &self,
        kind: ResourceKind,
        id: &str,
        change: StateChange,
    ) -> Result<(), StratoError> {
        debug!(%kind, %id, %change, "provider state-change call");
        let response = self
            .client
            .post(format!("{}/v1/resources/{id}/state", self.base))
            .json(&json!({ "kind": kind, "change": change }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), StratoError> {
        debug!(%kind, %id, "provider delete call");
        let response = self
            .client
            .delete(format!("{}/v1/resources/{id}", self.base))
            .query(&[
                ("kind", kind.to_string()),
                ("managed_by", MANAGEMENT_MARKER.to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn put_object(
        &self,
        bucket_id: &str,
        key: &str,
        content: &[u8],
    ) -> Result<(), StratoError> {
        let response = self
            .client
            .put(format!("{}/v1/buckets/{bucket_id}/objects/{key}", self.base))
            .body(content.to_vec())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}
