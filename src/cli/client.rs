// src/cli/client.rs

//! The HTTP client the CLI uses to talk to the Strato backend.

use crate::core::permissions::Permissions;
use anyhow::{Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

pub const BACKEND_URL_ENV: &str = "STRATO_BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// The backend URL, from `STRATO_BACKEND_URL` or the default.
pub fn backend_url() -> String {
    std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user_permissions: Permissions,
}

#[derive(Debug, Deserialize)]
pub struct InstanceInfo {
    pub instance_id: String,
    pub name: String,
    pub public_ip: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct Ec2ListResponse {
    pub instances: Vec<InstanceInfo>,
}

#[derive(Debug, Deserialize)]
pub struct Ec2CreateResponse {
    pub instance_id: String,
    pub instance_public_ip: String,
}

#[derive(Debug, Deserialize)]
pub struct InstanceStatus {
    pub instance_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct BucketInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3ListResponse {
    pub buckets: Vec<BucketInfo>,
}

#[derive(Debug, Deserialize)]
pub struct S3CreateResponse {
    pub bucket_name: String,
    pub status: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct S3DeleteResponse {
    pub bucket_name: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct S3UploadResponse {
    pub bucket_name: String,
    pub key: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ZoneInfo {
    pub zone_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ZoneListResponse {
    pub zones: Vec<ZoneInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneStatus {
    pub zone_id: String,
    pub status: String,
}

/// Thin typed wrapper over reqwest for every backend endpoint.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Sends a request and decodes the response, turning non-2xx statuses
    /// into readable errors carrying the server's detail message.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .unwrap_or_else(|| "no detail provided".to_string());
        if status == StatusCode::UNAUTHORIZED {
            bail!("{detail} (HTTP 401 - try 'strato auth login')");
        }
        bail!("{detail} (HTTP {status})");
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let builder = self
            .request(Method::POST, "/auth/login", None)
            .json(&json!({ "username": username, "password": password }));
        self.send(builder).await
    }

    pub async fn ec2_create(
        &self,
        token: &str,
        name: &str,
        instance_type: &str,
        ami: &str,
    ) -> Result<Ec2CreateResponse> {
        let builder = self
            .request(Method::POST, "/ec2/create", Some(token))
            .json(&json!({ "name": name, "instance_type": instance_type, "ami": ami }));
        self.send(builder).await
    }

    pub async fn ec2_list(&self, token: &str) -> Result<Ec2ListResponse> {
        let builder = self.request(Method::GET, "/ec2/list", Some(token));
        self.send(builder).await
    }

    pub async fn ec2_delete(&self, token: &str, instance: &str) -> Result<InstanceStatus> {
        let builder = self
            .request(Method::DELETE, "/ec2/delete", Some(token))
            .json(&json!({ "instance": instance }));
        self.send(builder).await
    }

    pub async fn ec2_start(&self, token: &str, instance: &str) -> Result<InstanceStatus> {
        let builder = self
            .request(Method::POST, "/ec2/start", Some(token))
            .json(&json!({ "instance": instance }));
        self.send(builder).await
    }

    pub async fn ec2_stop(&self, token: &str, instance: &str) -> Result<InstanceStatus> {
        let builder = self
            .request(Method::POST, "/ec2/stop", Some(token))
            .json(&json!({ "instance": instance }));
        self.send(builder).await
    }

    pub async fn s3_create(
        &self,
        token: &str,
        name: &str,
        public: bool,
    ) -> Result<S3CreateResponse> {
        let builder = self
            .request(Method::POST, "/s3/create", Some(token))
            .json(&json!({ "name": name, "public": public }));
        self.send(builder).await
    }

    pub async fn s3_list(&self, token: &str) -> Result<S3ListResponse> {
        let builder = self.request(Method::GET, "/s3/list", Some(token));
        self.send(builder).await
    }

    pub async fn s3_delete(&self, token: &str, bucket: &str) -> Result<S3DeleteResponse> {
        let builder = self
            .request(Method::DELETE, "/s3/delete", Some(token))
            .json(&json!({ "bucket": bucket }));
        self.send(builder).await
    }

    pub async fn s3_upload(
        &self,
        token: &str,
        bucket: &str,
        key: &str,
        content: &[u8],
    ) -> Result<S3UploadResponse> {
        let builder = self
            .request(Method::POST, "/s3/upload", Some(token))
            .json(&json!({
                "bucket": bucket,
                "key": key,
                "content_base64": BASE64.encode(content),
            }));
        self.send(builder).await
    }

    pub async fn zone_create(&self, token: &str, name: &str) -> Result<ZoneStatus> {
        let builder = self
            .request(Method::POST, "/route53/zone/create", Some(token))
            .json(&json!({ "name": name }));
        self.send(builder).await
    }

    pub async fn zone_list(&self, token: &str) -> Result<ZoneListResponse> {
        let builder = self.request(Method::GET, "/route53/zones", Some(token));
        self.send(builder).await
    }

    pub async fn zone_delete(&self, token: &str, zone: &str) -> Result<ZoneStatus> {
        let path = format!("/route53/zone/{zone}/delete");
        let builder = self.request(Method::DELETE, &path, Some(token));
        self.send(builder).await
    }
}
