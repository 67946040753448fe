// src/core/authz.rs

//! The authorization gate: decides allow/deny for a create request before
//! any provisioning call is issued.

use crate::core::StratoError;
use crate::core::gateway::{ResourceGateway, ResourceKind, ResourceState};
use crate::core::metrics;
use crate::core::permissions::Permissions;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// The specific first-failing check behind an authorization denial.
///
/// The checks run in a fixed order and the first failure determines the
/// reported reason. The order matters for user-facing error messages, not for
/// security: all checks must pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    ShapeNotPermitted,
    ImageNotPermitted,
    ConcurrentLimitExceeded,
}

impl DenyReason {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DenyReason::ShapeNotPermitted => "shape",
            DenyReason::ImageNotPermitted => "image",
            DenyReason::ConcurrentLimitExceeded => "limit",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match self {
            DenyReason::ShapeNotPermitted => "Instance type permission denied.",
            DenyReason::ImageNotPermitted => "AMI choice permission denied.",
            DenyReason::ConcurrentLimitExceeded => "Too many running instances for the user.",
        };
        f.write_str(detail)
    }
}

/// Parameters of an instance-create action, as seen by the gate.
#[derive(Debug, Clone)]
pub struct CreateInstanceAction {
    pub instance_type: String,
    pub ami: String,
}

/// An allowed action, carrying the canonical image id to provision with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowed {
    pub canonical_image: String,
}

/// Evaluates the static checks (shape membership and image resolution)
/// against an effective permission set. Returns the canonical image on
/// success; the concurrency check is evaluated separately because it needs a
/// live gateway query.
pub fn check_static(
    permissions: &Permissions,
    action: &CreateInstanceAction,
) -> Result<Allowed, DenyReason> {
    if !permissions
        .allowed_instance_types
        .iter()
        .any(|t| t == &action.instance_type)
    {
        return Err(DenyReason::ShapeNotPermitted);
    }

    let canonical_image = permissions
        .resolve_image(&action.ami)
        .ok_or(DenyReason::ImageNotPermitted)?;

    Ok(Allowed { canonical_image })
}

/// The authorization gate, bound to the gateway it queries for live
/// concurrency counts.
#[derive(Clone)]
pub struct AuthorizationGate {
    gateway: Arc<dyn ResourceGateway>,
}

impl AuthorizationGate {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }

    /// Authorizes an instance-create action for `owner` under `permissions`.
    ///
    /// Checks, in order: instance type, image choice, and the live count of
    /// the owner's running managed instances against the concurrency cap. The
    /// count is queried at authorization time, never cached. No side effects
    /// occur on a deny.
    pub async fn authorize_create(
        &self,
        owner: &str,
        permissions: &Permissions,
        action: &CreateInstanceAction,
    ) -> Result<Allowed, StratoError> {
        let allowed = match check_static(permissions, action) {
            Ok(allowed) => allowed,
            Err(reason) => return Err(self.deny(owner, reason)),
        };

        let running = self
            .gateway
            .list(ResourceKind::Instance, Some(owner), Some(ResourceState::Running))
            .await?;
        if running.len() as u64 >= u64::from(permissions.max_running_instances) {
            return Err(self.deny(owner, DenyReason::ConcurrentLimitExceeded));
        }

        Ok(allowed)
    }

    fn deny(&self, owner: &str, reason: DenyReason) -> StratoError {
        info!(owner, reason = reason.label(), "create request denied");
        metrics::AUTHZ_DENIALS_TOTAL
            .with_label_values(&[reason.label()])
            .inc();
        StratoError::Denied(reason)
    }
}
