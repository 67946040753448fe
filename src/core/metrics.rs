// src/core/metrics.rs

//! Defines and registers Prometheus metrics for server monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{CounterVec, TextEncoder, register_counter_vec};

lazy_static! {
    /// The total number of login attempts, labeled by outcome ("success" / "failure").
    pub static ref LOGIN_ATTEMPTS_TOTAL: CounterVec =
        register_counter_vec!("strato_login_attempts_total", "Total number of login attempts, labeled by outcome.", &["outcome"]).unwrap();
    /// The total number of authorization denials, labeled by the first-failing check.
    pub static ref AUTHZ_DENIALS_TOTAL: CounterVec =
        register_counter_vec!("strato_authz_denials_total", "Total number of create requests denied by the authorization gate, labeled by reason.", &["reason"]).unwrap();
    /// The total number of provisioning calls issued to the gateway, labeled by kind and operation.
    pub static ref PROVISION_CALLS_TOTAL: CounterVec =
        register_counter_vec!("strato_provision_calls_total", "Total number of provisioning calls issued, labeled by resource kind and operation.", &["kind", "op"]).unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap()
}
