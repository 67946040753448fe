// src/core/permissions.rs

//! The `Permissions` value type and the grant-overlay rules used to compute
//! a user's effective permissions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A fully-populated permission set. Missing fields default to the most
/// restrictive value (zero capacity, empty collections), so every
/// authorization check against a `Permissions` value is total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    /// Cap on the number of simultaneously running instances per user.
    #[serde(default)]
    pub max_running_instances: u32,
    /// Instance types (shapes) the user may launch.
    #[serde(default)]
    pub allowed_instance_types: Vec<String>,
    /// Friendly image alias -> canonical provider image id. Both keys and
    /// values are acceptable as user input.
    #[serde(default)]
    pub ami_choices: HashMap<String, String>,
}

/// A partial grant as it appears on a user or group record. Each field is
/// optional; a present field replaces the same field of the base wholesale
/// when overlaid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_running_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_instance_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ami_choices: Option<HashMap<String, String>>,
}

impl PermissionGrant {
    /// Overlays this grant onto `base`, replacing each present field wholesale.
    ///
    /// This is deliberately NOT a union merge of collections: a user-level
    /// override of one field silently discards the group's grant for that
    /// field only, while absent fields still fall back to the base. The
    /// replacement semantic is the documented contract and must not be
    /// "fixed" into a deep union.
    pub fn overlay_onto(&self, base: &mut Permissions) {
        if let Some(max) = self.max_running_instances {
            base.max_running_instances = max;
        }
        if let Some(types) = &self.allowed_instance_types {
            base.allowed_instance_types = types.clone();
        }
        if let Some(choices) = &self.ami_choices {
            base.ami_choices = choices.clone();
        }
    }
}

impl Permissions {
    /// Resolves a user-supplied image reference against the allowed choices.
    ///
    /// A match on an alias key substitutes the canonical provider id; the key
    /// path takes precedence when a string is both a key and a value. A direct
    /// canonical value passes through unchanged. `None` means the image is not
    /// permitted.
    pub fn resolve_image(&self, reference: &str) -> Option<String> {
        if let Some(canonical) = self.ami_choices.get(reference) {
            return Some(canonical.clone());
        }
        if self.ami_choices.values().any(|v| v == reference) {
            return Some(reference.to_string());
        }
        None
    }
}
