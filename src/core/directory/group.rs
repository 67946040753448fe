// src/core/directory/group.rs

use crate::core::permissions::PermissionGrant;
use serde::{Deserialize, Serialize};

/// A group record: a default permission grant shared by all members.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GroupRecord {
    #[serde(default)]
    pub permissions: PermissionGrant,
}
