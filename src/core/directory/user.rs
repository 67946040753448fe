// src/core/directory/user.rs

use crate::core::permissions::PermissionGrant;
use serde::{Deserialize, Serialize};

/// A single user record, as loaded from the users file.
///
/// Users are static configuration: created and updated out-of-band, read-only
/// at request time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserRecord {
    /// The Argon2 password hash.
    pub password_hash: String,
    /// Optional group membership (zero or one group).
    #[serde(default)]
    pub group: Option<String>,
    /// Optional per-field permission overrides. A present field replaces the
    /// group's grant for that field wholesale.
    #[serde(default)]
    pub permissions: PermissionGrant,
}
