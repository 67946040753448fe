// src/core/directory/mod.rs

//! The read-only user/group directory and the permission resolver.
//!
//! The directory is constructed once at process start from two TOML files and
//! passed by handle to the components that need it. There is no ambient
//! global lookup.

mod group;
mod user;

pub use group::GroupRecord;
pub use user::UserRecord;

use crate::core::StratoError;
use crate::core::permissions::Permissions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The data structure of the users file (e.g., users.toml).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UsersFile {
    #[serde(default)]
    pub users: HashMap<String, UserRecord>,
}

/// The data structure of the groups file (e.g., groups.toml).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GroupsFile {
    #[serde(default)]
    pub groups: HashMap<String, GroupRecord>,
}

/// Read-only store of user and group records.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: HashMap<String, UserRecord>,
    groups: HashMap<String, GroupRecord>,
}

impl Directory {
    pub fn new(users: HashMap<String, UserRecord>, groups: HashMap<String, GroupRecord>) -> Self {
        Self { users, groups }
    }

    /// Loads the directory from the configured users and groups TOML files.
    pub fn load(users_path: &Path, groups_path: &Path) -> Result<Self> {
        let users_raw = fs::read_to_string(users_path)
            .with_context(|| format!("Failed to read users file at '{}'", users_path.display()))?;
        let users_file: UsersFile = toml::from_str(&users_raw)
            .with_context(|| format!("Failed to parse TOML from '{}'", users_path.display()))?;

        let groups_raw = fs::read_to_string(groups_path).with_context(|| {
            format!("Failed to read groups file at '{}'", groups_path.display())
        })?;
        let groups_file: GroupsFile = toml::from_str(&groups_raw)
            .with_context(|| format!("Failed to parse TOML from '{}'", groups_path.display()))?;

        let directory = Self::new(users_file.users, groups_file.groups);
        for (name, user) in &directory.users {
            if let Some(group) = user.group.as_deref()
                && !directory.groups.contains_key(group)
            {
                warn!(
                    "user '{}' references unknown group '{}'; treating as no group",
                    name, group
                );
            }
        }
        info!(
            "loaded directory: {} users, {} groups",
            directory.users.len(),
            directory.groups.len()
        );
        Ok(directory)
    }

    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn group(&self, name: &str) -> Option<&GroupRecord> {
        self.groups.get(name)
    }

    /// Computes the effective permissions for a user.
    ///
    /// Starts from an all-empty `Permissions`, overlays the group's grant (if
    /// the user has one; a dangling group reference counts as no group, not an
    /// error), then overlays the user's own grant. Each present field replaces
    /// the base field wholesale; the user always wins over the group per-field.
    pub fn effective_permissions(&self, username: &str) -> Result<Permissions, StratoError> {
        let user = self
            .user(username)
            .ok_or_else(|| StratoError::UserNotFound(username.to_string()))?;

        let mut permissions = Permissions::default();
        if let Some(group_name) = user.group.as_deref()
            && let Some(group) = self.group(group_name)
        {
            group.permissions.overlay_onto(&mut permissions);
        }
        user.permissions.overlay_onto(&mut permissions);
        Ok(permissions)
    }
}
