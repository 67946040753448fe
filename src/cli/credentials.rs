// src/cli/credentials.rs

//! Local credential cache: bearer token, username, token expiry, and a
//! snapshot of effective permissions, persisted under a per-user directory
//! for reuse across invocations.

use crate::core::permissions::Permissions;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

const USER_FILE: &str = "user";
const TOKEN_FILE: &str = "token";
const PERMISSIONS_FILE: &str = "permissions.json";
const EXPIRY_FILE: &str = "token_expires_at";

/// Handle on the on-disk credential store. The directory defaults to
/// `~/.strato`; `STRATO_HOME` overrides it.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn open() -> Result<Self> {
        let dir = match std::env::var_os("STRATO_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .context("Could not determine the home directory")?
                .join(".strato"),
        };
        Self::open_at(dir)
    }

    /// Opens the store at an explicit directory, creating it if needed.
    pub fn open_at(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_trimmed(&self, file: &str) -> Option<String> {
        fs::read_to_string(self.path(file))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Persists a full login: token, identity, expiry, and the permission
    /// snapshot returned by the server.
    pub fn save_login(
        &self,
        username: &str,
        token: &str,
        expires_at: DateTime<Utc>,
        permissions: &Permissions,
    ) -> Result<()> {
        fs::write(self.path(USER_FILE), username)?;
        fs::write(self.path(TOKEN_FILE), token)?;
        fs::write(self.path(EXPIRY_FILE), expires_at.to_rfc3339())?;
        fs::write(
            self.path(PERMISSIONS_FILE),
            serde_json::to_string_pretty(permissions)?,
        )?;
        Ok(())
    }

    pub fn username(&self) -> Option<String> {
        self.read_trimmed(USER_FILE)
    }

    /// Returns the cached token, refusing one that has expired.
    pub fn token(&self) -> Result<String> {
        let Some(token) = self.read_trimmed(TOKEN_FILE) else {
            bail!("Not logged in. Run 'strato auth login' to log in.");
        };
        if let Some(expiry) = self.expires_at()
            && expiry <= Utc::now()
        {
            bail!("Your session has expired. Run 'strato auth login' to log in again.");
        }
        Ok(token)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.read_trimmed(EXPIRY_FILE)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The permission snapshot saved at login; empty permissions if absent
    /// or unreadable.
    pub fn permissions(&self) -> Permissions {
        self.read_trimmed(PERMISSIONS_FILE)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Removes all cached credentials.
    pub fn clear(&self) -> Result<()> {
        for file in [USER_FILE, TOKEN_FILE, PERMISSIONS_FILE, EXPIRY_FILE] {
            let path = self.path(file);
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove '{}'", path.display()))?;
            }
        }
        Ok(())
    }
}
