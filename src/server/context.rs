// src/server/context.rs

//! Shared per-process state handed to every request handler.

use crate::config::Config;
use crate::core::auth::TokenService;
use crate::core::authz::AuthorizationGate;
use crate::core::directory::Directory;
use crate::core::gateway::ResourceGateway;
use crate::core::locks::OwnerLocks;
use std::sync::Arc;

/// Read-only after construction, apart from the per-owner create locks.
pub struct ServerContext {
    pub config: Config,
    pub directory: Directory,
    pub tokens: TokenService,
    pub gateway: Arc<dyn ResourceGateway>,
    pub authz: AuthorizationGate,
    pub create_locks: OwnerLocks,
}

impl ServerContext {
    pub fn new(
        config: Config,
        directory: Directory,
        tokens: TokenService,
        gateway: Arc<dyn ResourceGateway>,
    ) -> Self {
        Self {
            config,
            directory,
            tokens,
            authz: AuthorizationGate::new(gateway.clone()),
            gateway,
            create_locks: OwnerLocks::new(),
        }
    }
}
