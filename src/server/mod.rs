// src/server/mod.rs

//! Server startup: directory loading, gateway selection, and the HTTP
//! accept loop.

pub mod context;
pub mod extract;
mod metrics_server;
pub mod routes;

use crate::config::{Config, ProviderMode};
use crate::core::auth::TokenService;
use crate::core::directory::Directory;
use crate::core::gateway::{HttpGateway, MemoryGateway, ResourceGateway};
use anyhow::{Context as _, Result, anyhow};
use context::ServerContext;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Builds the shared context from a validated configuration.
pub fn build_context(config: Config) -> Result<ServerContext> {
    let directory = Directory::load(
        Path::new(&config.auth.users_file),
        Path::new(&config.auth.groups_file),
    )?;
    let secret = config.load_token_secret()?;
    let tokens = TokenService::new(secret, config.auth.token_ttl);

    let gateway: Arc<dyn ResourceGateway> = match config.provider.mode {
        ProviderMode::Memory => {
            info!("using in-process memory provider (development mode)");
            Arc::new(MemoryGateway::new())
        }
        ProviderMode::Http => {
            let base_url = config
                .provider
                .base_url
                .as_ref()
                .ok_or_else(|| anyhow!("provider.base_url is required in http mode"))?;
            info!("using provider endpoint at {}", base_url);
            Arc::new(HttpGateway::new(base_url, config.provider.wait_timeout)?)
        }
    };

    Ok(ServerContext::new(config, directory, tokens, gateway))
}

/// The main server startup function. Runs until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let (shutdown_tx, _) = broadcast::channel(1);

    let ctx = Arc::new(build_context(config)?);

    if ctx.config.metrics.enabled {
        let metrics_port = ctx.config.metrics.port;
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(metrics_server::run_metrics_server(metrics_port, shutdown_rx));
    }

    let addr: SocketAddr = format!("{}:{}", ctx.config.host, ctx.config.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address '{}:{}'",
                ctx.config.host, ctx.config.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind on {addr}"))?;
    info!("Strato control plane listening on http://{}", addr);

    let app = routes::router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received.");
            shutdown_tx.send(()).ok();
        })
        .await?;

    Ok(())
}
