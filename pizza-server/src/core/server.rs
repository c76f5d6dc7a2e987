//! Server Implementation
//!
//! HTTP 服务器启动和管理

use anyhow::Context;

use crate::core::{Config, Result, ServerState};
use crate::routes::build_app;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Serve until Ctrl-C, then close the pool
    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();

        let app = build_app().with_state(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(environment = %self.config.environment, "🍕 Pizza Server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server terminated")?;

        state.pool.close().await;
        tracing::info!("Database pool closed");

        Ok(())
    }
}
