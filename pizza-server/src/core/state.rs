//! 服务器状态
//!
//! 每个 handler 通过 `State<ServerState>` 获得连接池和配置，
//! 不存在全局数据库句柄。

use sqlx::SqlitePool;

use crate::core::{Config, Result, ServerError};
use crate::db::DbService;

/// Shared application state, cheap to clone
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
}

impl ServerState {
    /// Create state from an existing pool (tests, embedding)
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    /// Open the database, run migrations and build the state
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url, config.db_max_connections)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        Ok(Self::new(config.clone(), db.pool))
    }

    /// Invoice tax rate in effect
    pub fn tax_rate(&self) -> f64 {
        self.config.invoice_tax_rate
    }
}
