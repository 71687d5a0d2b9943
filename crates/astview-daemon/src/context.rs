//! Process-wide state resolved once at startup.

use anyhow::Context as _;
use astview_core::HostIdentity;
use astview_db_mysql::{MySqlPool, create_pool};
use tracing::info;

use crate::config::AppConfig;

/// Everything the daemon resolves at startup: configuration, the local host
/// identity, and the connection pool. Owned here and handed to the
/// reconciler and the heartbeat instead of living in globals.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub host: HostIdentity,
    pub pool: MySqlPool,
}

impl AppContext {
    /// Resolves the host identity and connects the pool.
    ///
    /// The pool connects eagerly, so an unreachable database fails startup
    /// here rather than on the first query.
    pub async fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        let host = HostIdentity::detect().context("failed to resolve local hostname")?;

        let pool = create_pool(&config.mysql)
            .await
            .context("failed to establish MySQL connection pool")?;

        info!(
            host = %host,
            upstream = host.is_upstream(),
            database = %config.mysql.display_url(),
            update_interval_sec = config.update_interval_sec,
            "astview starting"
        );

        Ok(Self { config, host, pool })
    }
}
