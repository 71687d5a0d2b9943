//! Connection pool management for the MySQL backend.

use std::time::Duration;

use sqlx_core::pool::PoolOptions;
use sqlx_mysql::{MySql, MySqlPool};
use tracing::{debug, info, instrument};

use crate::config::MysqlConfig;
use crate::error::{MysqlError, Result};

/// Type alias for MySQL pool options.
pub type MySqlPoolOptions = PoolOptions<MySql>;

/// Creates a new MySQL connection pool from the given configuration.
///
/// Connections are pinged before being handed out, so a connection the
/// server dropped while idle is replaced instead of surfacing as a query
/// error. Connecting is eager: a dead database fails pool construction
/// rather than the first query.
#[instrument(skip(config), fields(url = %config.display_url()))]
pub async fn create_pool(config: &MysqlConfig) -> Result<MySqlPool> {
    info!(
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        acquire_timeout_ms = config.acquire_timeout_ms,
        "Creating MySQL connection pool"
    );

    let options = MySqlPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
        .test_before_acquire(true);

    let pool = options.connect_with(config.connect_options()).await?;

    debug!("MySQL connection pool created successfully");

    Ok(pool)
}

/// Issues the liveness query against the database.
#[instrument(skip(pool))]
pub async fn ping(pool: &MySqlPool) -> Result<()> {
    sqlx_core::query::query("SELECT 1 = 1")
        .execute(pool)
        .await
        .map_err(MysqlError::from)?;

    debug!("database liveness query succeeded");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_pool_fails_when_database_unreachable() {
        // Nothing listens on port 1; the eager connect must surface the
        // failure instead of deferring it to the first query.
        let config = MysqlConfig::default()
            .with_port(1)
            .with_acquire_timeout_ms(500);
        let result = tokio_test::block_on(create_pool(&config));
        assert!(result.is_err());
    }
}
