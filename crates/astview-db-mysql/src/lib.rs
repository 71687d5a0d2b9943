//! MySQL backend for astview.
//!
//! This crate owns everything that talks to the database: connection-pool
//! construction, the liveness ping, and the probe-then-create cycle that
//! keeps catalog views present.
//!
//! # Example
//!
//! ```ignore
//! use astview_core::{HostIdentity, view_defs};
//! use astview_db_mysql::{MysqlConfig, ViewManager, create_pool};
//!
//! # async fn example() -> astview_db_mysql::Result<()> {
//! let config = MysqlConfig::default().with_database("asterisk");
//! let pool = create_pool(&config).await?;
//! let manager = ViewManager::new(pool);
//!
//! let host = HostIdentity::from_name("upstream-01");
//! for def in view_defs(&host) {
//!     manager.ensure(&def).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`config`]: connection settings and pool tuning
//! - [`error`]: error types and SQLSTATE classification
//! - [`pool`]: pool construction and the liveness query
//! - [`views`]: probe / create / ensure operations

mod config;
mod error;
mod pool;
mod views;

// Re-export main types
pub use config::MysqlConfig;
pub use error::{
    MYSQL_TABLE_EXISTS, MYSQL_UNKNOWN_TABLE, MysqlError, Result, has_mysql_error_code,
    is_already_exists, is_unknown_table,
};
pub use pool::{MySqlPoolOptions, create_pool, ping};
pub use views::{EnsureOutcome, ViewManager};

// Re-export the pool handle so downstream signatures don't need sqlx directly.
pub use sqlx_mysql::MySqlPool;
