//! Error types for the MySQL backend.

use sqlx_core::error::Error as SqlxError;

/// MySQL SQLSTATE for an unknown table or view (ER_NO_SUCH_TABLE, 1146).
pub const MYSQL_UNKNOWN_TABLE: &str = "42S02";

/// MySQL SQLSTATE for an already-existing table or view
/// (ER_TABLE_EXISTS_ERROR, 1050).
pub const MYSQL_TABLE_EXISTS: &str = "42S01";

/// Checks if a sqlx error carries a specific MySQL SQLSTATE.
pub fn has_mysql_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is "unknown table/view" (42S02).
pub fn is_unknown_table(err: &SqlxError) -> bool {
    has_mysql_error_code(err, MYSQL_UNKNOWN_TABLE)
}

/// Checks if a sqlx error is "table/view already exists" (42S01).
pub fn is_already_exists(err: &SqlxError) -> bool {
    has_mysql_error_code(err, MYSQL_TABLE_EXISTS)
}

/// Errors raised by the MySQL backend.
#[derive(Debug, thiserror::Error)]
pub enum MysqlError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Connection(#[from] SqlxError),

    /// A CREATE VIEW statement failed.
    #[error("failed to create view {name}: {source}")]
    CreateView {
        name: String,
        #[source]
        source: SqlxError,
    },
}

impl MysqlError {
    /// True when this is a lost creation race: the view appeared between
    /// the probe and our CREATE.
    #[must_use]
    pub fn is_creation_race(&self) -> bool {
        match self {
            MysqlError::CreateView { source, .. } => is_already_exists(source),
            MysqlError::Connection(_) => false,
        }
    }
}

/// Result type alias for MySQL operations.
pub type Result<T> = std::result::Result<T, MysqlError>;
