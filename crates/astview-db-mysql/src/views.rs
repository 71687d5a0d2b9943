//! Existence probing and creation of catalog views.

use astview_core::ViewDef;
use sqlx_mysql::MySqlPool;
use tracing::{debug, instrument};

use crate::error::{MysqlError, Result, is_unknown_table};

/// Outcome of [`ViewManager::ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The probe succeeded; nothing was done.
    AlreadyPresent,
    /// The probe failed and the view was created.
    Created,
}

/// Probes and creates catalog views against one database.
///
/// Existence is re-checked on every call on purpose: a view dropped out from
/// under the daemon must come back on the next pass, so prior probe results
/// are never cached. An existing view is taken at face value; its definition
/// is never inspected or repaired.
#[derive(Debug, Clone)]
pub struct ViewManager {
    pool: MySqlPool,
}

impl ViewManager {
    /// Creates a manager over the given pool.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Tests whether the view resolves.
    ///
    /// Any failure reads as "absent": an unknown-table error is the expected
    /// shape, and anything else (lost connection, broken definition) also
    /// leads to a creation attempt, whose own error is the one worth
    /// reporting.
    #[instrument(skip(self, def), fields(view = %def.name))]
    pub async fn probe(&self, def: &ViewDef) -> bool {
        match sqlx_core::query::query(&def.probe_sql())
            .fetch_optional(&self.pool)
            .await
        {
            Ok(_) => true,
            Err(err) if is_unknown_table(&err) => {
                debug!("view not present");
                false
            }
            Err(err) => {
                debug!(error = %err, "view probe failed");
                false
            }
        }
    }

    /// Creates the view inside a transaction.
    ///
    /// The transaction is rolled back when the CREATE fails; the rollback's
    /// own outcome never shadows the creation error.
    #[instrument(skip(self, def), fields(view = %def.name))]
    pub async fn create(&self, def: &ViewDef) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if let Err(err) = sqlx_core::query::query(&def.create_sql())
            .execute(&mut *tx)
            .await
        {
            if let Err(rollback_err) = tx.rollback().await {
                debug!(error = %rollback_err, "rollback after failed CREATE VIEW also failed");
            }
            return Err(MysqlError::CreateView {
                name: def.name.clone(),
                source: err,
            });
        }
        tx.commit().await?;
        debug!("view created");
        Ok(())
    }

    /// Ensures the view exists, creating it when the probe fails.
    pub async fn ensure(&self, def: &ViewDef) -> Result<EnsureOutcome> {
        if self.probe(def).await {
            return Ok(EnsureOutcome::AlreadyPresent);
        }
        self.create(def).await?;
        Ok(EnsureOutcome::Created)
    }
}
