//! The reconciliation loop: probe every catalog view, create what is
//! missing, repeat on a fixed period.

use std::time::Duration;

use astview_core::{HostIdentity, view_defs};
use astview_db_mysql::{EnsureOutcome, ViewManager};
use tokio::time::interval;
use tracing::{debug, info, warn};

/// Counts from one reconciliation pass. Used for logging only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Views probed, after scope filtering.
    pub checked: usize,
    /// Views created by this pass.
    pub created: usize,
    /// Creation attempts that failed.
    pub failed: usize,
}

/// Drives the probe-then-create cycle over the view catalog.
#[derive(Debug, Clone)]
pub struct Reconciler {
    manager: ViewManager,
    host: HostIdentity,
}

impl Reconciler {
    pub fn new(manager: ViewManager, host: HostIdentity) -> Self {
        Self { manager, host }
    }

    /// Runs one pass over the catalog, in declared order.
    ///
    /// Views outside this host's scope are never probed. A failure stays
    /// contained to its own view; the pass always reaches the end of the
    /// catalog.
    pub async fn run_pass(&self) -> PassSummary {
        let mut summary = PassSummary::default();

        for def in view_defs(&self.host) {
            if !def.applies_to(&self.host) {
                continue;
            }
            summary.checked += 1;

            match self.manager.ensure(&def).await {
                Ok(EnsureOutcome::AlreadyPresent) => {}
                Ok(EnsureOutcome::Created) => {
                    info!(view = %def.name, "Created view");
                    summary.created += 1;
                }
                Err(err) => {
                    warn!(view = %def.name, error = %err, "Unable to create view");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Runs forever: one pass immediately, then one every `period`.
    ///
    /// Each pass is spawned, not awaited, so a pass outliving the period
    /// overlaps the next one. A duplicate CREATE then loses the race in the
    /// database and is swallowed like any other creation failure.
    pub async fn run(&self, period: Duration) {
        info!(interval_sec = period.as_secs(), "View reconciler started");

        let mut ticker = interval(period);
        loop {
            ticker.tick().await;

            let reconciler = self.clone();
            tokio::spawn(async move {
                let summary = reconciler.run_pass().await;
                debug!(
                    checked = summary.checked,
                    created = summary.created,
                    failed = summary.failed,
                    "Reconciliation pass finished"
                );
            });
        }
    }
}
