//! Database liveness heartbeat.

use std::time::Duration;

use astview_db_mysql::{MySqlPool, ping};
use tokio::time::{Instant, interval_at};
use tracing::error;

/// Period of the liveness probe. Fixed by contract, not configuration.
pub const HEARTBEAT_PERIOD: Duration = Duration::from_secs(10);

/// Pings the database every [`HEARTBEAT_PERIOD`], forever.
///
/// A failed ping is fatal: the daemon logs it and exits with code 1 so the
/// supervisor restarts it against a healthy connection. No retry.
pub async fn run(pool: MySqlPool) {
    // First ping one full period in; the pool connected eagerly at startup,
    // so liveness at time zero is already known.
    let mut ticker = interval_at(Instant::now() + HEARTBEAT_PERIOD, HEARTBEAT_PERIOD);
    loop {
        ticker.tick().await;
        if let Err(err) = ping(&pool).await {
            error!(error = %err, "Database heartbeat failed, shutting down");
            std::process::exit(1);
        }
    }
}
