//! Background pruning of expired revocation records.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::store::RevocationStore;

/// Start the periodic revocation-record cleaner.
pub fn start_revocation_cleaner(
    store: Arc<dyn RevocationStore>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(interval);

        loop {
            interval_timer.tick().await;
            run_cleanup(Arc::clone(&store)).await;
        }
    })
}

async fn run_cleanup(store: Arc<dyn RevocationStore>) {
    // The durable tier does blocking IO; keep it off the runtime threads.
    let result = tokio::task::spawn_blocking(move || store.purge_expired()).await;

    match result {
        Ok(Ok(count)) if count > 0 => {
            debug!(purged = count, "Expired revocation records purged");
        }
        Ok(Ok(_)) => {}
        Ok(Err(e)) => error!(error = %e, "Failed to purge expired revocation records"),
        Err(e) => error!(error = %e, "Revocation cleanup task panicked"),
    }
}
