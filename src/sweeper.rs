//! Expiry sweeper
//!
//! Background task that enforces the retention window: on a fixed interval it
//! lists expired artifact sets and purges them. A purge failure for one
//! identifier is logged and never aborts the rest of the sweep.

use std::time::{Duration, SystemTime};

use crate::store::ArtifactStore;

/// Timer-driven cleanup of expired artifact sets.
pub struct Sweeper {
    store: ArtifactStore,
    retention: Duration,
    interval: Duration,
}

impl Sweeper {
    pub fn new(store: ArtifactStore, retention: Duration, interval: Duration) -> Self {
        Self {
            store,
            retention,
            interval,
        }
    }

    /// Spawn the sweep loop. Runs until the handle is aborted at shutdown.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick fires immediately; it reclaims leftovers from a
            // previous process run before the regular cadence starts.
            loop {
                ticker.tick().await;
                self.sweep_once(SystemTime::now()).await;
            }
        })
    }

    /// Run one sweep pass. Returns the number of purged identifiers.
    pub async fn sweep_once(&self, now: SystemTime) -> usize {
        let expired = match self.store.list_expired(now, self.retention).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Sweep scan failed: {}", e);
                return 0;
            }
        };

        let mut purged = 0;
        for id in expired {
            match self.store.purge(&id).await {
                Ok(()) => {
                    tracing::debug!(request_id = %id, "Purged expired artifact set");
                    purged += 1;
                }
                Err(e) => {
                    tracing::warn!(request_id = %id, "Failed to purge artifact set: {}", e);
                }
            }
        }

        if purged > 0 {
            tracing::info!(count = purged, "Purged expired artifact sets");
        }

        purged
    }
}
