//! Progress sinks for a running sync

use tracing::info;

use crate::domain::SyncProgress;

/// Receives a `SyncProgress` every `progress_interval` processed identifiers
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: &SyncProgress);
}

/// Logs `"<pct>% completed"` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressObserver;

impl ProgressObserver for TracingProgressObserver {
    fn on_progress(&self, progress: &SyncProgress) {
        info!(
            processed = progress.processed,
            total = progress.total,
            "{}% completed",
            progress.percentage
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressObserver;

impl ProgressObserver for NoopProgressObserver {
    fn on_progress(&self, _progress: &SyncProgress) {}
}
