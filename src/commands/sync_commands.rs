use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use super::CommandError;
use crate::application::AppState;
use crate::domain::SyncReport;

pub const SYNC_SUCCESS_MESSAGE: &str = "Data update successful.";

#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub report: SyncReport,
}

/// Run one full sync and return its report
///
/// Every sync failure, cancellation included, surfaces as
/// `CommandError::SourceUnavailable`.
pub async fn trigger_sync(state: &AppState) -> Result<SyncResponse, CommandError> {
    info!("Starting Pokemon data update");

    match state.orchestrator.run_full_sync().await {
        Ok(report) => {
            info!("{}", SYNC_SUCCESS_MESSAGE);
            Ok(SyncResponse {
                message: SYNC_SUCCESS_MESSAGE.to_string(),
                report,
            })
        }
        Err(err) => {
            error!(kind = err.kind(), "Pokemon data update failed: {}", err);
            Err(CommandError::SourceUnavailable)
        }
    }
}

/// Sync now and then every `every` until the state's token is cancelled
pub async fn run_scheduled_sync(state: &AppState, every: Duration) -> usize {
    info!("Scheduling Pokemon data update every {:?}", every);
    state.orchestrator.run_every(every).await
}
