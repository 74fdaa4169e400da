//! Sync orchestrator
//!
//! Drives one full synchronization: discovery, then fetch and reconcile for
//! every discovered slot. Slots go through a `buffer_unordered` pool sized by
//! `sync.max_concurrency`; at the default of 1 the run is strictly sequential
//! in listing order. The first hard failure ends the run, entities committed
//! before it stay committed.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::application::catalog_discovery::CatalogDiscoveryService;
use crate::application::entity_fetcher::EntityFetcher;
use crate::application::progress::ProgressObserver;
use crate::application::upsert_reconciler::UpsertReconciler;
use crate::domain::{
    CatalogSource, FetchOutcome, IdLookup, PokemonRepository, SkippedEntity, SyncError,
    SyncProgress, SyncReport, UpsertKind,
};
use crate::infrastructure::config::SyncConfig;

enum SlotResult {
    Reconciled(UpsertKind),
    Skipped(SkippedEntity),
}

pub struct SyncOrchestrator {
    discovery: CatalogDiscoveryService,
    fetcher: EntityFetcher,
    reconciler: UpsertReconciler,
    observer: Arc<dyn ProgressObserver>,
    config: SyncConfig,
    cancellation: CancellationToken,
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        repository: Arc<dyn PokemonRepository>,
        observer: Arc<dyn ProgressObserver>,
        config: SyncConfig,
    ) -> Self {
        Self {
            discovery: CatalogDiscoveryService::new(source.clone()),
            fetcher: EntityFetcher::new(source),
            reconciler: UpsertReconciler::new(repository),
            observer,
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Share an externally owned token, e.g. one tied to Ctrl-C
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Mirror the whole upstream catalog once
    pub async fn run_full_sync(&self) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let ids = self.discovery.discover_all_ids().await?;
        let total = ids.len();
        let interval = self.config.progress_interval.max(1);

        info!(
            "🚀 Starting sync of {} pokemon (concurrency {})",
            total, self.config.max_concurrency
        );

        let mut processed = 0;
        let mut reconciled = 0;
        let mut created = 0;
        let mut skipped = Vec::new();

        if self.cancellation.is_cancelled() && total > 0 {
            return Err(SyncError::Cancelled { processed, total });
        }

        let mut slots = stream::iter(ids)
            .map(|lookup| self.process_slot(lookup))
            .buffer_unordered(self.config.max_concurrency.max(1));

        while let Some(result) = slots.next().await {
            match result {
                Ok(SlotResult::Reconciled(kind)) => {
                    reconciled += 1;
                    if kind == UpsertKind::Created {
                        created += 1;
                    }
                }
                Ok(SlotResult::Skipped(entity)) => skipped.push(entity),
                Err(err) => {
                    error!(
                        kind = err.kind(),
                        "Sync aborted after {} of {} pokemon: {}", processed, total, err
                    );
                    return Err(err);
                }
            }

            processed += 1;
            if processed % interval == 0 {
                self.observer.on_progress(&SyncProgress::new(processed, total));
            }

            if processed < total && self.cancellation.is_cancelled() {
                warn!("🛑 Sync cancelled after {} of {} pokemon", processed, total);
                return Err(SyncError::Cancelled { processed, total });
            }
        }

        let report = SyncReport {
            total,
            reconciled,
            created,
            skipped,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "✅ Sync completed: {} reconciled ({} new), {} skipped in {} ms",
            report.reconciled,
            report.created,
            report.skipped.len(),
            report.duration_ms()
        );
        Ok(report)
    }

    /// Run a full sync immediately and then every `period` until cancelled
    ///
    /// A failed run is logged and the schedule continues; a cancelled run
    /// ends the loop. Returns the number of runs that were started.
    pub async fn run_every(&self, period: Duration) -> usize {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut runs = 0;

        loop {
            tokio::select! {
                biased;
                () = self.cancellation.cancelled() => break,
                _ = ticker.tick() => {}
            }

            runs += 1;
            match self.run_full_sync().await {
                Ok(_) => {}
                Err(SyncError::Cancelled { .. }) => break,
                Err(err) => warn!("Scheduled sync #{} failed: {}", runs, err),
            }
        }

        info!("Sync schedule stopped after {} runs", runs);
        runs
    }

    async fn process_slot(&self, lookup: IdLookup) -> Result<SlotResult, SyncError> {
        match self.fetcher.fetch_detail(&lookup).await? {
            FetchOutcome::Fetched(payload) => {
                let kind = self.reconciler.reconcile(&payload).await?;
                Ok(SlotResult::Reconciled(kind))
            }
            FetchOutcome::Skipped(reason) => Ok(SlotResult::Skipped(SkippedEntity {
                id: lookup,
                reason,
            })),
        }
    }
}
