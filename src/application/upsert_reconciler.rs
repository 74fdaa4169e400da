//! Upsert reconciler
//!
//! Applies one fetched payload to the store. The repository runs the parent
//! and child writes in a single transaction; this layer attaches the entity
//! id to any failure so the run can report which entity broke.

use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::{PokemonPayload, PokemonRepository, SyncError, UpsertKind};

pub struct UpsertReconciler {
    repository: Arc<dyn PokemonRepository>,
}

impl UpsertReconciler {
    pub fn new(repository: Arc<dyn PokemonRepository>) -> Self {
        Self { repository }
    }

    pub async fn reconcile(&self, payload: &PokemonPayload) -> Result<UpsertKind, SyncError> {
        match self.repository.reconcile(payload).await {
            Ok(kind) => {
                debug!("Reconciled pokemon {} ({:?})", payload.id, kind);
                Ok(kind)
            }
            Err(source) => {
                error!("Reconciling pokemon {} rolled back: {}", payload.id, source);
                Err(SyncError::ReconcileFailed {
                    id: payload.id,
                    source,
                })
            }
        }
    }
}
