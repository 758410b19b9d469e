//! Job ledger persistence.
//!
//! The ledger is one JSON document read and rewritten in full; there are no
//! partial or merge semantics. There is deliberately no version stamp or
//! conditional write: at-most-one concurrent invocation per stage must be
//! enforced by the external trigger (e.g. a single-concurrency schedule).
//! Callers reload before acting and save only after all mutations.

use std::sync::Arc;

use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, info};

use quizforge_shared::{JobLedger, QuizForgeError, Result};

/// Full-document load/save of the [`JobLedger`] at a fixed key.
pub struct LedgerStore {
    store: Arc<dyn ObjectStore>,
    key: Path,
}

impl LedgerStore {
    /// A ledger store at `key` within `store`.
    pub fn new(store: Arc<dyn ObjectStore>, key: &str) -> Self {
        Self {
            store,
            key: Path::from(key),
        }
    }

    /// Read and parse the entire ledger document.
    pub async fn load(&self) -> Result<JobLedger> {
        let result = self.store.get(&self.key).await.map_err(|e| {
            QuizForgeError::PersistenceFailed(format!("ledger read at '{}': {e}", self.key))
        })?;

        let bytes = result.bytes().await.map_err(|e| {
            QuizForgeError::PersistenceFailed(format!("ledger read at '{}': {e}", self.key))
        })?;

        let ledger: JobLedger = serde_json::from_slice(&bytes).map_err(|e| {
            QuizForgeError::PersistenceFailed(format!("ledger parse at '{}': {e}", self.key))
        })?;

        debug!(records = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    /// Like [`load`](Self::load), but a missing document yields an empty
    /// ledger. Used to bootstrap the document on first `add`.
    pub async fn load_or_default(&self) -> Result<JobLedger> {
        match self.store.get(&self.key).await {
            Ok(result) => {
                let bytes = result.bytes().await.map_err(|e| {
                    QuizForgeError::PersistenceFailed(format!(
                        "ledger read at '{}': {e}",
                        self.key
                    ))
                })?;
                serde_json::from_slice(&bytes).map_err(|e| {
                    QuizForgeError::PersistenceFailed(format!(
                        "ledger parse at '{}': {e}",
                        self.key
                    ))
                })
            }
            Err(object_store::Error::NotFound { .. }) => {
                debug!(key = %self.key, "no ledger document yet, starting empty");
                Ok(JobLedger::new())
            }
            Err(e) => Err(QuizForgeError::PersistenceFailed(format!(
                "ledger read at '{}': {e}",
                self.key
            ))),
        }
    }

    /// Serialize and write the entire ledger document.
    pub async fn save(&self, ledger: &JobLedger) -> Result<()> {
        let body = serde_json::to_vec_pretty(ledger).map_err(|e| {
            QuizForgeError::PersistenceFailed(format!("ledger serialize: {e}"))
        })?;

        self.store
            .put(&self.key, PutPayload::from(body))
            .await
            .map_err(|e| {
                QuizForgeError::PersistenceFailed(format!("ledger write at '{}': {e}", self.key))
            })?;

        info!(records = ledger.len(), key = %self.key, "ledger saved");
        Ok(())
    }
}
