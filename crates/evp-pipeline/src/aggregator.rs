//! Progress aggregation for one ingestion session
//!
//! The aggregator owns exactly one [`SessionState`] and serializes every
//! mutation behind a mutex, so concurrent validation-task completions never
//! lose an increment or reorder the append-only failure list. The
//! write-through store write happens while the lock is held, which makes all
//! store writes for a session total-ordered without any store-side
//! coordination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{PipelineError, PipelineResult};
use crate::store::SessionStore;
use evp_common::types::{EmailRecord, FailureDetail, SessionState};

/// Concurrency-safe owner of one session's aggregate state
pub struct ProgressAggregator {
    session_id: String,
    state: Mutex<SessionState>,
    store: Arc<dyn SessionStore>,
    failed: AtomicBool,
}

impl ProgressAggregator {
    /// Create an aggregator with all-zero counters for `session_id`
    pub fn new(session_id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        let session_id = session_id.into();
        Self {
            state: Mutex::new(SessionState::new(session_id.clone())),
            session_id,
            store,
            failed: AtomicBool::new(false),
        }
    }

    /// Identifier of the session this aggregator owns
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Count one decoded record
    ///
    /// Called once per record as it is decoded, independent of validation
    /// outcome, so the total reflects decode progress even while validations
    /// are still pending. Does not persist.
    pub async fn record_started(&self) {
        let mut state = self.state.lock().await;
        state.total_records += 1;
    }

    /// Count one record that passed validation and persist a snapshot
    pub async fn record_processed(&self, record: &EmailRecord) -> PipelineResult<()> {
        let mut state = self.state.lock().await;
        state.processed_records += 1;
        tracing::info!(
            session_id = %self.session_id,
            email = %record.email,
            "Valid email"
        );
        self.persist_locked(&state).await
    }

    /// Count one record that failed validation, append its failure detail,
    /// and persist a snapshot
    pub async fn record_failed(
        &self,
        record: &EmailRecord,
        reason: impl Into<String>,
    ) -> PipelineResult<()> {
        let reason = reason.into();
        let mut state = self.state.lock().await;
        state.failed_records += 1;
        state.details.push(FailureDetail {
            name: record.name.clone(),
            email: record.email.clone(),
            error: reason.clone(),
        });
        tracing::warn!(
            session_id = %self.session_id,
            email = %record.email,
            reason = %reason,
            "Email failed validation"
        );
        self.persist_locked(&state).await
    }

    /// Immutable copy of the current state
    ///
    /// Safe to persist or serve to a reader concurrently with ongoing
    /// mutation.
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Persist the current state without mutating it
    ///
    /// Used for the initial all-zero write when a session is created and for
    /// the final write when it completes.
    pub async fn persist(&self) -> PipelineResult<()> {
        let state = self.state.lock().await;
        self.persist_locked(&state).await
    }

    /// Whether a store write has failed for this session
    ///
    /// Sticky: once set, the session manager halts further processing.
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Write `state` through to the store; the state lock is held by the
    /// caller, which totally orders the writes
    async fn persist_locked(&self, state: &SessionState) -> PipelineResult<()> {
        let json = state
            .to_json()
            .map_err(|e| self.fail(format!("Failed to encode snapshot: {}", e)))?;

        self.store
            .put(&self.session_id, json)
            .await
            .map_err(|e| self.fail(format!("Failed to persist snapshot: {}", e)))
    }

    /// Mark the session failed and build the store error
    fn fail(&self, message: String) -> PipelineError {
        self.failed.store(true, Ordering::SeqCst);
        tracing::error!(session_id = %self.session_id, error = %message, "Session store failure");
        PipelineError::Store(message)
    }
}
