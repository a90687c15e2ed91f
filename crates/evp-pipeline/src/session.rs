//! Session orchestration
//!
//! The session manager drives one upload end to end: it allocates the session
//! identifier, persists the initial all-zero state, streams records out of
//! the decoder into concurrency-limited validation tasks, awaits every
//! outstanding task once the stream ends, and persists the final snapshot.
//! A separate read path answers progress queries from the latest persisted
//! snapshot at any point in the session's lifetime.

use std::sync::Arc;
use tokio::io::AsyncRead;
use uuid::Uuid;

use crate::aggregator::ProgressAggregator;
use crate::decoder::RecordDecoder;
use crate::error::{PipelineError, PipelineResult};
use crate::limiter::{TaskLimiter, DEFAULT_VALIDATION_CONCURRENCY};
use crate::store::SessionStore;
use crate::validate::EmailValidator;
use evp_common::types::{EmailRecord, SessionState, SessionStatus};

/// Failure reason for records whose name field is empty
pub const REASON_NAME_EMPTY: &str = "Name field is empty";

/// Default failure reason when the validator rejects an email without detail
pub const REASON_INVALID_EMAIL: &str = "Invalid email address";

/// Default failure reason when the validation call itself fails silently
pub const REASON_VALIDATION_ERROR: &str = "Error validating email";

/// Orchestrates decode, validation, aggregation, and finalization for
/// ingestion sessions, and answers progress queries by identifier
pub struct SessionManager {
    validator: Arc<dyn EmailValidator>,
    store: Arc<dyn SessionStore>,
    concurrency: usize,
}

impl SessionManager {
    /// Create a manager over the injected validation and store capabilities
    pub fn new(validator: Arc<dyn EmailValidator>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            validator,
            store,
            concurrency: DEFAULT_VALIDATION_CONCURRENCY,
        }
    }

    /// Override the validation concurrency bound (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run one complete ingestion session over a CSV byte stream
    ///
    /// Decoding and validation are concurrent: the decoder keeps producing
    /// records while up to the configured number of validation tasks run.
    /// Returns the final report once the stream is exhausted and every
    /// validation task has resolved.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Schema`] or [`PipelineError::Decode`] when the stream
    /// is unusable, [`PipelineError::Store`] when a snapshot cannot be
    /// persisted. Partial state already persisted is left as-is.
    #[tracing::instrument(skip(self, reader))]
    pub async fn ingest<R>(&self, reader: R) -> PipelineResult<SessionState>
    where
        R: AsyncRead + Unpin + Send,
    {
        let session_id = Uuid::now_v7().to_string();
        let aggregator = Arc::new(ProgressAggregator::new(
            session_id.clone(),
            Arc::clone(&self.store),
        ));

        // Created: the all-zero state is visible to status queries before
        // the first record decodes
        aggregator.persist().await?;
        tracing::info!(session_id = %session_id, "Session created");

        // Schema validation happens here, before any task is submitted
        let mut decoder = RecordDecoder::new(reader).await?;

        let limiter = TaskLimiter::new(self.concurrency);
        let mut handles = Vec::new();

        // Decoding: submission never blocks on a busy validator slot
        while let Some(record) = decoder.next_record().await? {
            if aggregator.is_failed() {
                return Err(PipelineError::Store(
                    "Session store failed during validation".to_string(),
                ));
            }

            aggregator.record_started().await;
            let validator = Arc::clone(&self.validator);
            let task_aggregator = Arc::clone(&aggregator);
            handles.push(limiter.spawn(async move {
                run_validation(record, validator, task_aggregator).await
            }));
        }

        tracing::debug!(
            session_id = %session_id,
            submitted = handles.len(),
            "Decode complete, awaiting outstanding validations"
        );

        // Finalizing: wait for every outstanding task; on the first fatal
        // error the rest are cancelled
        let mut outcome: PipelineResult<()> = Ok(());
        for handle in handles {
            if outcome.is_err() {
                handle.abort();
                continue;
            }
            outcome = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(PipelineError::Task(join_err.to_string())),
            };
        }
        outcome?;

        // Complete: persist the final snapshot and return it
        aggregator.persist().await?;
        let report = aggregator.snapshot().await;
        tracing::info!(
            session_id = %session_id,
            total_records = report.total_records,
            processed_records = report.processed_records,
            failed_records = report.failed_records,
            "Session complete"
        );

        Ok(report)
    }

    /// Read the latest persisted snapshot for `session_id` and compute its
    /// completion percentage
    ///
    /// Reflects whatever was last written through, which may lag the true
    /// at-this-instant state. Repeated queries for a completed session return
    /// identical results.
    pub async fn session_status(&self, session_id: &str) -> PipelineResult<SessionStatus> {
        let value = self
            .store
            .get(session_id)
            .await
            .map_err(|e| PipelineError::Store(format!("Failed to read session store: {}", e)))?;

        let Some(json) = value else {
            return Err(PipelineError::NotFound(session_id.to_string()));
        };

        let state = SessionState::from_json(&json)
            .map_err(|e| PipelineError::Store(format!("Corrupt session snapshot: {}", e)))?;

        Ok(SessionStatus {
            session_id: session_id.to_string(),
            progress: format_progress(state.progress_percent()),
        })
    }
}

/// Apply the validation capability to one record and report the outcome
///
/// Exactly one of `record_processed` / `record_failed` is called per record.
/// Records with an empty name are failed structurally without invoking the
/// validator.
async fn run_validation(
    record: EmailRecord,
    validator: Arc<dyn EmailValidator>,
    aggregator: Arc<ProgressAggregator>,
) -> PipelineResult<()> {
    if record.name.is_empty() {
        return aggregator.record_failed(&record, REASON_NAME_EMPTY).await;
    }

    match validator.validate(&record.email).await {
        Ok(outcome) if outcome.is_valid => aggregator.record_processed(&record).await,
        Ok(outcome) => {
            let reason = outcome
                .error
                .unwrap_or_else(|| REASON_INVALID_EMAIL.to_string());
            aggregator.record_failed(&record, reason).await
        }
        Err(err) => {
            let message = err.to_string();
            let reason = if message.is_empty() {
                REASON_VALIDATION_ERROR.to_string()
            } else {
                message
            };
            aggregator.record_failed(&record, reason).await
        }
    }
}

/// Render a completion percentage the way the status endpoint reports it
///
/// Whole percentages print without a fraction ("50%"), anything else with
/// two decimals ("66.67%").
pub fn format_progress(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{}%", percent as u64)
    } else {
        format!("{:.2}%", percent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progress_whole() {
        assert_eq!(format_progress(0.0), "0%");
        assert_eq!(format_progress(50.0), "50%");
        assert_eq!(format_progress(100.0), "100%");
    }

    #[test]
    fn test_format_progress_fractional() {
        assert_eq!(format_progress(200.0 / 3.0), "66.67%");
        assert_eq!(format_progress(12.5), "12.50%");
    }
}
