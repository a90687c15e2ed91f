//! Pipeline-specific error types

use thiserror::Error;

/// Result type alias for pipeline operations
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Errors that abort an ingestion session or fail a progress query
///
/// Per-record validation failures are not errors; they are recorded as
/// failure details and counted, and processing continues.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The header row lacks a required column. Fatal to the session and
    /// surfaced as a client-input fault; no records are ever produced.
    #[error("Invalid CSV headers: missing required column '{0}'")]
    Schema(String),

    /// A row could not be parsed. Fatal to the session and surfaced as a
    /// processing fault.
    #[error("Error processing CSV stream: {0}")]
    Decode(String),

    /// The session store could not be read or written. Fatal to the session;
    /// the last durably written snapshot is left as-is.
    #[error("Session store error: {0}")]
    Store(String),

    /// A validation task aborted before reporting its record.
    #[error("Validation task failed: {0}")]
    Task(String),

    /// Progress query for an identifier never issued by a session start.
    #[error("Session not found: {0}")]
    NotFound(String),
}

impl From<csv_async::Error> for PipelineError {
    fn from(err: csv_async::Error) -> Self {
        PipelineError::Decode(err.to_string())
    }
}

impl PipelineError {
    /// Whether the fault is attributable to the caller's input rather than
    /// the system. Retries are only meaningful for non-client faults.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, PipelineError::Schema(_) | PipelineError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_missing_column() {
        let err = PipelineError::Schema("email".to_string());
        assert!(err.to_string().contains("email"));
        assert!(err.is_client_fault());
    }

    #[test]
    fn test_store_error_is_not_client_fault() {
        let err = PipelineError::Store("connection refused".to_string());
        assert!(!err.is_client_fault());
    }

    #[test]
    fn test_not_found_is_client_fault() {
        assert!(PipelineError::NotFound("123".to_string()).is_client_fault());
    }
}
