//! Common types used across EVP

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One decoded input row
///
/// Produced by the record decoder and consumed exactly once by a validation
/// task. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub name: String,
    pub email: String,
}

impl EmailRecord {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Result of applying the validation capability to one record's email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    /// A passing outcome
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    /// A failing outcome with a reason
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// A record that failed validation
///
/// Appended to a session's failure list; never mutated after append. The
/// order of entries reflects completion order of validation tasks, not input
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub name: String,
    pub email: String,
    pub error: String,
}

/// Aggregate state of one ingestion session
///
/// Invariant: `processed_records + failed_records <= total_records` at all
/// times; equality holds once the stream is fully decoded and all validation
/// tasks have completed. This is also the completion report returned to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub total_records: u64,
    pub processed_records: u64,
    pub failed_records: u64,
    pub details: Vec<FailureDetail>,
}

impl SessionState {
    /// Create the all-zero state a session starts from
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            total_records: 0,
            processed_records: 0,
            failed_records: 0,
            details: Vec::new(),
        }
    }

    /// Completion percentage of this snapshot
    ///
    /// Zero when no records have been decoded yet.
    pub fn progress_percent(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        (self.processed_records + self.failed_records) as f64 / self.total_records as f64 * 100.0
    }

    /// Serialize for persistence in the session store
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a persisted snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Response to a progress query for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub progress: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_zeroed() {
        let state = SessionState::new("abc");
        assert_eq!(state.session_id, "abc");
        assert_eq!(state.total_records, 0);
        assert_eq!(state.processed_records, 0);
        assert_eq!(state.failed_records, 0);
        assert!(state.details.is_empty());
    }

    #[test]
    fn test_progress_percent_empty_session() {
        let state = SessionState::new("abc");
        assert_eq!(state.progress_percent(), 0.0);
    }

    #[test]
    fn test_progress_percent_partial() {
        let mut state = SessionState::new("abc");
        state.total_records = 4;
        state.processed_records = 1;
        state.failed_records = 1;
        assert_eq!(state.progress_percent(), 50.0);
    }

    #[test]
    fn test_state_json_round_trip() {
        let mut state = SessionState::new("abc");
        state.total_records = 2;
        state.failed_records = 1;
        state.details.push(FailureDetail {
            name: "Test".to_string(),
            email: "testgmail.com".to_string(),
            error: "Invalid email address".to_string(),
        });

        let json = state.to_json().unwrap();
        let restored = SessionState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_outcome_constructors() {
        assert!(ValidationOutcome::valid().is_valid);
        let outcome = ValidationOutcome::invalid("bad");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error.as_deref(), Some("bad"));
    }
}
