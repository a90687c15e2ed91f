//! Get upload status query
//!
//! Reads the latest persisted snapshot for a session and reports its
//! completion percentage. May be issued at any point in the session's
//! lifetime, including while decoding is still in progress.

use std::sync::Arc;

use evp_common::types::SessionStatus;
use evp_pipeline::{PipelineError, SessionManager};

/// Query for the progress of one upload session
#[derive(Debug, Clone)]
pub struct GetStatusQuery {
    pub session_id: String,
}

/// Resolve the progress of the identified session
#[tracing::instrument(skip(manager))]
pub async fn handle(
    manager: Arc<SessionManager>,
    query: GetStatusQuery,
) -> Result<SessionStatus, PipelineError> {
    manager.session_status(&query.session_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_carries_the_identifier() {
        let query = GetStatusQuery {
            session_id: "0192d5a0-0000-7000-8000-000000000000".to_string(),
        };
        assert_eq!(query.session_id.len(), 36);
    }
}
