//! Email validation capability
//!
//! The pipeline treats the validator as a black box with unspecified latency:
//! it may return a passing or failing outcome, or fail outright. All three
//! shapes are tolerated by the validation task; none of them aborts a
//! session.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

use evp_common::types::ValidationOutcome;

/// Default artificial latency of the mock validator
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(100);

/// Injected predicate deciding whether an email is acceptable
#[async_trait]
pub trait EmailValidator: Send + Sync {
    /// Validate one email address
    ///
    /// An `Err` return is treated like a failing outcome by the caller, using
    /// the error's message as the failure reason.
    async fn validate(&self, email: &str) -> anyhow::Result<ValidationOutcome>;
}

/// Mock validation capability
///
/// Accepts any email containing `@`, after an artificial delay standing in
/// for a real upstream verification call.
#[derive(Debug, Clone)]
pub struct MockEmailValidator {
    latency: Duration,
}

impl MockEmailValidator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockEmailValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_LATENCY)
    }
}

#[async_trait]
impl EmailValidator for MockEmailValidator {
    async fn validate(&self, email: &str) -> anyhow::Result<ValidationOutcome> {
        tracing::trace!(email = %email, "Validating email");
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        if email.contains('@') {
            Ok(ValidationOutcome::valid())
        } else {
            Ok(ValidationOutcome::invalid("Invalid email address"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn instant_validator() -> MockEmailValidator {
        MockEmailValidator::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_accepts_email_with_at_sign() {
        let outcome = instant_validator().validate("alice@x.com").await.unwrap();
        assert!(outcome.is_valid);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_rejects_email_without_at_sign() {
        let outcome = instant_validator().validate("dgmail.com").await.unwrap();
        assert!(!outcome.is_valid);
        assert_eq!(outcome.error.as_deref(), Some("Invalid email address"));
    }

    #[tokio::test]
    async fn test_rejects_empty_email() {
        let outcome = instant_validator().validate("").await.unwrap();
        assert!(!outcome.is_valid);
    }
}
