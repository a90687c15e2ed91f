//! Rate limiting configuration for the upload surface
//!
//! The layer itself is assembled in `main.rs` with `tower_governor`; this
//! module owns the configuration and the translation from a requests-per-
//! minute budget to the governor's replenishment parameters.

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per minute allowed
    pub requests_per_minute: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 50,
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            requests_per_minute: std::env::var("RATE_LIMIT_REQUESTS_PER_MINUTE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(50),
        }
    }

    /// Milliseconds between token replenishments
    ///
    /// For 50 requests per minute: 60,000ms / 50 = one request every 1,200ms.
    pub fn replenish_interval_ms(&self) -> u64 {
        60_000 / self.requests_per_minute.max(1)
    }

    /// Number of requests allowed before rate limiting kicks in
    pub fn burst_size(&self) -> u32 {
        u32::try_from(self.requests_per_minute).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_config_default() {
        let config = RateLimitConfig::default();
        assert_eq!(config.requests_per_minute, 50);
    }

    #[test]
    fn test_replenish_interval() {
        let config = RateLimitConfig {
            requests_per_minute: 100,
        };
        assert_eq!(config.replenish_interval_ms(), 600);
        assert_eq!(config.burst_size(), 100);
    }

    #[test]
    fn test_rate_limit_config_from_env() {
        std::env::set_var("RATE_LIMIT_REQUESTS_PER_MINUTE", "120");

        let config = RateLimitConfig::from_env();
        assert_eq!(config.requests_per_minute, 120);

        std::env::remove_var("RATE_LIMIT_REQUESTS_PER_MINUTE");
    }
}
