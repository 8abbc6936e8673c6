//! Client configuration

use std::time::Duration;

/// Configuration for connecting to the inventory API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Extra attempts for failed reads. Mutations never retry.
    pub retry_attempts: u32,

    /// How long the category list may be served from cache. Categories
    /// change rarely, so minutes are fine.
    pub category_ttl: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            retry_attempts: 1,
            category_ttl: Duration::from_secs(5 * 60),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the number of read retry attempts
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Set the category cache lifetime
    pub fn with_category_ttl(mut self, ttl: Duration) -> Self {
        self.category_ttl = ttl;
        self
    }

    /// Build a configuration from `PESTLE_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("PESTLE_API_URL") {
            config.base_url = url;
        }
        if let Some(timeout) = env_parse("PESTLE_TIMEOUT_SECS") {
            config.timeout = timeout;
        }
        if let Some(attempts) = env_parse("PESTLE_RETRY_ATTEMPTS") {
            config.retry_attempts = attempts;
        }
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("http://inventory.local/api")
            .with_timeout(5)
            .with_retry_attempts(0)
            .with_category_ttl(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://inventory.local/api");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.retry_attempts, 0);
        assert_eq!(config.category_ttl, Duration::from_secs(60));
    }
}
