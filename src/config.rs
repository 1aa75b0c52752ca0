//! Application configuration from environment variables.
//!
//! The dashboard is single-user and binds loopback by default; everything is
//! overridable through `FINDASH_*` variables so no config file is needed.

use std::time::Duration;

/// Runtime configuration for the server and provider clients.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Base URL of the price-history provider.
    pub market_base_url: String,
    /// Base URL of the news provider.
    pub news_base_url: String,
    /// Base URL of the macro-data provider.
    pub macro_base_url: String,
    /// Per-request timeout for all provider calls.
    pub provider_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8050,
            market_base_url: "https://query1.finance.yahoo.com".into(),
            news_base_url: "http://127.0.0.1:8061".into(),
            macro_base_url: "http://127.0.0.1:8062".into(),
            provider_timeout: Duration::from_secs(8),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("FINDASH_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let host = std::env::var("FINDASH_HOST").unwrap_or(defaults.host);

        let market_base_url =
            std::env::var("FINDASH_MARKET_URL").unwrap_or(defaults.market_base_url);
        let news_base_url = std::env::var("FINDASH_NEWS_URL").unwrap_or(defaults.news_base_url);
        let macro_base_url = std::env::var("FINDASH_MACRO_URL").unwrap_or(defaults.macro_base_url);

        let provider_timeout = std::env::var("FINDASH_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.provider_timeout);

        Self {
            host,
            port,
            market_base_url,
            news_base_url,
            macro_base_url,
            provider_timeout,
        }
    }

    /// Get bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
