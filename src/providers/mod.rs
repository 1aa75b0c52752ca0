//! Data adapter over the external market-data, news, and macro providers.
//!
//! Each client normalizes one provider's wire format into the domain types in
//! [`crate::models`]; everything downstream depends only on the traits here,
//! so handlers and tests can swap in stubs.
//!
//! Failure taxonomy:
//! - [`ProviderError::Validation`] — bad selection values, caught before any
//!   network call.
//! - [`ProviderError::UnknownTicker`] — the provider reports the symbol does
//!   not exist.
//! - [`ProviderError::Unavailable`] — network failure or timeout. Never
//!   retried here; refresh is a user action.
//! - [`ProviderError::Format`] — a payload that cannot be interpreted. A
//!   malformed *item* is skipped with a warning; only a malformed envelope
//!   surfaces as this error.

pub mod macros;
pub mod market;
pub mod news;

pub use macros::MacroClient;
pub use market::MarketClient;
pub use news::NewsClient;

use async_trait::async_trait;

use crate::models::{
    Interval, MacroSnapshot, NewsItem, Period, PriceBar, ValidationError,
};

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by provider clients.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Selection values the adapter refuses to send upstream.
    #[error("invalid selection: {0}")]
    Validation(#[from] ValidationError),

    /// The provider reports the symbol does not exist.
    #[error("unknown ticker '{0}'")]
    UnknownTicker(String),

    /// Network failure or timeout reaching the provider.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Payload that does not match the provider's documented shape.
    #[error("malformed provider payload: {0}")]
    Format(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Format(err.to_string())
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}

/// Price-history side of the data adapter.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch OHLCV history for a symbol, chronological.
    ///
    /// An empty Vec means the provider has no rows for the range; that is a
    /// valid answer, not an error.
    async fn fetch_prices(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> ProviderResult<Vec<PriceBar>>;

    /// Fetch the most recent quote for a symbol, if the provider has one.
    async fn fetch_latest_price(&self, ticker: &str) -> ProviderResult<Option<f64>>;
}

/// Headline side of the data adapter.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Fetch recent headlines for a symbol, newest first.
    async fn fetch_news(&self, ticker: &str) -> ProviderResult<Vec<NewsItem>>;
}

/// Macro-data provider: indicator name to latest value plus as-of date.
#[async_trait]
pub trait MacroFeed: Send + Sync {
    /// Fetch the current raw macro snapshot.
    async fn fetch_macro_snapshot(&self) -> ProviderResult<MacroSnapshot>;
}

/// Shared reqwest client construction: every provider call gets the same
/// mandatory timeout and user agent.
pub(crate) fn build_http_client(
    timeout: std::time::Duration,
) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("findash/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::Unavailable(e.to_string()))
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn status_error(status: reqwest::StatusCode, ticker: Option<&str>) -> ProviderError {
    match (status.as_u16(), ticker) {
        (404, Some(symbol)) => ProviderError::UnknownTicker(symbol.to_string()),
        _ => ProviderError::Unavailable(format!("provider returned HTTP {status}")),
    }
}
