//! Financial-news client.
//!
//! Talks to a headline endpoint: `GET {base}/v1/news?symbol={ticker}`.
//! Sentiment labels are computed upstream and passed through as-is; items
//! without a label default to neutral. One malformed item never blanks the
//! whole feed: bad rows are logged and skipped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::{build_http_client, status_error, NewsFeed, ProviderError, ProviderResult};
use crate::models::{normalize_ticker, NewsItem, Sentiment};

/// HTTP client for the news provider.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl NewsClient {
    /// Create a client with the mandatory per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl NewsFeed for NewsClient {
    async fn fetch_news(&self, ticker: &str) -> ProviderResult<Vec<NewsItem>> {
        let ticker = normalize_ticker(ticker)?;
        let url = format!("{}/v1/news", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("symbol", ticker.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, Some(&ticker)));
        }

        let envelope = response.json::<NewsEnvelope>().await?;
        let items = items_from_envelope(envelope, &ticker);
        tracing::debug!(%ticker, items = items.len(), "headlines fetched");
        Ok(items)
    }
}

/// Decode headline rows item by item, newest first.
fn items_from_envelope(envelope: NewsEnvelope, ticker: &str) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = envelope
        .items
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| match serde_json::from_value::<NewsRow>(raw) {
            Ok(row) => row.into_item(),
            Err(err) => {
                tracing::warn!(%ticker, index = i, %err, "skipping malformed headline");
                None
            }
        })
        .collect();

    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct NewsEnvelope {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct NewsRow {
    headline: String,
    source: String,
    /// Unix seconds.
    published_at: i64,
    #[serde(default)]
    sentiment: Sentiment,
}

impl NewsRow {
    fn into_item(self) -> Option<NewsItem> {
        let timestamp = DateTime::<Utc>::from_timestamp(self.published_at, 0)?;
        Some(NewsItem {
            headline: self.headline,
            source: self.source,
            timestamp,
            sentiment: self.sentiment,
        })
    }
}
