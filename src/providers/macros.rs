//! Macro-indicator client.
//!
//! Talks to an indicator endpoint: `GET {base}/v1/indicators`. The contract
//! is a list of named readings, each a latest numeric value plus unit and
//! as-of date. The dashboard's side panel covers the 10Y treasury yield, a
//! CPI inflation proxy, and gold/oil/bitcoin quotes, but the client carries
//! whatever the provider sends. Bad rows are skipped, never fatal.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use super::{build_http_client, status_error, MacroFeed, ProviderError, ProviderResult};
use crate::models::{MacroReading, MacroSnapshot, RawUnit};

/// HTTP client for the macro-data provider.
#[derive(Debug, Clone)]
pub struct MacroClient {
    http: reqwest::Client,
    base_url: String,
}

impl MacroClient {
    /// Create a client with the mandatory per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MacroFeed for MacroClient {
    async fn fetch_macro_snapshot(&self) -> ProviderResult<MacroSnapshot> {
        let url = format!("{}/v1/indicators", self.base_url);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, None));
        }

        let envelope = response.json::<MacroEnvelope>().await?;
        let snapshot = snapshot_from_envelope(envelope);
        tracing::debug!(readings = snapshot.readings.len(), "macro snapshot fetched");
        Ok(snapshot)
    }
}

/// Decode readings row by row, preserving provider order.
fn snapshot_from_envelope(envelope: MacroEnvelope) -> MacroSnapshot {
    let readings = envelope
        .indicators
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| match serde_json::from_value::<MacroRow>(raw) {
            Ok(row) => Some(row.into_reading()),
            Err(err) => {
                tracing::warn!(index = i, %err, "skipping malformed macro reading");
                None
            }
        })
        .collect();
    MacroSnapshot { readings }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct MacroEnvelope {
    #[serde(default)]
    indicators: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MacroRow {
    name: String,
    value: f64,
    unit: String,
    as_of: NaiveDate,
}

impl MacroRow {
    fn into_reading(self) -> MacroReading {
        MacroReading {
            name: self.name,
            value: self.value,
            unit: RawUnit::parse(&self.unit),
            as_of: self.as_of,
        }
    }
}
