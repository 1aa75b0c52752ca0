//! Price-history client.
//!
//! Talks to a Yahoo-chart-shaped endpoint:
//! `GET {base}/v8/finance/chart/{symbol}?range={period}&interval={interval}`.
//! The response nests OHLCV columns under `chart.result[0].indicators.quote[0]`
//! with one entry per timestamp; entries can be null for halted buckets and
//! are skipped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::{build_http_client, status_error, MarketData, ProviderError, ProviderResult};
use crate::models::{normalize_ticker, Interval, Period, PriceBar};

/// HTTP client for the price-history provider.
#[derive(Debug, Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketClient {
    /// Create a client with the mandatory per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    async fn get_chart(
        &self,
        ticker: &str,
        range: &str,
        interval: &str,
    ) -> ProviderResult<ChartEnvelope> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let response = self
            .http
            .get(&url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Unknown symbols come back as 404 with an error envelope; fall
            // back to the status mapping when the body is not parseable.
            if let Ok(envelope) = response.json::<ChartEnvelope>().await {
                if let Some(error) = envelope.chart.error {
                    return Err(chart_error(error, ticker));
                }
            }
            return Err(status_error(status, Some(ticker)));
        }

        Ok(response.json::<ChartEnvelope>().await?)
    }
}

#[async_trait]
impl MarketData for MarketClient {
    async fn fetch_prices(
        &self,
        ticker: &str,
        period: Period,
        interval: Interval,
    ) -> ProviderResult<Vec<PriceBar>> {
        let ticker = normalize_ticker(ticker)?;
        let envelope = self
            .get_chart(&ticker, period.as_str(), interval.as_str())
            .await?;
        let bars = bars_from_chart(envelope, &ticker)?;
        tracing::debug!(%ticker, %period, %interval, bars = bars.len(), "price history fetched");
        Ok(bars)
    }

    async fn fetch_latest_price(&self, ticker: &str) -> ProviderResult<Option<f64>> {
        let ticker = normalize_ticker(ticker)?;
        let envelope = self.get_chart(&ticker, "1d", "1m").await?;
        let result = envelope
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next();
        Ok(result.and_then(|r| r.meta.regular_market_price))
    }
}

/// Map a provider error envelope to our taxonomy.
fn chart_error(error: ChartError, ticker: &str) -> ProviderError {
    if error.code.eq_ignore_ascii_case("not found") {
        ProviderError::UnknownTicker(ticker.to_string())
    } else {
        ProviderError::Unavailable(format!(
            "provider error {}: {}",
            error.code,
            error.description.unwrap_or_default()
        ))
    }
}

/// Normalize a chart envelope into chronological price bars.
///
/// Null rows (halted buckets) are skipped; mismatched column lengths mean
/// the payload is unusable as a whole.
fn bars_from_chart(envelope: ChartEnvelope, ticker: &str) -> ProviderResult<Vec<PriceBar>> {
    if let Some(error) = envelope.chart.error {
        return Err(chart_error(error, ticker));
    }

    let Some(result) = envelope
        .chart
        .result
        .and_then(|rs| rs.into_iter().next())
    else {
        return Err(ProviderError::Format("chart envelope has no result".into()));
    };

    // No timestamps at all means the provider has no data for the range.
    let timestamps = match result.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(Vec::new()),
    };

    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Err(ProviderError::Format("chart result has no quote block".into()));
    };

    let n = timestamps.len();
    let coherent = quote.open.len() == n
        && quote.high.len() == n
        && quote.low.len() == n
        && quote.close.len() == n
        && quote.volume.len() == n;
    if !coherent {
        return Err(ProviderError::Format(format!(
            "series length mismatch: {n} timestamps vs {} closes",
            quote.close.len()
        )));
    }

    let mut bars = Vec::with_capacity(n);
    for (i, &ts) in timestamps.iter().enumerate() {
        let row = (
            quote.open[i],
            quote.high[i],
            quote.low[i],
            quote.close[i],
            DateTime::<Utc>::from_timestamp(ts, 0),
        );
        match row {
            (Some(open), Some(high), Some(low), Some(close), Some(timestamp)) => {
                bars.push(PriceBar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume: quote.volume[i].unwrap_or(0),
                });
            }
            _ => {
                tracing::warn!(%ticker, index = i, "skipping null chart row");
            }
        }
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(payload: &str) -> ChartEnvelope {
        serde_json::from_str(payload).expect("fixture parses")
    }

    const THREE_BAR_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"regularMarketPrice": 187.44},
                "timestamp": [1700000000, 1700000300, 1700000600],
                "indicators": {"quote": [{
                    "open":   [186.1, 186.5, null],
                    "high":   [186.9, 187.2, null],
                    "low":    [185.8, 186.3, null],
                    "close":  [186.5, 187.0, null],
                    "volume": [120000, 98000, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_bars_from_chart_skips_null_rows() {
        let bars = bars_from_chart(parse(THREE_BAR_FIXTURE), "AAPL").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 186.5);
        assert_eq!(bars[1].volume, 98_000);
    }

    #[test]
    fn test_bars_are_chronological() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000600, 1700000000],
                    "indicators": {"quote": [{
                        "open": [2.0, 1.0], "high": [2.5, 1.5],
                        "low": [1.9, 0.9], "close": [2.2, 1.2],
                        "volume": [20, 10]
                    }]}
                }],
                "error": null
            }
        }"#;
        let bars = bars_from_chart(parse(payload), "X").unwrap();
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].close, 1.2);
    }

    #[test]
    fn test_empty_range_is_empty_not_error() {
        let payload = r#"{
            "chart": {
                "result": [{"timestamp": null, "indicators": {"quote": [{}]}}],
                "error": null
            }
        }"#;
        let bars = bars_from_chart(parse(payload), "AAPL").unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_unknown_ticker_envelope() {
        let payload = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        }"#;
        let err = bars_from_chart(parse(payload), "NOPE").unwrap_err();
        assert!(matches!(err, ProviderError::UnknownTicker(s) if s == "NOPE"));
    }

    #[test]
    fn test_length_mismatch_is_format_error() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700000300],
                    "indicators": {"quote": [{
                        "open": [1.0], "high": [1.5],
                        "low": [0.9], "close": [1.2],
                        "volume": [10]
                    }]}
                }],
                "error": null
            }
        }"#;
        let err = bars_from_chart(parse(payload), "AAPL").unwrap_err();
        assert!(matches!(err, ProviderError::Format(_)));
    }

    #[test]
    fn test_latest_price_in_meta() {
        let envelope = parse(THREE_BAR_FIXTURE);
        let price = envelope.chart.result.unwrap()[0].meta.regular_market_price;
        assert_eq!(price, Some(187.44));
    }
}
