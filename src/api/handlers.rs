//! JSON handlers and the shared render-cycle driver.
//!
//! [`run_cycle`] is the one place a Selection turns into a [`RenderSpec`]:
//! it issues a fetch token, runs the provider calls concurrently, degrades per the
//! error policy (price failures annotate the panel, side-panel failures
//! shrink to empty lists), and reports whether the cycle is still current.

use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use super::dto::{
    HealthResponse, IndicatorsResponse, NewsResponse, PriceResponse, RenderQuery, RenderResponse,
    TickerQuery,
};
use super::error::ApiResult;
use super::state::AppState;
use crate::engine::indicators::format_indicators;
use crate::engine::{render, RenderSpec};
use crate::models::{IndicatorValue, NewsItem, Selection};
use crate::providers::ProviderError;

/// Everything one render cycle produces.
pub(crate) struct CycleOutcome {
    pub spec: RenderSpec,
    /// Most recent quote for the header line, when the provider has one.
    pub live_price: Option<f64>,
    /// False when a newer selection superseded this cycle before its fetches
    /// completed; the caller must discard the result.
    pub current: bool,
}

/// Run one full render cycle for a validated selection.
pub(crate) async fn run_cycle(state: &AppState, selection: &Selection) -> CycleOutcome {
    let token = state.gate.issue();

    let (bars, snapshot, news, live) = tokio::join!(
        state
            .market
            .fetch_prices(&selection.ticker, selection.period, selection.interval),
        state.macros.fetch_macro_snapshot(),
        state.news.fetch_news(&selection.ticker),
        state.market.fetch_latest_price(&selection.ticker),
    );

    let live_price = live.unwrap_or_else(|err| {
        tracing::debug!(ticker = %selection.ticker, %err, "live quote unavailable");
        None
    });

    // Side panels degrade to empty rather than failing the cycle.
    let indicators: Vec<IndicatorValue> = match snapshot {
        Ok(snapshot) => format_indicators(&snapshot),
        Err(err) => {
            tracing::warn!(%err, "macro snapshot unavailable, rendering without indicators");
            Vec::new()
        }
    };
    let news: Vec<NewsItem> = match news {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(ticker = %selection.ticker, %err, "news unavailable, rendering without headlines");
            Vec::new()
        }
    };

    let spec = match bars {
        Ok(bars) => render(selection, &bars, &indicators, &news),
        Err(ProviderError::UnknownTicker(_)) => {
            RenderSpec::unknown_ticker(selection, &indicators, &news)
        }
        Err(ProviderError::Format(msg)) => {
            // A mangled payload counts as an empty result set, not an outage.
            tracing::warn!(ticker = %selection.ticker, %msg, "malformed price payload treated as empty");
            RenderSpec::no_data(selection, &indicators, &news)
        }
        Err(err) => {
            tracing::warn!(ticker = %selection.ticker, %err, "price fetch failed");
            RenderSpec::provider_down(selection, &err.to_string(), &indicators, &news)
        }
    };

    let current = state.gate.is_current(token);
    if !current {
        tracing::debug!(ticker = %selection.ticker, "render cycle superseded, result discarded");
    }
    CycleOutcome {
        spec,
        live_price,
        current,
    }
}

/// `GET /api/render` — full render spec for a selection.
pub async fn render_spec(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RenderQuery>,
) -> ApiResult<Json<RenderResponse>> {
    let selection = query.into_selection()?;
    let outcome = run_cycle(&state, &selection).await;
    Ok(Json(RenderResponse {
        selection,
        current: outcome.current,
        live_price: outcome.live_price,
        spec: outcome.spec,
    }))
}

/// `GET /api/price` — most recent quote for a ticker.
pub async fn latest_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickerQuery>,
) -> ApiResult<Json<PriceResponse>> {
    let ticker = crate::models::normalize_ticker(&query.ticker)?;
    let price = state.market.fetch_latest_price(&ticker).await?;
    Ok(Json(PriceResponse { ticker, price }))
}

/// `GET /api/indicators` — formatted macro indicators.
pub async fn indicators(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<IndicatorsResponse>> {
    let indicators = match state.macros.fetch_macro_snapshot().await {
        Ok(snapshot) => format_indicators(&snapshot),
        Err(ProviderError::Format(msg)) => {
            tracing::warn!(%msg, "malformed macro payload treated as empty");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };
    let count = indicators.len();
    Ok(Json(IndicatorsResponse { indicators, count }))
}

/// `GET /api/news` — headlines for a ticker, newest first.
pub async fn news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TickerQuery>,
) -> ApiResult<Json<NewsResponse>> {
    let ticker = crate::models::normalize_ticker(&query.ticker)?;
    let items = match state.news.fetch_news(&ticker).await {
        Ok(items) => items,
        Err(ProviderError::Format(msg)) => {
            tracing::warn!(%ticker, %msg, "malformed news payload treated as empty");
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };
    let count = items.len();
    Ok(Json(NewsResponse {
        ticker,
        items,
        count,
    }))
}

/// `GET /health` — liveness probe.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::engine::PanelState;
    use crate::models::{Interval, MacroReading, MacroSnapshot, Period, PriceBar, RawUnit, Theme};
    use crate::providers::{MacroFeed, MarketData, NewsFeed, ProviderResult};
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tokio::sync::Notify;

    pub(crate) fn stub_bars(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| PriceBar {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 300, 0).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1_000,
            })
            .collect()
    }

    /// Market stub: fixed series, optionally holding one symbol's fetch until
    /// released so tests can interleave cycles.
    pub(crate) struct StubMarket {
        pub bars: Vec<PriceBar>,
        pub hold_symbol: Option<&'static str>,
        pub release: Arc<Notify>,
        pub fail: Option<fn() -> ProviderError>,
    }

    impl StubMarket {
        pub fn with_bars(bars: Vec<PriceBar>) -> Self {
            Self {
                bars,
                hold_symbol: None,
                release: Arc::new(Notify::new()),
                fail: None,
            }
        }

        pub fn failing(fail: fn() -> ProviderError) -> Self {
            Self {
                fail: Some(fail),
                ..Self::with_bars(Vec::new())
            }
        }
    }

    #[async_trait]
    impl MarketData for StubMarket {
        async fn fetch_prices(
            &self,
            ticker: &str,
            _period: Period,
            _interval: Interval,
        ) -> ProviderResult<Vec<PriceBar>> {
            if self.hold_symbol == Some(ticker) {
                self.release.notified().await;
            }
            if let Some(fail) = self.fail {
                return Err(fail());
            }
            Ok(self.bars.clone())
        }

        async fn fetch_latest_price(&self, _ticker: &str) -> ProviderResult<Option<f64>> {
            Ok(self.bars.last().map(|b| b.close))
        }
    }

    pub(crate) struct StubNews;

    #[async_trait]
    impl NewsFeed for StubNews {
        async fn fetch_news(&self, _ticker: &str) -> ProviderResult<Vec<NewsItem>> {
            Ok(vec![NewsItem {
                headline: "Earnings beat expectations".into(),
                source: "Newswire".into(),
                timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                sentiment: crate::models::Sentiment::Positive,
            }])
        }
    }

    pub(crate) struct StubMacro;

    #[async_trait]
    impl MacroFeed for StubMacro {
        async fn fetch_macro_snapshot(&self) -> ProviderResult<MacroSnapshot> {
            Ok(MacroSnapshot {
                readings: vec![MacroReading {
                    name: "10Y Treasury Yield".into(),
                    value: 425.0,
                    unit: RawUnit::BasisPoints,
                    as_of: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
                }],
            })
        }
    }

    pub(crate) fn stub_state(market: StubMarket) -> Arc<AppState> {
        AppState::with_providers(
            AppConfig::default(),
            Arc::new(market),
            Arc::new(StubNews),
            Arc::new(StubMacro),
        )
    }

    fn selection(ticker: &str) -> Selection {
        Selection {
            ticker: ticker.into(),
            period: Period::FiveDays,
            interval: Interval::OneDay,
            theme: Theme::Light,
        }
    }

    #[tokio::test]
    async fn test_run_cycle_happy_path() {
        let state = stub_state(StubMarket::with_bars(stub_bars(5)));
        let outcome = run_cycle(&state, &selection("AAPL")).await;

        assert!(outcome.current);
        assert_eq!(outcome.live_price, Some(100.5));
        assert!(outcome.spec.chart.is_some());
        assert!(matches!(
            outcome.spec.panel,
            PanelState::Ready { bar_count: 5, .. }
        ));
        // Side panels come along for the ride.
        assert_eq!(outcome.spec.indicators[0].value, 4.25);
        assert_eq!(outcome.spec.news.len(), 1);
    }

    #[tokio::test]
    async fn test_run_cycle_unknown_ticker_degrades() {
        let state = stub_state(StubMarket::failing(|| {
            ProviderError::UnknownTicker("NOPE".into())
        }));
        let outcome = run_cycle(&state, &selection("NOPE")).await;

        assert!(outcome.current);
        assert!(outcome.spec.chart.is_none());
        assert!(matches!(outcome.spec.panel, PanelState::UnknownTicker { .. }));
        // Indicators and news still render around the error panel.
        assert_eq!(outcome.spec.indicators.len(), 1);
        assert_eq!(outcome.spec.news.len(), 1);
    }

    #[tokio::test]
    async fn test_run_cycle_provider_outage_degrades() {
        let state = stub_state(StubMarket::failing(|| {
            ProviderError::Unavailable("connection timed out".into())
        }));
        let outcome = run_cycle(&state, &selection("AAPL")).await;
        assert!(matches!(outcome.spec.panel, PanelState::ProviderDown { .. }));
    }

    #[tokio::test]
    async fn test_run_cycle_format_error_is_empty_not_fatal() {
        let state = stub_state(StubMarket::failing(|| {
            ProviderError::Format("series length mismatch".into())
        }));
        let outcome = run_cycle(&state, &selection("AAPL")).await;
        assert!(matches!(outcome.spec.panel, PanelState::NoData { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_cycle_is_discarded() {
        // AAPL's fetch is held open while the user moves on to TSLA.
        let mut market = StubMarket::with_bars(stub_bars(3));
        market.hold_symbol = Some("AAPL");
        let release = market.release.clone();
        let state = stub_state(market);

        let slow_state = state.clone();
        let slow = tokio::spawn(async move {
            run_cycle(&slow_state, &selection("AAPL")).await
        });

        // Let the AAPL cycle issue its token and block on the provider.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // TSLA supersedes it and completes first.
        let tsla = run_cycle(&state, &selection("TSLA")).await;
        assert!(tsla.current);
        assert!(matches!(tsla.spec.panel, PanelState::Ready { .. }));

        // Now AAPL's fetch lands late; its cycle must report stale.
        release.notify_one();
        let aapl = slow.await.unwrap();
        assert!(!aapl.current);
    }
}
