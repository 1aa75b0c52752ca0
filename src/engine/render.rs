//! Render controller: selection plus fetched data to a [`RenderSpec`].
//!
//! [`render`] is a pure function — stateless, idempotent, and deliberately
//! free of map types so identical inputs serialize byte-identically. The
//! chart kind follows a fixed policy (candlestick for daily-or-finer
//! buckets, line otherwise) and the theme contributes nothing but the
//! `theme_class` identifier.

use serde::Serialize;

use crate::models::{IndicatorValue, Interval, NewsItem, PriceBar, Selection};

// =============================================================================
// Output contract
// =============================================================================

/// Chart rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Candlestick,
    Line,
}

/// Data-only chart description consumed by the display shell.
///
/// Palette identifiers live solely in [`RenderSpec::theme_class`]; toggling
/// the theme must not perturb anything in here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    /// Candlestick or line, per the interval policy.
    pub kind: ChartKind,
    /// Chart title, e.g. "AAPL Stock Price".
    pub title: String,
    /// Bucket start times as unix seconds, chronological.
    pub timestamps: Vec<i64>,
    /// Price series matching `timestamps`.
    pub series: ChartSeries,
    /// Traded volume per bucket.
    pub volume: Vec<u64>,
}

/// Price series payload, keyed by chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ChartSeries {
    /// Full OHLC columns for candlestick charts.
    Ohlc {
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    /// Close column only, for line charts.
    Close { close: Vec<f64> },
}

/// Side-panel state. Always explicit: an empty chart never appears without
/// an explanation, and failures degrade to a message instead of a crash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelState {
    /// Data rendered; `text` summarizes ticker, bar count, and last close.
    Ready {
        text: String,
        latest_close: f64,
        bar_count: usize,
    },
    /// Provider answered but has no rows for this selection.
    NoData { message: String },
    /// Provider reports the symbol does not exist.
    UnknownTicker { message: String },
    /// Provider unreachable or timed out; shown as a transient banner.
    ProviderDown { message: String },
}

/// The output contract of the render controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSpec {
    /// Chart description; `None` whenever the panel is not `Ready`.
    pub chart: Option<ChartConfig>,
    /// Explicit side-panel state.
    pub panel: PanelState,
    /// Formatted macro indicators (may be empty on a degraded cycle).
    pub indicators: Vec<IndicatorValue>,
    /// Headlines, newest first (may be empty on a degraded cycle).
    pub news: Vec<NewsItem>,
    /// CSS class selecting the color palette.
    pub theme_class: &'static str,
}

// =============================================================================
// Policy
// =============================================================================

/// Fixed chart-kind policy: candlestick iff one bucket spans at most one day.
pub fn chart_kind(interval: Interval) -> ChartKind {
    if interval.spans_at_most_one_day() {
        ChartKind::Candlestick
    } else {
        ChartKind::Line
    }
}

// =============================================================================
// Render
// =============================================================================

/// Map the current selection and fetched data to a render spec.
pub fn render(
    selection: &Selection,
    bars: &[PriceBar],
    indicators: &[IndicatorValue],
    news: &[NewsItem],
) -> RenderSpec {
    if bars.is_empty() {
        return RenderSpec::no_data(selection, indicators, news);
    }

    let kind = chart_kind(selection.interval);
    let timestamps = bars.iter().map(|b| b.timestamp.timestamp()).collect();
    let volume = bars.iter().map(|b| b.volume).collect();
    let series = match kind {
        ChartKind::Candlestick => ChartSeries::Ohlc {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        },
        ChartKind::Line => ChartSeries::Close {
            close: bars.iter().map(|b| b.close).collect(),
        },
    };

    let latest_close = bars[bars.len() - 1].close;
    let panel = PanelState::Ready {
        text: format!(
            "{}: {} data points, last close {:.2}",
            selection.ticker,
            bars.len(),
            latest_close
        ),
        latest_close,
        bar_count: bars.len(),
    };

    RenderSpec {
        chart: Some(ChartConfig {
            kind,
            title: format!("{} Stock Price", selection.ticker),
            timestamps,
            series,
            volume,
        }),
        panel,
        indicators: indicators.to_vec(),
        news: news.to_vec(),
        theme_class: selection.theme.class(),
    }
}

impl RenderSpec {
    fn degraded(
        selection: &Selection,
        panel: PanelState,
        indicators: &[IndicatorValue],
        news: &[NewsItem],
    ) -> Self {
        RenderSpec {
            chart: None,
            panel,
            indicators: indicators.to_vec(),
            news: news.to_vec(),
            theme_class: selection.theme.class(),
        }
    }

    /// The provider has no rows for this selection.
    pub fn no_data(
        selection: &Selection,
        indicators: &[IndicatorValue],
        news: &[NewsItem],
    ) -> Self {
        let panel = PanelState::NoData {
            message: format!(
                "No data for {} over {} at {} granularity",
                selection.ticker, selection.period, selection.interval
            ),
        };
        Self::degraded(selection, panel, indicators, news)
    }

    /// The provider does not know the symbol.
    pub fn unknown_ticker(
        selection: &Selection,
        indicators: &[IndicatorValue],
        news: &[NewsItem],
    ) -> Self {
        let panel = PanelState::UnknownTicker {
            message: format!("Invalid ticker: {}", selection.ticker),
        };
        Self::degraded(selection, panel, indicators, news)
    }

    /// The provider is unreachable; the rest of the panel still renders.
    pub fn provider_down(
        selection: &Selection,
        reason: &str,
        indicators: &[IndicatorValue],
        news: &[NewsItem],
    ) -> Self {
        let panel = PanelState::ProviderDown {
            message: format!("Market data unavailable: {reason}"),
        };
        Self::degraded(selection, panel, indicators, news)
    }
}
