//! Query and response DTOs for the JSON endpoints.

use serde::{Deserialize, Serialize};

use crate::engine::RenderSpec;
use crate::models::{IndicatorValue, NewsItem, Selection, ValidationError};

/// Query parameters for `GET /api/render`.
///
/// All fields optional; missing ones fall back to the default selection
/// (AAPL, 1d, 5m, light), matching the page the dashboard opens on.
#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub ticker: Option<String>,
    pub period: Option<String>,
    pub interval: Option<String>,
    pub theme: Option<String>,
}

impl RenderQuery {
    /// Resolve into a validated selection.
    pub fn into_selection(self) -> Result<Selection, ValidationError> {
        let defaults = Selection::default();
        Selection::parse(
            self.ticker.as_deref().unwrap_or(&defaults.ticker),
            self.period.as_deref().unwrap_or(defaults.period.as_str()),
            self.interval
                .as_deref()
                .unwrap_or(defaults.interval.as_str()),
            self.theme.as_deref().unwrap_or(defaults.theme.as_str()),
        )
    }
}

/// Response for `GET /api/render`.
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    /// The selection this spec was rendered for.
    pub selection: Selection,
    /// False when a newer selection superseded this fetch before it landed;
    /// clients must discard the spec in that case.
    pub current: bool,
    /// Most recent quote, when the provider has one.
    pub live_price: Option<f64>,
    /// The rendered spec.
    pub spec: RenderSpec,
}

/// Query parameters for the per-ticker endpoints (`/api/news`, `/api/price`).
#[derive(Debug, Deserialize)]
pub struct TickerQuery {
    pub ticker: String,
}

/// Response for `GET /api/price`.
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub ticker: String,
    pub price: Option<f64>,
}

/// Response for `GET /api/news`.
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub ticker: String,
    pub items: Vec<NewsItem>,
    pub count: usize,
}

/// Response for `GET /api/indicators`.
#[derive(Debug, Serialize)]
pub struct IndicatorsResponse {
    pub indicators: Vec<IndicatorValue>,
    pub count: usize,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}
