//! HTML surface: the dashboard page and the re-rendered panel fragment.
//!
//! The page posts the selection form back to `/dashboard` and swaps the
//! returned fragment into place; a superseded cycle answers 204 so the
//! client leaves the newer render untouched.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;

use super::handlers::run_cycle;
use super::state::AppState;
use crate::engine::theme::{palette, Palette};
use crate::engine::{PanelState, RenderSpec};
use crate::models::{Interval, Period, Selection, Theme};

/// Helper to render templates into axum responses
fn render_template<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response()
        }
    }
}

// =============================================================================
// View models
// =============================================================================

/// One selector option with its chosen state.
pub struct OptionView {
    pub value: &'static str,
    pub selected: bool,
}

/// One formatted indicator row.
pub struct IndicatorLine {
    pub name: String,
    pub display: String,
}

/// One headline row.
pub struct NewsLine {
    pub headline: String,
    pub source: String,
    pub when: String,
    pub sentiment: &'static str,
}

/// Display-ready projection of a [`RenderSpec`] for the templates.
pub struct PanelView {
    pub theme_class: &'static str,
    /// CSS modifier: ready, no-data, unknown-ticker, provider-down.
    pub status: &'static str,
    pub message: String,
    /// "Current Price: $X.XX" header line, empty when the quote is missing.
    pub live_price: String,
    pub has_chart: bool,
    /// Chart config serialized for the client-side plotter.
    pub chart_json: String,
    pub indicators: Vec<IndicatorLine>,
    pub news: Vec<NewsLine>,
}

impl PanelView {
    pub fn from_spec(spec: &RenderSpec, live_price: Option<f64>) -> Self {
        let (status, message) = match &spec.panel {
            PanelState::Ready { text, .. } => ("ready", text.clone()),
            PanelState::NoData { message } => ("no-data", message.clone()),
            PanelState::UnknownTicker { message } => ("unknown-ticker", message.clone()),
            PanelState::ProviderDown { message } => ("provider-down", message.clone()),
        };

        let chart_json = spec
            .chart
            .as_ref()
            .and_then(|chart| serde_json::to_string(chart).ok())
            .unwrap_or_default();

        let indicators = spec
            .indicators
            .iter()
            .map(|ind| IndicatorLine {
                name: ind.name.clone(),
                display: format!("{:.2} {} (as of {})", ind.value, ind.unit, ind.as_of),
            })
            .collect();

        let news = spec
            .news
            .iter()
            .map(|item| NewsLine {
                headline: item.headline.clone(),
                source: item.source.clone(),
                when: item.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
                sentiment: item.sentiment.label(),
            })
            .collect();

        PanelView {
            theme_class: spec.theme_class,
            status,
            message,
            live_price: live_price
                .map(|price| format!("Current Price: ${:.2}", price))
                .unwrap_or_default(),
            has_chart: !chart_json.is_empty(),
            chart_json,
            indicators,
            news,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// GET / - Full dashboard page
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub ticker: String,
    pub periods: Vec<OptionView>,
    pub intervals: Vec<OptionView>,
    pub dark: bool,
    /// Palettes are injected into the page stylesheet so the template stays
    /// the single consumer of the theme constants.
    pub light_palette: Palette,
    pub dark_palette: Palette,
    pub view: PanelView,
}

impl DashboardPage {
    fn new(selection: &Selection, spec: &RenderSpec, live_price: Option<f64>) -> Self {
        DashboardPage {
            ticker: selection.ticker.clone(),
            light_palette: palette(Theme::Light),
            dark_palette: palette(Theme::Dark),
            periods: Period::ALL
                .iter()
                .map(|p| OptionView {
                    value: p.as_str(),
                    selected: *p == selection.period,
                })
                .collect(),
            intervals: Interval::ALL
                .iter()
                .map(|i| OptionView {
                    value: i.as_str(),
                    selected: *i == selection.interval,
                })
                .collect(),
            dark: selection.theme == Theme::Dark,
            view: PanelView::from_spec(spec, live_price),
        }
    }
}

/// POST /dashboard - Re-rendered panel fragment
#[derive(Template)]
#[template(path = "partials/panel.html")]
pub struct PanelFragment {
    pub view: PanelView,
}

/// Inline validation message shown next to the form.
#[derive(Template)]
#[template(path = "partials/error.html")]
pub struct ErrorFragment {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - Dashboard with the default selection pre-rendered.
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let selection = Selection::default();
    let outcome = run_cycle(&state, &selection).await;
    render_template(&DashboardPage::new(
        &selection,
        &outcome.spec,
        outcome.live_price,
    ))
}

/// POST /dashboard - Selection form submission.
#[derive(serde::Deserialize)]
pub struct DashboardForm {
    pub ticker: String,
    pub period: String,
    pub interval: String,
    /// Checkbox value; absent means light mode.
    pub theme: Option<String>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DashboardForm>,
) -> Response {
    let theme = form.theme.as_deref().unwrap_or("light");
    let selection = match Selection::parse(&form.ticker, &form.period, &form.interval, theme) {
        Ok(selection) => selection,
        Err(err) => {
            return render_template(&ErrorFragment {
                message: err.to_string(),
            });
        }
    };

    let outcome = run_cycle(&state, &selection).await;
    if !outcome.current {
        // A newer selection already rendered; tell the client to keep it.
        return StatusCode::NO_CONTENT.into_response();
    }
    render_template(&PanelFragment {
        view: PanelView::from_spec(&outcome.spec, outcome.live_price),
    })
}
