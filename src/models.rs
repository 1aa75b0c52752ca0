//! Domain types shared across the dashboard.
//!
//! Everything here is cycle-scoped: values are produced fresh for one render
//! cycle and dropped afterwards. Nothing carries state between cycles.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Selection errors
// =============================================================================

/// A user selection that cannot drive a render cycle.
///
/// Reported inline next to the offending input, never as a crash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Ticker input was empty after trimming.
    #[error("ticker must not be empty")]
    EmptyTicker,

    /// Ticker contains characters no provider symbol uses.
    #[error("ticker '{0}' is not a valid symbol")]
    BadTicker(String),

    /// Unrecognized period literal.
    #[error("unsupported period '{0}'")]
    BadPeriod(String),

    /// Unrecognized interval literal.
    #[error("unsupported interval '{0}'")]
    BadInterval(String),

    /// Unrecognized theme literal.
    #[error("unsupported theme '{0}'")]
    BadTheme(String),

    /// Interval granularity the provider cannot serve for this lookback.
    #[error("interval {interval} is not available for period {period}")]
    IncompatibleRange { period: Period, interval: Interval },
}

// =============================================================================
// Period
// =============================================================================

/// Supported lookback windows for price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// One trading day.
    #[serde(rename = "1d")]
    OneDay,
    /// Five trading days.
    #[serde(rename = "5d")]
    FiveDays,
    /// One month.
    #[serde(rename = "1mo")]
    OneMonth,
    /// Three months.
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// One year.
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    /// All supported periods, in selector order.
    pub const ALL: [Period; 5] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::OneYear,
    ];

    /// Provider query literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::OneYear => "1y",
        }
    }

}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::BadPeriod(s.to_string()))
    }
}

// =============================================================================
// Interval
// =============================================================================

/// Supported candlestick granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// One minute.
    #[serde(rename = "1m")]
    OneMinute,
    /// Five minutes.
    #[serde(rename = "5m")]
    FiveMinutes,
    /// Fifteen minutes.
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// One hour.
    #[serde(rename = "1h")]
    OneHour,
    /// One day.
    #[serde(rename = "1d")]
    OneDay,
    /// One week.
    #[serde(rename = "1wk")]
    OneWeek,
}

impl Interval {
    /// All supported intervals, in selector order.
    pub const ALL: [Interval; 6] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::OneHour,
        Interval::OneDay,
        Interval::OneWeek,
    ];

    /// Provider query literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
        }
    }

    /// Bucket width in seconds.
    pub fn seconds(&self) -> u64 {
        match self {
            Interval::OneMinute => 60,
            Interval::FiveMinutes => 300,
            Interval::FifteenMinutes => 900,
            Interval::OneHour => 3_600,
            Interval::OneDay => 86_400,
            Interval::OneWeek => 604_800,
        }
    }

    /// Whether one bucket covers at most one trading day.
    ///
    /// Drives the chart-kind policy: daily-or-finer buckets render as
    /// candlesticks, coarser buckets as a line.
    #[inline]
    pub fn spans_at_most_one_day(&self) -> bool {
        self.seconds() <= 86_400
    }

    /// Whether the provider can serve this interval over the given lookback.
    ///
    /// Mirrors the upstream history limits: minute bars exist only for the
    /// last few days, sub-daily bars for roughly a month, weekly bars only
    /// make sense over multi-month windows.
    pub fn allowed_for(&self, period: Period) -> bool {
        match self {
            Interval::OneMinute => matches!(period, Period::OneDay | Period::FiveDays),
            Interval::FiveMinutes | Interval::FifteenMinutes | Interval::OneHour => {
                matches!(period, Period::OneDay | Period::FiveDays | Period::OneMonth)
            }
            Interval::OneDay => true,
            Interval::OneWeek => matches!(period, Period::ThreeMonths | Period::OneYear),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .find(|i| i.as_str() == s)
            .copied()
            .ok_or_else(|| ValidationError::BadInterval(s.to_string()))
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Color scheme selection. Only the class identifier crosses the render
/// boundary; palette values are applied by the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light mode (default).
    #[default]
    Light,
    /// Dark mode.
    Dark,
}

impl Theme {
    /// CSS class attached to the page root.
    pub fn class(&self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::BadTheme(other.to_string())),
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

/// The user-chosen tuple driving one render cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Security symbol, normalized to upper case.
    pub ticker: String,
    /// Lookback window.
    pub period: Period,
    /// Candlestick granularity.
    pub interval: Interval,
    /// Color scheme.
    pub theme: Theme,
}

/// Longest symbol any supported provider serves.
const MAX_TICKER_LEN: usize = 12;

impl Selection {
    /// Build a validated selection from raw input strings.
    pub fn parse(
        ticker: &str,
        period: &str,
        interval: &str,
        theme: &str,
    ) -> Result<Self, ValidationError> {
        let selection = Selection {
            ticker: normalize_ticker(ticker)?,
            period: period.parse()?,
            interval: interval.parse()?,
            theme: theme.parse()?,
        };
        selection.validate()?;
        Ok(selection)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.interval.allowed_for(self.period) {
            return Err(ValidationError::IncompatibleRange {
                period: self.period,
                interval: self.interval,
            });
        }
        Ok(())
    }
}

impl Default for Selection {
    fn default() -> Self {
        // The original dashboard opens on AAPL intraday.
        Selection {
            ticker: "AAPL".to_string(),
            period: Period::OneDay,
            interval: Interval::FiveMinutes,
            theme: Theme::Light,
        }
    }
}

/// Trim, upper-case, and sanity-check a ticker symbol.
pub fn normalize_ticker(raw: &str) -> Result<String, ValidationError> {
    let ticker = raw.trim().to_ascii_uppercase();
    if ticker.is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    let well_formed = ticker.len() <= MAX_TICKER_LEN
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'));
    if !well_formed {
        return Err(ValidationError::BadTicker(ticker));
    }
    Ok(ticker)
}

// =============================================================================
// Price data
// =============================================================================

/// One OHLCV candlestick for a fixed time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bucket start time.
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price in the bucket.
    pub high: f64,
    /// Lowest price in the bucket.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume in the bucket.
    pub volume: u64,
}

impl PriceBar {
    /// Close above open.
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

// =============================================================================
// Macro indicators
// =============================================================================

/// Unit of a raw macro reading as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawUnit {
    /// Interest-rate style readings quoted in basis points.
    BasisPoints,
    /// Already a percentage.
    Percent,
    /// Plain US dollar quote.
    Usd,
    /// Commodity quote per troy ounce.
    UsdPerOunce,
    /// Commodity quote per barrel.
    UsdPerBarrel,
    /// Dimensionless index level.
    Index,
    /// Anything else; passed through with its own label.
    Other(String),
}

impl RawUnit {
    /// Display label for the unit.
    pub fn label(&self) -> &str {
        match self {
            RawUnit::BasisPoints => "bps",
            RawUnit::Percent => "%",
            RawUnit::Usd => "USD",
            RawUnit::UsdPerOunce => "USD/oz",
            RawUnit::UsdPerBarrel => "USD/bbl",
            RawUnit::Index => "index",
            RawUnit::Other(label) => label,
        }
    }

    /// Parse a provider unit label. Unknown labels pass through unchanged.
    pub fn parse(label: &str) -> RawUnit {
        match label {
            "bps" => RawUnit::BasisPoints,
            "%" | "pct" => RawUnit::Percent,
            "usd" | "USD" => RawUnit::Usd,
            "usd/oz" => RawUnit::UsdPerOunce,
            "usd/bbl" => RawUnit::UsdPerBarrel,
            "index" => RawUnit::Index,
            other => RawUnit::Other(other.to_string()),
        }
    }
}

/// One raw macro reading straight from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroReading {
    /// Indicator name (e.g. "10Y Treasury Yield").
    pub name: String,
    /// Latest numeric value in `unit`.
    pub value: f64,
    /// Reported unit.
    pub unit: RawUnit,
    /// Date the reading is valid for.
    pub as_of: NaiveDate,
}

/// Snapshot of all macro readings fetched for one render cycle.
///
/// Order is the provider's display order and is preserved through formatting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacroSnapshot {
    pub readings: Vec<MacroReading>,
}

/// A display-ready indicator value: converted unit, two-decimal rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    /// Indicator name.
    pub name: String,
    /// Value after unit conversion, rounded to two decimals.
    pub value: f64,
    /// Display unit label.
    pub unit: String,
    /// Date the reading is valid for.
    pub as_of: NaiveDate,
}

// =============================================================================
// News
// =============================================================================

/// Sentiment label attached to a headline.
///
/// Computed upstream; treated as an opaque input here. Headlines without a
/// label default to neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

/// One financial news headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline text.
    pub headline: String,
    /// Publishing outlet.
    pub source: String,
    /// Publication time.
    pub timestamp: DateTime<Utc>,
    /// Opaque sentiment label.
    pub sentiment: Sentiment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_parse_round_trip() {
        for period in Period::ALL {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), period);
        }
        assert_eq!(
            "6mo".parse::<Period>(),
            Err(ValidationError::BadPeriod("6mo".into()))
        );
    }

    #[test]
    fn test_interval_parse_round_trip() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
        assert_eq!(
            "2m".parse::<Interval>(),
            Err(ValidationError::BadInterval("2m".into()))
        );
    }

    #[test]
    fn test_interval_day_boundary() {
        assert!(Interval::OneMinute.spans_at_most_one_day());
        assert!(Interval::OneHour.spans_at_most_one_day());
        // Exactly one day still counts as intraday-or-daily.
        assert!(Interval::OneDay.spans_at_most_one_day());
        assert!(!Interval::OneWeek.spans_at_most_one_day());
    }

    #[test]
    fn test_interval_period_matrix() {
        assert!(Interval::OneMinute.allowed_for(Period::OneDay));
        assert!(Interval::OneMinute.allowed_for(Period::FiveDays));
        assert!(!Interval::OneMinute.allowed_for(Period::OneYear));
        assert!(Interval::FiveMinutes.allowed_for(Period::OneMonth));
        assert!(!Interval::FiveMinutes.allowed_for(Period::ThreeMonths));
        assert!(Interval::OneDay.allowed_for(Period::OneDay));
        assert!(Interval::OneDay.allowed_for(Period::OneYear));
        assert!(Interval::OneWeek.allowed_for(Period::OneYear));
        assert!(!Interval::OneWeek.allowed_for(Period::OneDay));
    }

    #[test]
    fn test_selection_parse_valid() {
        let s = Selection::parse(" aapl ", "5d", "1d", "dark").unwrap();
        assert_eq!(s.ticker, "AAPL");
        assert_eq!(s.period, Period::FiveDays);
        assert_eq!(s.interval, Interval::OneDay);
        assert_eq!(s.theme, Theme::Dark);
    }

    #[test]
    fn test_selection_parse_rejects_bad_ticker() {
        assert_eq!(
            Selection::parse("  ", "1d", "5m", "light"),
            Err(ValidationError::EmptyTicker)
        );
        assert!(matches!(
            Selection::parse("AAPL; DROP", "1d", "5m", "light"),
            Err(ValidationError::BadTicker(_))
        ));
        assert!(matches!(
            Selection::parse("WAYTOOLONGSYMBOL", "1d", "5m", "light"),
            Err(ValidationError::BadTicker(_))
        ));
    }

    #[test]
    fn test_selection_parse_rejects_incompatible_range() {
        assert_eq!(
            Selection::parse("AAPL", "1y", "1m", "light"),
            Err(ValidationError::IncompatibleRange {
                period: Period::OneYear,
                interval: Interval::OneMinute,
            })
        );
    }

    #[test]
    fn test_ticker_allows_index_and_pair_symbols() {
        assert_eq!(normalize_ticker("^tnx").unwrap(), "^TNX");
        assert_eq!(normalize_ticker("BTC-USD").unwrap(), "BTC-USD");
        assert_eq!(normalize_ticker("GC=F").unwrap(), "GC=F");
        assert_eq!(normalize_ticker("BRK.B").unwrap(), "BRK.B");
    }

    #[test]
    fn test_theme_class() {
        assert_eq!(Theme::Light.class(), "theme-light");
        assert_eq!(Theme::Dark.class(), "theme-dark");
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_raw_unit_parse_unknown_passes_through() {
        assert_eq!(RawUnit::parse("bps"), RawUnit::BasisPoints);
        assert_eq!(RawUnit::parse("usd/oz"), RawUnit::UsdPerOunce);
        assert_eq!(RawUnit::parse("furlongs"), RawUnit::Other("furlongs".into()));
        assert_eq!(RawUnit::Other("furlongs".into()).label(), "furlongs");
    }

    #[test]
    fn test_price_bar_direction() {
        let bar = PriceBar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: 10.0,
            high: 12.0,
            low: 9.5,
            close: 11.0,
            volume: 1_000,
        };
        assert!(bar.is_bullish());
    }

    #[test]
    fn test_sentiment_defaults_to_neutral() {
        #[derive(serde::Deserialize)]
        struct Probe {
            #[serde(default)]
            sentiment: Sentiment,
        }
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.sentiment, Sentiment::Neutral);
        let probe: Probe = serde_json::from_str(r#"{"sentiment":"negative"}"#).unwrap();
        assert_eq!(probe.sentiment, Sentiment::Negative);
    }
}
