//! Indicator formatter: raw macro readings to display-ready values.
//!
//! Pure transformation only. Unit conversion (basis points to percent) and a
//! fixed two-decimal rounding policy; no fetching, no history.

use crate::models::{IndicatorValue, MacroSnapshot, RawUnit};

/// Convert a raw macro snapshot into display-ready indicator values.
///
/// Preserves snapshot order and never fails: unknown units pass through with
/// their own label.
pub fn format_indicators(snapshot: &MacroSnapshot) -> Vec<IndicatorValue> {
    snapshot
        .readings
        .iter()
        .map(|reading| {
            let (value, unit) = match &reading.unit {
                RawUnit::BasisPoints => (reading.value / 100.0, "%".to_string()),
                other => (reading.value, other.label().to_string()),
            };
            IndicatorValue {
                name: reading.name.clone(),
                value: round2(value),
                unit,
                as_of: reading.as_of,
            }
        })
        .collect()
}

/// Round to two decimals, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
