//! Pure core of the dashboard: no I/O, no shared state.
//!
//! - [`indicators`]: raw macro readings to display-ready values
//! - [`render`]: (selection, fetched data) to a [`render::RenderSpec`]
//! - [`theme`]: light/dark palettes and the `theme_class` mapping
//! - [`cycle`]: fetch-token gate that discards superseded results

pub mod cycle;
pub mod indicators;
pub mod render;
pub mod theme;

pub use cycle::{CycleGate, FetchToken};
pub use render::{render, ChartConfig, ChartKind, PanelState, RenderSpec};
