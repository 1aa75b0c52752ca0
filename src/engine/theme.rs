//! Color palettes for the light and dark themes.
//!
//! Only [`crate::models::Theme::class`] crosses the render boundary; these
//! values feed the stylesheet and the client-side chart palette, so a theme
//! toggle can never change chart data.

use crate::models::Theme;

/// One theme's palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background.
    pub background: &'static str,
    /// Body text.
    pub text: &'static str,
    /// Chart area background.
    pub graph_bg: &'static str,
    /// Chart axis and label text.
    pub graph_text: &'static str,
    /// Rising candle color.
    pub up: &'static str,
    /// Falling candle color.
    pub down: &'static str,
}

pub const LIGHT: Palette = Palette {
    background: "#FFFFFF",
    text: "#000000",
    graph_bg: "#F5F5F5",
    graph_text: "#000000",
    up: "green",
    down: "red",
};

pub const DARK: Palette = Palette {
    // Charcoal rather than pure black for a softer dark mode.
    background: "#2C2C2C",
    text: "#E0E0E0",
    graph_bg: "#3A3A3A",
    graph_text: "#FFFFFF",
    up: "lime",
    down: "red",
};

/// Palette for a theme.
pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(palette(Theme::Light).background, "#FFFFFF");
        assert_eq!(palette(Theme::Dark).background, "#2C2C2C");
        assert_eq!(palette(Theme::Dark).up, "lime");
        assert_eq!(palette(Theme::Light).up, "green");
    }
}
