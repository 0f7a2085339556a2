//! Colour tokens for the curve chart.

use ratatui::style::Color;
use yieldcurve_core::Currency;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// RON series
    pub ron: Color,
    /// EUR series
    pub eur: Color,
    /// Axis lines and empty-panel text
    pub muted: Color,
    pub text_primary: Color,
    /// Axis titles and point labels
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            ron: Color::Rgb(0, 160, 255),
            eur: Color::Rgb(0, 255, 128),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }
}

impl Theme {
    pub fn series_color(&self, currency: Currency) -> Color {
        match currency {
            Currency::Ron => self.ron,
            Currency::Eur => self.eur,
        }
    }
}
