//! Yieldcurve TUI — terminal chart of prepared yield curves.
//!
//! Draws one panel per settlement currency, stacked vertically:
//! - RON (domestic) curve on top
//! - EUR curve below
//!
//! Each panel plots YTM against maturity date with per-point labels.

pub mod curve_panel;
pub mod theme;
pub mod viewer;

pub use curve_panel::CurvePanel;
pub use theme::Theme;
pub use viewer::show_curves;
