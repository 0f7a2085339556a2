//! Curve panel - YTM against maturity for one currency
//!
//! Displays:
//! - Yield curve as a line through the prepared points
//! - Point markers
//! - `"DD.MM.YYYY (CODE)"` label per point, alternating above and below
//!   the point to reduce overlap

use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};
use yieldcurve_core::PreparedSeries;

use crate::theme::Theme;

/// Days of padding when every point shares one maturity.
const FLAT_X_PAD_DAYS: f64 = 30.0;
/// Percentage points of padding when every point has the same yield.
const FLAT_Y_PAD: f64 = 0.5;

/// Chart widget for one prepared series.
pub struct CurvePanel<'a> {
    series: &'a PreparedSeries,
    theme: &'a Theme,
}

impl<'a> CurvePanel<'a> {
    pub fn new(series: &'a PreparedSeries, theme: &'a Theme) -> Self {
        Self { series, theme }
    }

    fn title(&self) -> String {
        format!(
            " Yield to Maturity (YTM) of Titluri de stat - {} | {} points ",
            self.series.currency,
            self.series.len()
        )
    }
}

impl<'a> Widget for CurvePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = self.theme.series_color(self.series.currency);
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(self.theme.background));

        let (Some((first, last)), Some((y_min, y_max))) =
            (self.series.date_range(), self.series.ytm_range())
        else {
            Paragraph::new("No yields available for this currency")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.muted))
                .block(block)
                .render(area, buf);
            return;
        };

        let data: Vec<(f64, f64)> = self
            .series
            .points
            .iter()
            .map(|p| (day_number(p.maturity), p.ytm))
            .collect();

        let [x_lower, x_upper] = padded(
            day_number(first),
            day_number(last),
            0.02,
            FLAT_X_PAD_DAYS,
        );
        let [y_lower, y_upper] = padded(y_min, y_max, 0.05, FLAT_Y_PAD);

        let x_labels: Vec<Span> = [x_lower, (x_lower + x_upper) / 2.0, x_upper]
            .into_iter()
            .map(|x| Span::raw(format_day(x)))
            .collect();
        let y_label_text: Vec<String> = [y_lower, (y_lower + y_upper) / 2.0, y_upper]
            .into_iter()
            .map(|y| format!("{y:.2}%"))
            .collect();
        let y_label_width = y_label_text.iter().map(|s| s.len()).max().unwrap_or(0) as u16 + 1;
        let y_labels: Vec<Span> = y_label_text.into_iter().map(Span::raw).collect();

        let datasets = vec![
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&data),
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(self.theme.text_primary))
                .data(&data),
        ];

        let axis_title = |t: &'static str| {
            Span::styled(t, Style::default().fg(self.theme.text_secondary))
        };

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(axis_title("Maturity Date"))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds([x_lower, x_upper])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(axis_title("YTM (%)"))
                    .style(Style::default().fg(self.theme.muted))
                    .bounds([y_lower, y_upper])
                    .labels(y_labels),
            )
            .render(area, buf);

        // Ratatui's Chart widget has no point annotations, so labels are
        // written at approximate cell positions after the chart is drawn.
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let plot_left = inner.x + y_label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(y_label_width + 1);
        let plot_height = inner.height.saturating_sub(2);
        if plot_width == 0 || plot_height < 3 {
            return;
        }

        let label_style = Style::default()
            .fg(self.theme.text_secondary)
            .add_modifier(Modifier::DIM);
        let right_edge = inner.right();

        for (i, (point, &(x, y))) in self.series.points.iter().zip(&data).enumerate() {
            let x_frac = (x - x_lower) / (x_upper - x_lower);
            let y_frac = (y - y_lower) / (y_upper - y_lower);
            let px = plot_left + (x_frac * f64::from(plot_width - 1)).round() as u16;
            let row_from_top = ((1.0 - y_frac) * f64::from(plot_height - 1)).round() as u16;
            let py = plot_top + row_from_top;

            let ly = if i % 2 == 0 {
                py.saturating_sub(1).max(plot_top)
            } else {
                (py + 1).min(plot_top + plot_height - 1)
            };
            let half = (point.label.chars().count() / 2) as u16;
            let lx = px.saturating_sub(half).max(plot_left);
            if lx >= right_edge {
                continue;
            }
            let room = usize::from(right_edge - lx);
            let text: String = point.label.chars().take(room).collect();
            buf.set_string(lx, ly, text, label_style);
        }
    }
}

/// Days since the common era, the x coordinate of a maturity.
fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn format_day(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%d-%b-%Y").to_string())
        .unwrap_or_default()
}

/// Expand `[lo, hi]` by `frac` of its width, or by `flat_pad` if it is empty.
fn padded(lo: f64, hi: f64, frac: f64, flat_pad: f64) -> [f64; 2] {
    let range = hi - lo;
    let pad = if range > 0.0 { range * frac } else { flat_pad };
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use yieldcurve_core::{prepare, Currency, CurrencySeries};

    fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut content = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                content.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            content.push('\n');
        }
        content
    }

    fn sample(currency: Currency, rows: &[(&str, &str, f64)]) -> PreparedSeries {
        let mut s = CurrencySeries::new(currency);
        for (code, maturity, ytm) in rows {
            s.insert(*code, *maturity, *ytm);
        }
        prepare(&s).unwrap()
    }

    #[test]
    fn renders_labels_for_points() {
        let theme = Theme::default();
        let series = sample(
            Currency::Ron,
            &[
                ("R2506A", "01.06.2025", 6.10),
                ("R2812A", "15.12.2028", 7.35),
                ("R3503A", "01.03.2035", 7.05),
            ],
        );
        let area = Rect::new(0, 0, 140, 30);
        let mut buf = Buffer::empty(area);
        CurvePanel::new(&series, &theme).render(area, &mut buf);

        let text = buffer_text(&buf, area);
        assert!(text.contains("RON"));
        assert!(text.contains("(R2506A)"), "first label missing:\n{text}");
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let theme = Theme::default();
        let series = PreparedSeries::empty(Currency::Eur);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        CurvePanel::new(&series, &theme).render(area, &mut buf);

        let text = buffer_text(&buf, area);
        assert!(text.contains("EUR"));
        assert!(text.contains("No yields"));
    }

    #[test]
    fn single_point_renders_without_panic() {
        let theme = Theme::default();
        let series = sample(Currency::Eur, &[("X1E", "01.12.2025", 6.2)]);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        CurvePanel::new(&series, &theme).render(area, &mut buf);
    }

    #[test]
    fn tiny_area_renders_without_panic() {
        let theme = Theme::default();
        let series = sample(
            Currency::Ron,
            &[("X1", "01.06.2025", 7.5), ("X2", "01.06.2026", 7.0)],
        );
        for (w, h) in [(3, 3), (10, 4), (20, 6)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            CurvePanel::new(&series, &theme).render(area, &mut buf);
        }
    }

    #[test]
    fn padding_handles_flat_ranges() {
        assert_eq!(padded(7.0, 7.0, 0.05, 0.5), [6.5, 7.5]);
        let [lo, hi] = padded(0.0, 100.0, 0.05, 0.5);
        assert!((lo + 5.0).abs() < 1e-9 && (hi - 105.0).abs() < 1e-9);
    }

    #[test]
    fn day_axis_formats_dates() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_day(day_number(d)), "01-Jun-2025");
    }
}
