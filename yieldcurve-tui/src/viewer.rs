//! Interactive full-screen chart: both curves until the user quits.

use std::io::{self, stdout};
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use yieldcurve_core::PreparedSeries;

use crate::curve_panel::CurvePanel;
use crate::theme::Theme;

/// Show the RON and EUR curves stacked, returning when `q` or `Esc` is pressed.
pub fn show_curves(ron: &PreparedSeries, eur: &PreparedSeries) -> Result<()> {
    with_panic_cleanup(restore_terminal, || run_in_terminal(ron, eur))
}

/// Run `body` with a panic hook that calls `cleanup` before the previous hook,
/// then put the previous hook back.
fn with_panic_cleanup<T>(cleanup: fn(), body: impl FnOnce() -> T) -> T {
    let previous = Arc::new(panic::take_hook());
    let chained = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info| {
        cleanup();
        (chained.as_ref())(info);
    }));

    let out = body();

    // dropping our hook releases its clone of `previous`
    drop(panic::take_hook());
    if let Ok(hook) = Arc::try_unwrap(previous) {
        panic::set_hook(hook);
    }
    out
}

/// Leave raw mode and the alternate screen so a panic message is readable.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stderr(), LeaveAlternateScreen);
}

fn run_in_terminal(ron: &PreparedSeries, eur: &PreparedSeries) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let theme = Theme::default();
    let result = run_viewer(&mut terminal, ron, eur, &theme);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_viewer(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ron: &PreparedSeries,
    eur: &PreparedSeries,
    theme: &Theme,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, ron, eur, theme))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

/// Lay out both panels plus a one-line hint.
pub fn draw(f: &mut Frame, ron: &PreparedSeries, eur: &PreparedSeries, theme: &Theme) {
    let [top, bottom, hint] = split(f.area());
    f.render_widget(CurvePanel::new(ron, theme), top);
    f.render_widget(CurvePanel::new(eur, theme), bottom);
    f.render_widget(
        Paragraph::new(" q / Esc: quit").style(Style::default().fg(theme.muted)),
        hint,
    );
}

fn split(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}
