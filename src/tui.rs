use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt::measure;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const SECTION_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const FOCUSED_CONTROL_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Rgb(30, 144, 255));

/// Dodger blue, the dashboard's primary bar colour.
pub const PRIMARY: Color = Color::Rgb(30, 144, 255);

/// Palette for multi-series charts and pie slices.
pub const PALETTE: &[Color] = &[
    Color::Rgb(30, 144, 255),
    Color::Rgb(255, 105, 180),
    Color::Rgb(135, 206, 235),
    Color::Rgb(70, 130, 180),
    Color::Rgb(211, 211, 211),
    Color::Rgb(95, 158, 160),
];

pub fn palette(i: usize) -> Color {
    PALETTE[i % PALETTE.len()]
}

/// A chart measure as a styled span.
pub fn measure_span(value: f64, currency: bool) -> Span<'static> {
    Span::styled(measure(value, currency), Style::new().fg(PRIMARY))
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Pick a round axis top (and its midpoint) at or above `max_val`.
pub fn axis_ticks(max_val: f64) -> (f64, f64) {
    if !max_val.is_finite() {
        return (1.0, 0.5);
    }
    let mut step = 1.0;
    loop {
        for m in [1.0, 2.5, 5.0] {
            let candidate = step * m;
            if candidate >= max_val {
                return (candidate, candidate / 2.0);
            }
        }
        step *= 10.0;
    }
}
