use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Padding,
        Paragraph, Row, Table,
    },
    Frame,
};

use crate::chart::{ChartData, ChartKind};
use crate::cli::report::text::is_currency;
use crate::cli::Session;
use crate::error::Result;
use crate::filter::{Control, Filter};
use crate::fmt::{compact, measure, money, number};
use crate::tui::{
    axis_ticks, measure_span, palette, wrap_text, FOCUSED_CONTROL_STYLE, FOOTER_STYLE,
    HEADER_STYLE, PRIMARY, SECTION_STYLE, SELECTED_STYLE,
};
use crate::views::{View, VIEWS};

const LIST_WIDTH: u16 = 36;

const HINTS: &str = " ↑↓ view  Tab next filter  ←→ change filter  r reset  q quit";

struct Dashboard<'a> {
    session: &'a Session,
    selected: usize,
    filter: Filter,
    /// Index into the selected view's controls.
    focus: usize,
    chart: ChartData,
    status: Option<String>,
}

impl<'a> Dashboard<'a> {
    fn new(session: &'a Session) -> Self {
        let filter = Filter::default();
        let chart = VIEWS[0].render(&session.context(), &filter);
        Self {
            session,
            selected: 0,
            filter,
            focus: 0,
            chart,
            status: None,
        }
    }

    fn view(&self) -> &'static View {
        &VIEWS[self.selected]
    }

    fn refresh(&mut self) {
        self.chart = self.view().render(&self.session.context(), &self.filter);
    }

    fn focused_control(&self) -> Option<Control> {
        self.view().controls.get(self.focus).copied()
    }

    /// Returns true when the dashboard should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        self.status = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                self.focus = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(VIEWS.len() - 1);
                self.focus = 0;
            }
            KeyCode::Tab => {
                let n = self.view().controls.len();
                if n > 0 {
                    self.focus = (self.focus + 1) % n;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                if let Some(control) = self.focused_control() {
                    let forward = code == KeyCode::Right;
                    if let Err(e) = control.cycle(&mut self.filter, &self.session.data, forward) {
                        self.status = Some(e.to_string());
                    }
                }
            }
            KeyCode::Char('r') => self.filter = Filter::default(),
            _ => return false,
        }
        self.refresh();
        false
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let view = self.view();
        let (intro, intro_lines) =
            wrap_text(view.section.intro(), area.width.saturating_sub(2) as usize);

        let [header_area, intro_area, filter_area, body_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(intro_lines),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let data = &self.session.data;
        let header = Line::from(vec![
            Span::styled(" US shopping trends  ", HEADER_STYLE),
            Span::styled(format!("{} purchases  ", number(data.len())), FOOTER_STYLE),
            measure_span(data.total_amount(), true),
        ]);
        frame.render_widget(Paragraph::new(header), header_area);
        frame.render_widget(
            Paragraph::new(intro)
                .style(FOOTER_STYLE)
                .block(Block::default().padding(Padding::horizontal(1))),
            intro_area,
        );
        frame.render_widget(Paragraph::new(self.filter_line()), filter_area);

        let [list_area, chart_area] =
            Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Fill(1)])
                .areas(body_area);
        frame.render_widget(Paragraph::new(self.list_lines()), list_area);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.chart.title), HEADER_STYLE))
            .borders(Borders::ALL)
            .border_style(FOOTER_STYLE);
        let inner = block.inner(chart_area);
        frame.render_widget(block, chart_area);
        draw_chart(frame, &self.chart, inner);

        let hints = match &self.status {
            Some(msg) => Span::styled(format!(" {msg}"), Style::new().fg(Color::Red)),
            None => Span::styled(HINTS, FOOTER_STYLE),
        };
        frame.render_widget(Paragraph::new(hints), hints_area);
    }

    fn filter_line(&self) -> Line<'static> {
        let controls = self.view().controls;
        if controls.is_empty() {
            return Line::from(Span::styled(" No filters for this view", FOOTER_STYLE));
        }
        let mut spans = vec![Span::raw(" ")];
        for (i, control) in controls.iter().enumerate() {
            let value = format!(" ◂ {} ▸ ", control.current(&self.filter));
            let style = if i == self.focus {
                FOCUSED_CONTROL_STYLE
            } else {
                SELECTED_STYLE
            };
            spans.push(Span::raw(format!("{}: ", control.label())));
            spans.push(Span::styled(value, style));
            spans.push(Span::raw("   "));
        }
        Line::from(spans)
    }

    fn list_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut section = None;
        for (i, v) in VIEWS.iter().enumerate() {
            if section != Some(v.section) {
                if section.is_some() {
                    lines.push(Line::from(""));
                }
                section = Some(v.section);
                lines.push(Line::from(Span::styled(
                    format!(" {}", v.section.title()),
                    SECTION_STYLE,
                )));
            }
            let line = Line::from(format!("   {}", v.title));
            lines.push(if i == self.selected {
                line.style(SELECTED_STYLE)
            } else {
                line
            });
        }
        lines
    }
}

/// Bars are integer-valued; keep cents.
fn scaled(v: f64) -> u64 {
    (v * 100.0).round().max(0.0) as u64
}

fn tick_label(v: f64, currency: bool) -> String {
    if currency {
        compact(v)
    } else {
        number(v.round().max(0.0) as usize)
    }
}

/// Point labels across all series, first-seen order.
fn x_labels(chart: &ChartData) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in chart.series.iter().flat_map(|s| s.points.iter()) {
        if !out.contains(&p.label) {
            out.push(p.label.clone());
        }
    }
    out
}

fn legend(chart: &ChartData) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, s) in chart.series.iter().enumerate() {
        spans.push(Span::styled("■ ", Style::new().fg(palette(i))));
        spans.push(Span::raw(format!("{}  ", s.name)));
    }
    Line::from(spans)
}

fn draw_chart(frame: &mut Frame, chart: &ChartData, area: Rect) {
    if chart.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(" No data for this selection.", FOOTER_STYLE)),
            area,
        );
        return;
    }
    match chart.kind {
        ChartKind::Line => draw_line(frame, chart, area),
        ChartKind::Box => draw_box(frame, chart, area),
        ChartKind::GroupedBar => draw_grouped(frame, chart, area),
        ChartKind::Bar | ChartKind::Histogram => draw_columns(frame, chart, area),
        ChartKind::HorizontalBar
        | ChartKind::Pie
        | ChartKind::Choropleth
        | ChartKind::MapHighlight => draw_rows(frame, chart, area),
    }
}

/// Vertical bars with a two-tick y axis.
fn draw_columns(frame: &mut Frame, chart: &ChartData, area: Rect) {
    let currency = is_currency(chart);
    let (top, mid) = axis_ticks(chart.max_value());
    let top_label = tick_label(top, currency);
    let mid_label = tick_label(mid, currency);
    let label_width = top_label.len().max(mid_label.len()) as u16 + 1;

    let [axis_area, bar_area] =
        Layout::horizontal([Constraint::Length(label_width), Constraint::Fill(1)]).areas(area);

    // Last row of the bar area holds the bar labels.
    let inner_height = bar_area.height.saturating_sub(1);
    let mid_row = inner_height / 2;
    let mut y_lines: Vec<Line> = Vec::new();
    for row in 0..inner_height {
        let label = if row == 0 {
            top_label.as_str()
        } else if row == mid_row {
            mid_label.as_str()
        } else {
            ""
        };
        y_lines.push(Line::from(Span::styled(
            format!("{:>width$}", label, width = label_width as usize),
            FOOTER_STYLE,
        )));
    }
    frame.render_widget(Paragraph::new(y_lines), axis_area);

    let points: Vec<_> = chart.series.iter().flat_map(|s| s.points.iter()).collect();
    let slots = points.len().max(1) as u16;
    let bar_width = (bar_area.width / slots).saturating_sub(1).clamp(1, 9);
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value(scaled(p.value))
                .label(Line::from(p.label.clone()))
                .text_value(String::new())
                .style(Style::new().fg(PRIMARY))
        })
        .collect();

    let widget = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(scaled(top));
    frame.render_widget(widget, bar_area);
}

/// Horizontal bars, one row per point. Pie slices get their own colour and share.
fn draw_rows(frame: &mut Frame, chart: &ChartData, area: Rect) {
    let currency = is_currency(chart);
    let total = chart.total();
    let bars: Vec<Bar> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .enumerate()
        .map(|(i, p)| {
            let (text, color) = if chart.kind == ChartKind::Pie {
                let share = if total > 0.0 { p.value / total * 100.0 } else { 0.0 };
                (format!("{} ({share:.1}%)", measure(p.value, currency)), palette(i))
            } else {
                (measure(p.value, currency), PRIMARY)
            };
            Bar::default()
                .value(scaled(p.value))
                .label(Line::from(p.label.clone()))
                .text_value(text)
                .style(Style::new().fg(color))
                .value_style(Style::new().fg(Color::Black).bg(color))
        })
        .collect();

    let widget = BarChart::default()
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .max(scaled(chart.max_value()).max(1));
    frame.render_widget(widget, area);
}

/// One group per x label, one coloured bar per series.
fn draw_grouped(frame: &mut Frame, chart: &ChartData, area: Rect) {
    let currency = is_currency(chart);
    let [legend_area, bar_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
    frame.render_widget(Paragraph::new(legend(chart)), legend_area);

    let groups: Vec<BarGroup> = x_labels(chart)
        .into_iter()
        .map(|label| {
            let bars: Vec<Bar> = chart
                .series
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let v = s
                        .points
                        .iter()
                        .find(|p| p.label == label)
                        .map_or(0.0, |p| p.value);
                    Bar::default()
                        .value(scaled(v))
                        .text_value(measure(v, currency))
                        .style(Style::new().fg(palette(i)))
                })
                .collect();
            BarGroup::default().label(Line::from(label)).bars(&bars)
        })
        .collect();

    let mut widget = BarChart::default().bar_width(4).bar_gap(0).group_gap(2);
    for group in &groups {
        widget = widget.data(group.clone());
    }
    frame.render_widget(widget, bar_area);
}

fn draw_line(frame: &mut Frame, chart: &ChartData, area: Rect) {
    let currency = is_currency(chart);
    let labels = x_labels(chart);
    if labels.is_empty() {
        return;
    }
    let data: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .filter_map(|p| {
                    labels
                        .iter()
                        .position(|l| *l == p.label)
                        .map(|x| (x as f64, p.value))
                })
                .collect()
        })
        .collect();
    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(&data)
        .enumerate()
        .map(|(i, (s, points))| {
            Dataset::default()
                .name(s.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::new().fg(palette(i)))
                .data(points)
        })
        .collect();

    let last = labels.len() - 1;
    let (top, mid) = axis_ticks(chart.max_value());
    let widget = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .style(FOOTER_STYLE)
                .bounds([0.0, last.max(1) as f64])
                .labels(vec![
                    labels[0].clone(),
                    labels[last / 2].clone(),
                    labels[last].clone(),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .style(FOOTER_STYLE)
                .bounds([0.0, top])
                .labels(vec![
                    tick_label(0.0, currency),
                    tick_label(mid, currency),
                    tick_label(top, currency),
                ]),
        );
    frame.render_widget(widget, area);
}

fn draw_box(frame: &mut Frame, chart: &ChartData, area: Rect) {
    let header = Row::new([chart.x_label.as_str(), "n", "Min", "Q1", "Median", "Q3", "Max"])
        .style(SECTION_STYLE);
    let rows: Vec<Row> = chart
        .boxes
        .iter()
        .map(|b| {
            Row::new(vec![
                b.label.clone(),
                number(b.count),
                money(b.min),
                money(b.q1),
                money(b.median),
                money(b.q3),
                money(b.max),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::default().padding(Padding::uniform(1)));
    frame.render_widget(table, area);
}

pub fn run(session: &Session) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut dashboard = Dashboard::new(session);
    let mut terminal = ratatui::init();

    let exit: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                if dashboard.handle_key(key.code) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    exit
}
