use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::chart::{ChartData, ChartKind, Series};
use crate::fmt::{measure, money, number};

const BAR_WIDTH: usize = 30;

/// Whether a chart's measure is a dollar amount rather than a count.
pub fn is_currency(chart: &ChartData) -> bool {
    chart.y_label.contains("USD")
}

/// Horizontal bar scaled against `max`, at most `BAR_WIDTH` cells.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let n = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(n.min(BAR_WIDTH))
}

fn right(s: impl ToString) -> Cell {
    Cell::new(s.to_string()).set_alignment(CellAlignment::Right)
}

pub fn format_chart(chart: &ChartData) -> String {
    let heading = format!("{} ({})", chart.title.bold(), chart.kind.label());
    if chart.is_empty() {
        return format!("{heading}\n  (no data for this selection)");
    }
    let table = match chart.kind {
        ChartKind::Pie => pie_table(chart),
        ChartKind::Line | ChartKind::GroupedBar => pivot_table(chart),
        ChartKind::Box => box_table(chart),
        ChartKind::MapHighlight => highlight_table(chart),
        ChartKind::Histogram
        | ChartKind::Bar
        | ChartKind::HorizontalBar
        | ChartKind::Choropleth => bar_table(chart),
    };
    format!("{heading}\n{table}")
}

fn bar_table(chart: &ChartData) -> Table {
    let currency = is_currency(chart);
    let max = chart.max_value();
    let mut table = Table::new();
    table.set_header(vec![chart.x_label.as_str(), chart.y_label.as_str(), ""]);
    for p in chart.series.iter().flat_map(|s| s.points.iter()) {
        table.add_row(vec![
            Cell::new(&p.label),
            right(measure(p.value, currency)),
            Cell::new(bar(p.value, max).blue().to_string()),
        ]);
    }
    table
}

fn pie_table(chart: &ChartData) -> Table {
    let total = chart.total();
    let mut table = Table::new();
    table.set_header(vec![chart.x_label.as_str(), chart.y_label.as_str(), "Share"]);
    for p in chart.series.iter().flat_map(|s| s.points.iter()) {
        let share = if total > 0.0 { p.value / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(&p.label),
            right(number(p.value as usize)),
            right(format!("{share:.1}%")),
        ]);
    }
    table
}

/// One row per x label, one column per series.
fn pivot_table(chart: &ChartData) -> Table {
    let currency = is_currency(chart);
    let mut labels: Vec<&str> = Vec::new();
    for p in chart.series.iter().flat_map(|s| s.points.iter()) {
        if !labels.contains(&p.label.as_str()) {
            labels.push(&p.label);
        }
    }

    let mut header = vec![chart.x_label.clone()];
    header.extend(chart.series.iter().map(|s| s.name.clone()));
    let mut table = Table::new();
    table.set_header(header);
    for label in labels {
        let mut row = vec![Cell::new(label)];
        for s in &chart.series {
            row.push(match lookup(s, label) {
                Some(v) => right(measure(v, currency)),
                None => right("-"),
            });
        }
        table.add_row(row);
    }
    table
}

fn lookup(series: &Series, label: &str) -> Option<f64> {
    series.points.iter().find(|p| p.label == label).map(|p| p.value)
}

fn box_table(chart: &ChartData) -> Table {
    let mut table = Table::new();
    table.set_header(vec![chart.x_label.as_str(), "n", "Min", "Q1", "Median", "Q3", "Max"]);
    for b in &chart.boxes {
        table.add_row(vec![
            Cell::new(&b.label),
            right(number(b.count)),
            right(money(b.min)),
            right(money(b.q1)),
            right(money(b.median)),
            right(money(b.q3)),
            right(money(b.max)),
        ]);
    }
    table
}

fn highlight_table(chart: &ChartData) -> Table {
    let currency = is_currency(chart);
    let mut table = Table::new();
    table.set_header(vec!["Rank", chart.x_label.as_str(), chart.y_label.as_str()]);
    for (i, p) in chart.series.iter().flat_map(|s| s.points.iter()).enumerate() {
        table.add_row(vec![
            right(i + 1),
            Cell::new(p.label.blue().bold().to_string()),
            right(measure(p.value, currency)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BoxSummary, Point};

    fn chart(kind: ChartKind, series: Vec<Series>) -> ChartData {
        ChartData {
            view: "test".into(),
            title: "Test Chart".into(),
            kind,
            x_label: "Key".into(),
            y_label: "Total sales (USD)".into(),
            series,
            boxes: vec![],
        }
    }

    fn series(name: &str, points: &[(&str, f64)]) -> Series {
        Series {
            name: name.into(),
            points: points
                .iter()
                .map(|(l, v)| Point { label: l.to_string(), value: *v })
                .collect(),
        }
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0, 10.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0.001, 10.0).chars().count(), 1);
        assert!(bar(0.0, 10.0).is_empty());
        assert!(bar(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_empty_chart_message() {
        let out = format_chart(&chart(ChartKind::Bar, vec![series("v", &[])]));
        assert!(out.contains("Test Chart"));
        assert!(out.contains("(no data for this selection)"));
    }

    #[test]
    fn test_bar_table_formats_money() {
        let out = format_chart(&chart(ChartKind::Bar, vec![series("v", &[("Male", 1234.5)])]));
        assert!(out.contains("Male"));
        assert!(out.contains("$1,234.50"));
    }

    #[test]
    fn test_pie_shares() {
        let mut c = chart(ChartKind::Pie, vec![series("v", &[("Cash", 3.0), ("Venmo", 1.0)])]);
        c.y_label = "Customers".into();
        let out = format_chart(&c);
        assert!(out.contains("75.0%"));
        assert!(out.contains("25.0%"));
    }

    #[test]
    fn test_pivot_fills_gaps() {
        let c = chart(
            ChartKind::Line,
            vec![series("Male", &[("19", 10.0), ("20", 12.0)]), series("Female", &[("20", 8.0)])],
        );
        let out = format_chart(&c);
        assert!(out.contains("Female"));
        assert!(out.contains("$8.00"));
        assert!(out.contains(" - "));
    }

    #[test]
    fn test_box_table() {
        let mut c = chart(ChartKind::Box, vec![]);
        c.boxes.push(BoxSummary::from_values("Yes", &[10.0, 20.0, 30.0]).unwrap());
        let out = format_chart(&c);
        assert!(out.contains("Median"));
        assert!(out.contains("$20.00"));
    }
}
