use serde::Serialize;

use crate::pipeline::Aggregate;

/// What a renderer should draw. JSON consumers get the snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Bar,
    HorizontalBar,
    Pie,
    Line,
    GroupedBar,
    Box,
    /// States coloured by value.
    Choropleth,
    /// States present in the data highlighted in a single colour.
    MapHighlight,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Bar => "bar",
            Self::HorizontalBar => "horizontal bar",
            Self::Pie => "pie",
            Self::Line => "line",
            Self::GroupedBar => "grouped bar",
            Self::Box => "box",
            Self::Choropleth => "choropleth",
            Self::MapHighlight => "map",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn from_aggregate(name: impl Into<String>, agg: &Aggregate) -> Self {
        Self {
            name: name.into(),
            points: agg
                .rows
                .iter()
                .map(|r| Point { label: r.label(), value: r.value })
                .collect(),
        }
    }
}

/// Five-number summary for one box in a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub label: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    /// `None` for an empty sample.
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            label: label.into(),
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolation quantile over sorted, non-empty input.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Equal-width histogram over `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Point> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| {
            let lo = min + width * i as f64;
            Point {
                label: format!("{:.0}-{:.0}", lo, lo + width),
                value: n as f64,
            }
        })
        .collect()
}

/// Render-ready output of one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub view: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boxes: Vec<BoxSummary>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.value)
            .fold(0.0, f64::max)
    }

    pub fn total(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_summary_odd_sample() {
        let b = BoxSummary::from_values("Yes", &[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(b.count, 5);
        assert_eq!(b.min, 1.0);
        assert_eq!(b.q1, 2.0);
        assert_eq!(b.median, 3.0);
        assert_eq!(b.q3, 4.0);
        assert_eq!(b.max, 5.0);
    }

    #[test]
    fn test_box_summary_interpolates() {
        let b = BoxSummary::from_values("No", &[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert_eq!(b.median, 25.0);
        assert_eq!(b.q1, 17.5);
        assert_eq!(b.q3, 32.5);
    }

    #[test]
    fn test_box_summary_empty() {
        assert!(BoxSummary::from_values("No", &[]).is_none());
    }

    #[test]
    fn test_histogram_counts_everything() {
        let ages: Vec<f64> = (18..=70).map(|a| a as f64).collect();
        let bins = histogram(&ages, 15);
        assert_eq!(bins.len(), 15);
        let total: f64 = bins.iter().map(|p| p.value).sum();
        assert_eq!(total, ages.len() as f64);
        assert!(bins[0].label.starts_with("18-"));
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram(&[42.0, 42.0], 5);
        assert_eq!(bins[0].value, 2.0);
        assert_eq!(bins.iter().map(|p| p.value).sum::<f64>(), 2.0);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], 15).is_empty());
    }

    #[test]
    fn test_chart_data_json_shape() {
        let chart = ChartData {
            view: "sales-by-gender".into(),
            title: "Sales by Gender".into(),
            kind: ChartKind::Bar,
            x_label: "Gender".into(),
            y_label: "Total sales (USD)".into(),
            series: vec![Series {
                name: "Total sales (USD)".into(),
                points: vec![Point { label: "Male".into(), value: 10.0 }],
            }],
            boxes: vec![],
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"], "bar");
        assert_eq!(json["series"][0]["points"][0]["value"], 10.0);
        assert!(json.get("boxes").is_none());
        assert!(!chart.is_empty());
    }
}
