use crate::chart::{histogram, BoxSummary, ChartData, ChartKind, Point, Series};
use crate::dataset::Dataset;
use crate::error::{Result, ShopError};
use crate::filter::{Control, Filter};
use crate::models::{KeyValue, Size};
use crate::pipeline::{GroupKey, Order, Query, Reduction};
use crate::states::StateTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Shoppers,
    Products,
    Regions,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Shoppers => "1. Who is buying",
            Self::Products => "2. Product performance",
            Self::Regions => "3. Sales by region",
        }
    }

    /// One-paragraph lead shown above the section's charts.
    pub fn intro(&self) -> &'static str {
        match self {
            Self::Shoppers => {
                "Who the customers are: age, gender, how much they spend per \
                 category and how they like to pay."
            }
            Self::Products => {
                "Which products sell the most, which sizes move in each category \
                 and whether discounts change what people spend."
            }
            Self::Regions => {
                "How sales and average purchase size vary from state to state."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    AgeDistribution,
    SalesByGender,
    AvgSpendByCategory,
    PaymentMethods,
    AgeVsSpend,
    TopProducts,
    SizesByCategory,
    DiscountSpread,
    DiscountCounts,
    StateSalesMap,
    TopStatesSales,
    TopStatesSalesMap,
    StateAvgMap,
    TopStatesAvg,
    TopStatesAvgMap,
}

/// Static description of one dashboard chart.
#[derive(Debug)]
pub struct View {
    pub id: ViewId,
    pub slug: &'static str,
    pub section: Section,
    pub title: &'static str,
    pub kind: ChartKind,
    /// Dropdowns that drive this view. Views listing the same controls
    /// share one filter panel on the dashboard.
    pub controls: &'static [Control],
    pub x_label: &'static str,
    pub y_label: &'static str,
}

const NONE: &[Control] = &[];
const LOCATION: &[Control] = &[Control::Location];
const SEGMENT: &[Control] = &[Control::Gender, Control::AgeBracket];
const CATEGORY: &[Control] = &[Control::Category];
const CATEGORY_LOCATION: &[Control] = &[Control::Category, Control::Location];

/// Every view, in reading order.
pub const VIEWS: &[View] = &[
    View {
        id: ViewId::AgeDistribution,
        slug: "age-distribution",
        section: Section::Shoppers,
        title: "Customer Age Distribution",
        kind: ChartKind::Histogram,
        controls: NONE,
        x_label: "Age",
        y_label: "Frequency",
    },
    View {
        id: ViewId::SalesByGender,
        slug: "sales-by-gender",
        section: Section::Shoppers,
        title: "Sales by Gender",
        kind: ChartKind::Bar,
        controls: LOCATION,
        x_label: "Gender",
        y_label: "Total sales (USD)",
    },
    View {
        id: ViewId::AvgSpendByCategory,
        slug: "avg-spend-by-category",
        section: Section::Shoppers,
        title: "Average Spend by Category",
        kind: ChartKind::HorizontalBar,
        controls: SEGMENT,
        x_label: "Category",
        y_label: "Average spend (USD)",
    },
    View {
        id: ViewId::PaymentMethods,
        slug: "payment-methods",
        section: Section::Shoppers,
        title: "Preferred Payment Methods",
        kind: ChartKind::Pie,
        controls: SEGMENT,
        x_label: "Payment method",
        y_label: "Customers",
    },
    View {
        id: ViewId::AgeVsSpend,
        slug: "age-vs-spend",
        section: Section::Shoppers,
        title: "Age vs Amount Spent",
        kind: ChartKind::Line,
        controls: CATEGORY,
        x_label: "Age",
        y_label: "Average spend (USD)",
    },
    View {
        id: ViewId::TopProducts,
        slug: "top-products",
        section: Section::Products,
        title: "Top Selling Products",
        kind: ChartKind::Bar,
        controls: CATEGORY_LOCATION,
        x_label: "Product",
        y_label: "Total sales (USD)",
    },
    View {
        id: ViewId::SizesByCategory,
        slug: "sizes-by-category",
        section: Section::Products,
        title: "Sizes Purchased by Category",
        kind: ChartKind::GroupedBar,
        controls: NONE,
        x_label: "Category",
        y_label: "Purchases",
    },
    View {
        id: ViewId::DiscountSpread,
        slug: "discount-spread",
        section: Section::Products,
        title: "Purchase Amount With and Without Discount",
        kind: ChartKind::Box,
        controls: CATEGORY,
        x_label: "Discount applied",
        y_label: "Purchase amount (USD)",
    },
    View {
        id: ViewId::DiscountCounts,
        slug: "discount-counts",
        section: Section::Products,
        title: "Sales With and Without Discount",
        kind: ChartKind::Bar,
        controls: CATEGORY,
        x_label: "Discount applied",
        y_label: "Sales",
    },
    View {
        id: ViewId::StateSalesMap,
        slug: "state-sales-map",
        section: Section::Regions,
        title: "Total Sales by State",
        kind: ChartKind::Choropleth,
        controls: NONE,
        x_label: "State",
        y_label: "Total sales (USD)",
    },
    View {
        id: ViewId::TopStatesSales,
        slug: "top-states-sales",
        section: Section::Regions,
        title: "Top States by Sales",
        kind: ChartKind::Bar,
        controls: CATEGORY,
        x_label: "State",
        y_label: "Total sales (USD)",
    },
    View {
        id: ViewId::TopStatesSalesMap,
        slug: "top-states-sales-map",
        section: Section::Regions,
        title: "Map of Top States by Sales",
        kind: ChartKind::MapHighlight,
        controls: CATEGORY,
        x_label: "State",
        y_label: "Total sales (USD)",
    },
    View {
        id: ViewId::StateAvgMap,
        slug: "state-avg-map",
        section: Section::Regions,
        title: "Average Purchase by State",
        kind: ChartKind::Choropleth,
        controls: NONE,
        x_label: "State",
        y_label: "Average purchase (USD)",
    },
    View {
        id: ViewId::TopStatesAvg,
        slug: "top-states-avg",
        section: Section::Regions,
        title: "Top States by Average Purchase",
        kind: ChartKind::Bar,
        controls: CATEGORY,
        x_label: "State",
        y_label: "Average purchase (USD)",
    },
    View {
        id: ViewId::TopStatesAvgMap,
        slug: "top-states-avg-map",
        section: Section::Regions,
        title: "Map of Top States by Average Purchase",
        kind: ChartKind::MapHighlight,
        controls: CATEGORY,
        x_label: "State",
        y_label: "Average purchase (USD)",
    },
];

pub fn find(slug: &str) -> Result<&'static View> {
    VIEWS
        .iter()
        .find(|v| v.slug == slug)
        .ok_or_else(|| ShopError::UnknownView(slug.to_string()))
}

/// Read-only inputs shared by every view render.
pub struct Context<'a> {
    pub data: &'a Dataset,
    pub states: &'a StateTable,
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl View {
    /// The pipeline pass behind this view, or `None` for views drawn from
    /// raw values (histogram and box plot).
    pub fn query(&self, filter: Filter, top_n: usize) -> Option<Query> {
        use GroupKey as K;
        let q = match self.id {
            ViewId::AgeDistribution | ViewId::DiscountSpread => return None,
            ViewId::SalesByGender => Query::new(&[K::Gender], Reduction::Sum).order(Order::Ascending),
            ViewId::AvgSpendByCategory => {
                Query::new(&[K::Category], Reduction::Mean).order(Order::Ascending)
            }
            ViewId::PaymentMethods => {
                Query::new(&[K::PaymentMethod], Reduction::Count).order(Order::Descending)
            }
            ViewId::AgeVsSpend => Query::new(&[K::Age, K::Gender], Reduction::Mean),
            ViewId::TopProducts => Query::new(&[K::Item], Reduction::Sum).top(top_n),
            ViewId::SizesByCategory => Query::new(&[K::Category, K::Size], Reduction::Count),
            ViewId::DiscountCounts => Query::new(&[K::Discount], Reduction::Count),
            ViewId::StateSalesMap => Query::new(&[K::Location], Reduction::Sum).remap_states(),
            ViewId::TopStatesSales => Query::new(&[K::Location], Reduction::Sum).top(top_n),
            ViewId::TopStatesSalesMap => {
                Query::new(&[K::Location], Reduction::Sum).top(top_n).remap_states()
            }
            ViewId::StateAvgMap => Query::new(&[K::Location], Reduction::Mean).remap_states(),
            ViewId::TopStatesAvg => Query::new(&[K::Location], Reduction::Mean).top(top_n),
            ViewId::TopStatesAvgMap => {
                Query::new(&[K::Location], Reduction::Mean).top(top_n).remap_states()
            }
        };
        Some(q.filter(filter))
    }

    /// Title with the active selections appended, plus the K for top-K views.
    pub fn heading(&self, filter: &Filter, top_n: usize) -> String {
        let title = match self.id {
            ViewId::TopProducts
            | ViewId::TopStatesSales
            | ViewId::TopStatesSalesMap
            | ViewId::TopStatesAvg
            | ViewId::TopStatesAvgMap => self.title.replacen("Top", &format!("Top {top_n}"), 1),
            _ => self.title.to_string(),
        };
        format!("{title}{}", filter.restricted_to(self.controls).suffix())
    }

    /// Compute this view's chart data. Selections on controls the view is
    /// not bound to are ignored. An empty selection yields empty series.
    pub fn render(&self, ctx: &Context, filter: &Filter) -> ChartData {
        let filter = filter.restricted_to(self.controls);
        let title = self.heading(&filter, ctx.top_n);
        let mut boxes = Vec::new();

        let series = match self.id {
            ViewId::AgeDistribution => {
                let ages: Vec<f64> = filter.apply(ctx.data).iter().map(|t| t.age as f64).collect();
                vec![Series {
                    name: self.y_label.to_string(),
                    points: histogram(&ages, ctx.histogram_bins),
                }]
            }
            ViewId::DiscountSpread => {
                let rows = filter.apply(ctx.data);
                for (label, flag) in [("No", false), ("Yes", true)] {
                    let amounts: Vec<f64> = rows
                        .iter()
                        .filter(|t| t.discount_applied == flag)
                        .map(|t| t.amount)
                        .collect();
                    boxes.extend(BoxSummary::from_values(label, &amounts));
                }
                Vec::new()
            }
            ViewId::AgeVsSpend => {
                let agg = self.run_query(ctx, filter.clone());
                split_series(&agg, |key| (key[1].to_string(), key[0].to_string()))
            }
            ViewId::SizesByCategory => {
                let agg = self.run_query(ctx, filter.clone());
                let mut series = split_series(&agg, |key| (key[1].to_string(), key[0].to_string()));
                series.sort_by_key(|s| {
                    Size::ALL
                        .iter()
                        .position(|size| size.label() == s.name)
                        .unwrap_or(usize::MAX)
                });
                series
            }
            _ => {
                let agg = self.run_query(ctx, filter.clone());
                vec![Series::from_aggregate(self.y_label, &agg)]
            }
        };

        ChartData {
            view: self.slug.to_string(),
            title,
            kind: self.kind,
            x_label: self.x_label.to_string(),
            y_label: self.y_label.to_string(),
            series,
            boxes,
        }
    }

    fn run_query(&self, ctx: &Context, filter: Filter) -> crate::pipeline::Aggregate {
        match self.query(filter, ctx.top_n) {
            Some(q) => q.run(ctx.data, ctx.states),
            None => Default::default(),
        }
    }
}

/// Split a two-key aggregate into one series per `(series, point)` pair
/// returned by `pick`, keeping first-seen series order.
fn split_series<F>(agg: &crate::pipeline::Aggregate, pick: F) -> Vec<Series>
where
    F: Fn(&[KeyValue]) -> (String, String),
{
    let mut out: Vec<Series> = Vec::new();
    for row in &agg.rows {
        let (name, label) = pick(row.key.as_slice());
        let point = Point { label, value: row.value };
        match out.iter_mut().find(|s| s.name == name) {
            Some(s) => s.points.push(point),
            None => out.push(Series { name, points: vec![point] }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{txn, SAMPLE_CSV};
    use crate::models::{Category, Gender, Transaction};

    fn sample_dataset() -> Dataset {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();
        Dataset::load(&path).unwrap()
    }

    fn render(slug: &str, data: &Dataset, filter: &Filter) -> ChartData {
        let states = StateTable::us();
        let ctx = Context { data, states: &states, top_n: 10, histogram_bins: 15 };
        find(slug).unwrap().render(&ctx, filter)
    }

    #[test]
    fn test_slugs_are_unique() {
        for (i, v) in VIEWS.iter().enumerate() {
            assert!(VIEWS[i + 1..].iter().all(|o| o.slug != v.slug), "{}", v.slug);
        }
        assert_eq!(VIEWS.len(), 15);
    }

    #[test]
    fn test_find_unknown_view() {
        assert!(matches!(find("nope"), Err(ShopError::UnknownView(_))));
    }

    #[test]
    fn test_sales_by_gender_with_location() {
        let data = Dataset::from_rows(vec![
            txn(Gender::Male, "California", 10.0),
            txn(Gender::Female, "California", 20.0),
            txn(Gender::Male, "New York", 5.0),
        ]);
        let filter = Filter { location: Some("California".into()), ..Default::default() };
        let chart = render("sales-by-gender", &data, &filter);
        assert_eq!(chart.title, "Sales by Gender - California");
        let points = &chart.series[0].points;
        assert_eq!(points[0], Point { label: "Male".into(), value: 10.0 });
        assert_eq!(points[1], Point { label: "Female".into(), value: 20.0 });
    }

    #[test]
    fn test_unbound_controls_are_ignored() {
        let data = sample_dataset();
        let filter = Filter { category: Some(Category::Footwear), ..Default::default() };
        let with = render("sales-by-gender", &data, &filter);
        let without = render("sales-by-gender", &data, &Filter::default());
        assert_eq!(with, without);
    }

    #[test]
    fn test_empty_selection_renders_empty_chart() {
        let data = sample_dataset();
        let filter = Filter { location: Some("Texas".into()), ..Default::default() };
        for view in VIEWS {
            let chart = render(view.slug, &data, &filter);
            if view.controls.contains(&Control::Location) {
                assert!(chart.is_empty(), "{}", view.slug);
            }
        }
    }

    #[test]
    fn test_every_view_renders_sample() {
        let data = sample_dataset();
        for view in VIEWS {
            let chart = render(view.slug, &data, &Filter::default());
            assert!(!chart.is_empty(), "{} rendered nothing", view.slug);
            assert_eq!(chart.kind, view.kind);
        }
    }

    fn labels(chart: &ChartData) -> Vec<&str> {
        chart.series[0].points.iter().map(|p| p.label.as_str()).collect()
    }

    fn values(chart: &ChartData) -> Vec<f64> {
        chart.series[0].points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn test_top_products_filters_sums_and_truncates() {
        let item = |name: &str, category: Category, location: &str, amount: f64| Transaction {
            item: name.to_string(),
            category,
            ..txn(Gender::Female, location, amount)
        };
        let data = Dataset::from_rows(vec![
            item("Blouse", Category::Clothing, "California", 10.0),
            item("Blouse", Category::Clothing, "California", 15.0),
            item("Shirt", Category::Clothing, "California", 30.0),
            item("Jeans", Category::Clothing, "California", 5.0),
            item("Coat", Category::Clothing, "New York", 100.0),
            item("Boots", Category::Footwear, "California", 200.0),
        ]);
        let states = StateTable::us();
        let ctx = Context { data: &data, states: &states, top_n: 2, histogram_bins: 15 };
        let filter = Filter {
            category: Some(Category::Clothing),
            location: Some("California".into()),
            ..Default::default()
        };
        let chart = find("top-products").unwrap().render(&ctx, &filter);
        assert_eq!(chart.title, "Top 2 Selling Products - Clothing - California");
        assert_eq!(labels(&chart), vec!["Shirt", "Blouse"]);
        assert_eq!(values(&chart), vec![30.0, 25.0]);
    }

    #[test]
    fn test_payment_methods_count_descending() {
        let data = sample_dataset();
        let chart = render("payment-methods", &data, &Filter::default());
        assert_eq!(values(&chart), vec![3.0, 3.0, 2.0, 2.0, 1.0, 1.0]);
        // ties keep ascending name order
        assert_eq!(
            labels(&chart),
            vec!["Cash", "Venmo", "Credit Card", "PayPal", "Bank Transfer", "Debit Card"]
        );
    }

    #[test]
    fn test_avg_spend_by_category_ascending_means() {
        let data = sample_dataset();
        let chart = render("avg-spend-by-category", &data, &Filter::default());
        assert_eq!(labels(&chart), vec!["Footwear", "Accessories", "Clothing", "Outerwear"]);
        let v = values(&chart);
        assert_eq!(v[0], 48.0);
        assert_eq!(v[1], 49.5);
        assert!((v[2] - 358.0 / 6.0).abs() < 1e-9);
        assert_eq!(v[3], 97.0);
    }

    #[test]
    fn test_discount_counts_by_category() {
        let data = sample_dataset();
        let all = render("discount-counts", &data, &Filter::default());
        assert_eq!(labels(&all), vec!["No", "Yes"]);
        assert_eq!(values(&all), vec![7.0, 5.0]);

        let filter = Filter { category: Some(Category::Footwear), ..Default::default() };
        let footwear = render("discount-counts", &data, &filter);
        assert_eq!(footwear.title, "Sales With and Without Discount - Footwear");
        assert_eq!(values(&footwear), vec![2.0, 1.0]);
    }

    #[test]
    fn test_top_states_avg_uses_mean() {
        let data = sample_dataset();
        let chart = render("top-states-avg", &data, &Filter::default());
        let points = &chart.series[0].points;
        assert_eq!(points[0], Point { label: "West Virginia".into(), value: 97.0 });
        let maine = points.iter().find(|p| p.label == "Maine").unwrap();
        assert_eq!(maine.value, 66.0);

        let map = render("top-states-avg-map", &data, &Filter::default());
        assert_eq!(map.series[0].points[0], Point { label: "WV".into(), value: 97.0 });
    }

    #[test]
    fn test_state_map_uses_codes() {
        let data = sample_dataset();
        let chart = render("state-sales-map", &data, &Filter::default());
        let labels: Vec<&str> = chart.series[0].points.iter().map(|p| p.label.as_str()).collect();
        assert!(labels.contains(&"KY"));
        assert!(labels.contains(&"WV"));
        assert!(!labels.contains(&"Kentucky"));
        let ky = chart.series[0].points.iter().find(|p| p.label == "KY").unwrap();
        assert_eq!(ky.value, 87.0);
    }

    #[test]
    fn test_top_states_truncates_and_titles() {
        let data = sample_dataset();
        let states = StateTable::us();
        let ctx = Context { data: &data, states: &states, top_n: 3, histogram_bins: 15 };
        let chart = find("top-states-sales").unwrap().render(&ctx, &Filter::default());
        assert_eq!(chart.title, "Top 3 States by Sales");
        let points = &chart.series[0].points;
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].label, "Maine");
        assert_eq!(points[0].value, 132.0);
    }

    #[test]
    fn test_age_vs_spend_splits_by_gender() {
        let data = sample_dataset();
        let chart = render("age-vs-spend", &data, &Filter::default());
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Male") && names.contains(&"Female"));
        let female = chart.series.iter().find(|s| s.name == "Female").unwrap();
        assert_eq!(female.points[0].label, "20");
    }

    #[test]
    fn test_sizes_series_in_size_order() {
        let data = sample_dataset();
        let chart = render("sizes-by-category", &data, &Filter::default());
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S", "M", "L", "XL"]);
        let total: f64 = chart.total();
        assert_eq!(total, data.len() as f64);
    }

    #[test]
    fn test_discount_spread_boxes() {
        let data = sample_dataset();
        let chart = render("discount-spread", &data, &Filter::default());
        assert_eq!(chart.boxes.len(), 2);
        assert_eq!(chart.boxes[0].label, "No");
        assert_eq!(chart.boxes[0].count + chart.boxes[1].count, data.len());
    }

    #[test]
    fn test_segment_heading() {
        let data = sample_dataset();
        let filter = Filter {
            gender: Some(Gender::Female),
            age: Some(crate::filter::AgeBracket::From20To30),
            ..Default::default()
        };
        let chart = render("payment-methods", &data, &filter);
        assert_eq!(chart.title, "Preferred Payment Methods - Female - 20-30");
        // rows 4, 9 and 11 of the sample
        assert_eq!(chart.total(), 3.0);
    }
}
