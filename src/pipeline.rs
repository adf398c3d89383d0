use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::filter::Filter;
use crate::models::{KeyValue, Transaction};
use crate::states::StateTable;

// ---------------------------------------------------------------------------
// Query parts
// ---------------------------------------------------------------------------

/// A column a view can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Age,
    Gender,
    Location,
    Category,
    Item,
    Size,
    Discount,
    PaymentMethod,
}

impl GroupKey {
    pub fn extract(&self, t: &Transaction) -> KeyValue {
        match self {
            Self::Age => KeyValue::Int(t.age),
            Self::Gender => KeyValue::Text(t.gender.label().to_string()),
            Self::Location => KeyValue::Text(t.location.clone()),
            Self::Category => KeyValue::Text(t.category.label().to_string()),
            Self::Item => KeyValue::Text(t.item.clone()),
            Self::Size => KeyValue::Size(t.size),
            Self::Discount => KeyValue::Text(t.discount_label().to_string()),
            Self::PaymentMethod => KeyValue::Text(t.payment_method.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    Sum,
    Mean,
    Count,
}

/// Row order applied after reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Ascending group key (numeric for ages, S..XL for sizes).
    Key,
    Ascending,
    Descending,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggRow {
    pub key: Vec<KeyValue>,
    pub value: f64,
}

impl AggRow {
    /// Display label for the key, parts joined with " / ".
    pub fn label(&self) -> String {
        self.key
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub rows: Vec<AggRow>,
}

#[cfg(test)]
impl Aggregate {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.rows.iter().map(|r| r.value).fold(0.0, f64::max)
    }

    /// Single-key lookup by display label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.label() == label).map(|r| r.value)
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// One filter → group → reduce → order → truncate → remap pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub group_by: Vec<GroupKey>,
    pub filter: Filter,
    pub reduction: Reduction,
    pub order: Order,
    pub top: Option<usize>,
    pub remap_states: bool,
}

impl Query {
    pub fn new(group_by: &[GroupKey], reduction: Reduction) -> Self {
        Self {
            group_by: group_by.to_vec(),
            filter: Filter::default(),
            reduction,
            order: Order::Key,
            top: None,
            remap_states: false,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Keep the `k` highest groups (implies descending order).
    pub fn top(mut self, k: usize) -> Self {
        self.order = Order::Descending;
        self.top = Some(k);
        self
    }

    pub fn remap_states(mut self) -> Self {
        self.remap_states = true;
        self
    }

    pub fn run(&self, data: &Dataset, states: &StateTable) -> Aggregate {
        let rows = self.filter.apply(data);
        self.run_rows(&rows, states)
    }

    /// Same as `run` but over an already-filtered row set; the query's own
    /// filter is applied on top.
    pub fn run_rows(&self, rows: &[&Transaction], states: &StateTable) -> Aggregate {
        // (sum, count) per group; BTreeMap gives ascending key order
        let mut groups: BTreeMap<Vec<KeyValue>, (f64, usize)> = BTreeMap::new();
        for t in rows.iter().filter(|t| self.filter.matches(t)) {
            let key: Vec<KeyValue> = self.group_by.iter().map(|g| g.extract(t)).collect();
            let acc = groups.entry(key).or_insert((0.0, 0));
            acc.0 += t.amount;
            acc.1 += 1;
        }

        let mut out: Vec<AggRow> = groups
            .into_iter()
            .map(|(key, (sum, count))| AggRow {
                key,
                value: match self.reduction {
                    Reduction::Sum => sum,
                    Reduction::Mean => sum / count as f64,
                    Reduction::Count => count as f64,
                },
            })
            .collect();

        // sort_by is stable: equal measures keep ascending key order
        match self.order {
            Order::Key => {}
            Order::Ascending => out.sort_by(|a, b| a.value.total_cmp(&b.value)),
            Order::Descending => out.sort_by(|a, b| b.value.total_cmp(&a.value)),
        }
        if let Some(k) = self.top {
            out.truncate(k);
        }

        if self.remap_states {
            for (i, g) in self.group_by.iter().enumerate() {
                if *g != GroupKey::Location {
                    continue;
                }
                for row in &mut out {
                    let code = match &row.key[i] {
                        KeyValue::Text(name) => states.code(name),
                        _ => continue,
                    };
                    row.key[i] = KeyValue::Text(code);
                }
            }
        }

        Aggregate { rows: out }
    }
}
