use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Clothing,
    Footwear,
    Outerwear,
    Accessories,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Clothing,
        Category::Footwear,
        Category::Outerwear,
        Category::Accessories,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clothing => "Clothing",
            Self::Footwear => "Footwear",
            Self::Outerwear => "Outerwear",
            Self::Accessories => "Accessories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    Venmo,
    Cash,
    PayPal,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::Venmo => "Venmo",
            Self::Cash => "Cash",
            Self::PayPal => "PayPal",
            Self::DebitCard => "Debit Card",
            Self::BankTransfer => "Bank Transfer",
        }
    }
}

/// Garment size. Declaration order is the display order (S < M < L < XL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
}

impl Size {
    pub const ALL: [Size; 4] = [Size::S, Size::M, Size::L, Size::XL];

    pub fn label(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
        }
    }
}

/// One purchase row. Column names follow the shopping-trends CSV header;
/// columns not listed here are ignored on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Category")]
    pub category: Category,
    #[serde(rename = "Item Purchased")]
    pub item: String,
    #[serde(rename = "Purchase Amount (USD)")]
    pub amount: f64,
    #[serde(rename = "Preferred Payment Method")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "Discount Applied", deserialize_with = "yes_no")]
    pub discount_applied: bool,
    #[serde(rename = "Size")]
    pub size: Size,
}

impl Transaction {
    pub fn discount_label(&self) -> &'static str {
        if self.discount_applied {
            "Yes"
        } else {
            "No"
        }
    }
}

fn yes_no<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "Yes" => Ok(true),
        "No" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected Yes or No, got {other:?}"
        ))),
    }
}

/// A single component of a group key. Variant order never matters in
/// practice because one grouping column always yields one variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    Int(u32),
    Size(Size),
    Text(String),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Size(s) => f.write_str(s.label()),
            Self::Text(t) => f.write_str(t),
        }
    }
}

impl Serialize for KeyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_u32(*n),
            other => serializer.collect_str(other),
        }
    }
}
