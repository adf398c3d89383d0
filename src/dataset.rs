use std::path::Path;

use crate::error::{Result, ShopError};
use crate::models::{Category, Gender, Transaction};

/// The purchase table, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Transaction>,
}

impl Dataset {
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    /// Read the shopping-trends CSV. Any failure to open or parse the file
    /// is reported as `DatasetUnavailable` since nothing can run without it.
    pub fn load(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| ShopError::DatasetUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| unavailable(e.to_string()))?;

        let mut rows = Vec::new();
        for (i, result) in rdr.deserialize::<Transaction>().enumerate() {
            // +2: one for the header row, one for 1-based line numbers
            let row = result.map_err(|e| unavailable(format!("line {}: {e}", i + 2)))?;
            rows.push(row);
        }
        log::info!("loaded {} transactions from {}", rows.len(), path.display());
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_amount(&self) -> f64 {
        self.rows.iter().map(|r| r.amount).sum()
    }

    /// Distinct state names in first-appearance order.
    pub fn distinct_locations(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for r in &self.rows {
            if !seen.iter().any(|l| l == &r.location) {
                seen.push(r.location.clone());
            }
        }
        seen
    }

    pub fn distinct_categories(&self) -> Vec<Category> {
        first_seen(self.rows.iter().map(|r| r.category))
    }

    pub fn distinct_genders(&self) -> Vec<Gender> {
        first_seen(self.rows.iter().map(|r| r.gender))
    }
}

fn first_seen<T: PartialEq>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Category, Gender, PaymentMethod, Size, Transaction};

    pub fn txn(gender: Gender, location: &str, amount: f64) -> Transaction {
        Transaction {
            age: 35,
            gender,
            location: location.to_string(),
            category: Category::Clothing,
            item: "Blouse".to_string(),
            amount,
            payment_method: PaymentMethod::Cash,
            discount_applied: false,
            size: Size::M,
        }
    }

    pub const HEADER: &str = "Customer ID,Age,Gender,Item Purchased,Category,Purchase Amount (USD),Location,Size,Color,Season,Discount Applied,Preferred Payment Method";

    pub const SAMPLE_CSV: &str = "\
Customer ID,Age,Gender,Item Purchased,Category,Purchase Amount (USD),Location,Size,Color,Season,Discount Applied,Preferred Payment Method
1,55,Male,Blouse,Clothing,53,Kentucky,L,Gray,Winter,Yes,Venmo
2,19,Male,Sweater,Clothing,64,Maine,L,Maroon,Winter,Yes,Cash
3,50,Male,Jeans,Clothing,73,Massachusetts,S,Maroon,Spring,Yes,Credit Card
4,21,Female,Sandals,Footwear,90,Rhode Island,M,Maroon,Spring,No,PayPal
5,45,Female,Blouse,Clothing,49,Oregon,M,Turquoise,Spring,No,PayPal
6,46,Male,Sneakers,Footwear,20,Wyoming,M,White,Summer,Yes,Venmo
7,63,Female,Shirt,Clothing,85,Montana,M,Gray,Fall,No,Debit Card
8,27,Male,Shorts,Clothing,34,Louisiana,L,Charcoal,Winter,No,Bank Transfer
9,26,Female,Coat,Outerwear,97,West Virginia,L,Silver,Summer,No,Cash
10,71,Male,Handbag,Accessories,31,Missouri,M,Pink,Spring,No,Credit Card
11,20,Female,Shoes,Footwear,34,Kentucky,XL,Olive,Fall,No,Venmo
12,35,Male,Jewelry,Accessories,68,Maine,S,Violet,Summer,Yes,Cash
";
}
