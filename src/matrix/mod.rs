mod builder;

pub use builder::{MatrixBuilder, NO_ITEM_CODE, UNKNOWN_CUSTOMER};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

const CUSTOMER_KEY: &str = "customer";

/// Report filters. `None` means the clause is left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub salesperson: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl Filter {
    /// Salesperson with blank values treated as absent
    pub fn salesperson(&self) -> Option<&str> {
        self.salesperson
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Names of filters the report form marks as mandatory but which are unset
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.salesperson().is_none() {
            missing.push("salesperson");
        }
        if self.from_date.is_none() {
            missing.push("from");
        }
        if self.to_date.is_none() {
            missing.push("to");
        }
        missing
    }
}

/// One customer's line in the matrix.
///
/// Quantities keep the order in which each item was first seen for the customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub customer: String,
    pub quantities: Vec<(String, f64)>,
}

impl Row {
    pub fn new(customer: impl Into<String>) -> Self {
        Self {
            customer: customer.into(),
            quantities: Vec::new(),
        }
    }

    pub fn add(&mut self, item_code: &str, qty: f64) {
        match self.quantities.iter_mut().find(|(code, _)| code == item_code) {
            Some((_, total)) => *total += qty,
            None => self.quantities.push((item_code.to_string(), qty)),
        }
    }

    pub fn quantity(&self, item_code: &str) -> Option<f64> {
        self.quantities
            .iter()
            .find(|(code, _)| code == item_code)
            .map(|(_, total)| *total)
    }

    pub fn total(&self) -> f64 {
        self.quantities.iter().map(|(_, qty)| qty).sum()
    }

    /// Flat `{"customer": .., "<item>": qty, ..}` record for grid-style consumers.
    ///
    /// An item literally coded `customer` is keyed `item:customer` so it cannot
    /// replace the customer name.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(CUSTOMER_KEY.to_string(), Value::from(self.customer.clone()));
        for (code, qty) in &self.quantities {
            let key = if code == CUSTOMER_KEY {
                format!("item:{code}")
            } else {
                code.clone()
            };
            record.insert(key, Value::from(*qty));
        }
        record
    }
}

/// Union of item codes across rows, in first-seen order
pub fn item_columns(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (code, _) in &row.quantities {
            if !columns.iter().any(|c| c == code) {
                columns.push(code.clone());
            }
        }
    }
    columns
}
