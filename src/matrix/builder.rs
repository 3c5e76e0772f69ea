use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{Filter, Row};
use crate::config::ReportSettings;
use crate::error::{MatrixError, Result};
use crate::frappe::{Condition, ListQuery, ListSource, Operator};

/// Customer assigned to lines whose invoice could not be looked up.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

/// Column for lines that carry no item code.
pub const NO_ITEM_CODE: &str = "(no item code)";

const SUBMITTED: i64 = 1;

#[derive(Debug, Deserialize)]
struct InvoiceName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct InvoiceCustomer {
    name: String,
    #[serde(default)]
    customer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InvoiceLine {
    parent: String,
    #[serde(default)]
    item_code: Option<String>,
    #[serde(default)]
    qty: Option<f64>,
}

/// Builds the customer x item quantity matrix from a [`ListSource`].
pub struct MatrixBuilder<'a, S: ListSource> {
    source: &'a S,
    settings: &'a ReportSettings,
}

impl<'a, S: ListSource> MatrixBuilder<'a, S> {
    pub fn new(source: &'a S, settings: &'a ReportSettings) -> Self {
        Self { source, settings }
    }

    /// Run the report. Retrieval failures are logged and produce an empty matrix.
    pub fn build(&self, filter: &Filter) -> Vec<Row> {
        match self.try_build(filter) {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("customer item matrix: {e}");
                Vec::new()
            }
        }
    }

    /// Same pipeline as [`build`](Self::build), surfacing the failing stage.
    pub fn try_build(&self, filter: &Filter) -> Result<Vec<Row>> {
        let invoices = self.fetch_invoices(filter)?;
        if invoices.is_empty() {
            log::debug!("no uncollected invoices match, skipping line fetch");
            return Ok(Vec::new());
        }

        let lines = self.fetch_lines(&invoices)?;
        let customers = self.resolve_customers(&lines);
        Ok(aggregate(&lines, &customers))
    }

    fn fetch_invoices(&self, filter: &Filter) -> Result<Vec<String>> {
        let s = self.settings;
        let mut query = ListQuery::new(&s.invoice_doctype, &["name"], s.page_length)
            .filter(Condition::equals("docstatus", SUBMITTED))
            .filter(Condition::equals(
                s.collect_status_field.as_str(),
                s.collect_status.as_str(),
            ));

        if let Some(from) = filter.from_date {
            query = query.filter(Condition::new(
                "posting_date",
                Operator::Gte,
                from.format("%Y-%m-%d").to_string(),
            ));
        }
        if let Some(to) = filter.to_date {
            query = query.filter(Condition::new(
                "posting_date",
                Operator::Lte,
                to.format("%Y-%m-%d").to_string(),
            ));
        }
        if let Some(salesperson) = filter.salesperson() {
            query = query.filter(Condition::equals(s.salesperson_field.as_str(), salesperson));
        }

        let rows: Vec<InvoiceName> = self.list(&query)?;
        log::debug!("{} uncollected invoice(s)", rows.len());
        warn_if_capped(&query, rows.len());
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    fn fetch_lines(&self, invoices: &[String]) -> Result<Vec<InvoiceLine>> {
        let s = self.settings;
        let query = ListQuery::new(
            &s.line_doctype,
            &["parent", "item_code", "qty"],
            s.page_length,
        )
        .child_of(s.invoice_doctype.as_str())
        .filter(Condition::is_in("parent", invoices))
        .filter(Condition::equals("docstatus", SUBMITTED));

        let lines: Vec<InvoiceLine> = self.list(&query)?;
        log::debug!("{} invoice line(s)", lines.len());
        warn_if_capped(&query, lines.len());
        Ok(lines)
    }

    /// One lookup for all distinct parents. Failure leaves the map empty so
    /// every line falls back to [`UNKNOWN_CUSTOMER`].
    fn resolve_customers(&self, lines: &[InvoiceLine]) -> HashMap<String, String> {
        let mut parents: Vec<String> = Vec::new();
        for line in lines {
            if !parents.contains(&line.parent) {
                parents.push(line.parent.clone());
            }
        }
        if parents.is_empty() {
            return HashMap::new();
        }

        let query = ListQuery::new(
            &self.settings.invoice_doctype,
            &["name", "customer"],
            parents.len(),
        )
        .filter(Condition::is_in("name", &parents));

        let found: Vec<InvoiceCustomer> = match self.list(&query) {
            Ok(found) => found,
            Err(e) => {
                log::error!("customer lookup failed, using '{UNKNOWN_CUSTOMER}': {e}");
                return HashMap::new();
            }
        };

        let customers: HashMap<String, String> = found
            .into_iter()
            .filter_map(|inv| inv.customer.map(|c| (inv.name, c)))
            .collect();

        let missing = parents.iter().filter(|p| !customers.contains_key(*p)).count();
        if missing > 0 {
            log::warn!(
                "{missing} invoice(s) without a customer, grouped under '{}'",
                UNKNOWN_CUSTOMER
            );
        }
        customers
    }

    fn list<T: DeserializeOwned>(&self, query: &ListQuery) -> Result<Vec<T>> {
        let rows = self.source.get_list(query)?;
        rows.into_iter()
            .map(|row| decode_row(&query.doctype, row))
            .collect()
    }
}

// No pagination: a full page may be hiding further rows.
fn warn_if_capped(query: &ListQuery, returned: usize) {
    if query.limit > 0 && returned >= query.limit {
        log::warn!(
            "{} returned {returned} rows, the page_length cap; results may be truncated",
            query.doctype
        );
    }
}

fn decode_row<T: DeserializeOwned>(doctype: &str, row: Value) -> Result<T> {
    serde_json::from_value(row).map_err(|e| MatrixError::Decode {
        doctype: doctype.to_string(),
        reason: e.to_string(),
    })
}

/// Sum quantities per customer and item, customers in first-seen order.
fn aggregate(lines: &[InvoiceLine], customers: &HashMap<String, String>) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut no_code = 0usize;

    for line in lines {
        let customer = customers
            .get(&line.parent)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CUSTOMER);

        let slot = *index.entry(customer).or_insert_with(|| {
            rows.push(Row::new(customer));
            rows.len() - 1
        });
        let item_code = match line.item_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => {
                no_code += 1;
                NO_ITEM_CODE
            }
        };
        rows[slot].add(item_code, line.qty.unwrap_or(0.0));
    }

    if no_code > 0 {
        log::warn!("{no_code} line(s) without an item code, grouped under '{NO_ITEM_CODE}'");
    }
    rows
}
