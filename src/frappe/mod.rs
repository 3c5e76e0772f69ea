//! Access to a Frappe site's generic `frappe.client.get_list` call.

mod client;

pub use client::FrappeClient;

use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::Value;

use crate::error::Result;

/// Anything that can answer a filtered list query.
pub trait ListSource {
    fn get_list(&self, query: &ListQuery) -> Result<Vec<Value>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gte,
    Lte,
    In,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::In => "in",
        }
    }
}

/// One `[field, op, value]` filter clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn is_in(field: impl Into<String>, values: &[String]) -> Self {
        Self::new(field, Operator::In, values.to_vec())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.field)?;
        tuple.serialize_element(self.op.as_str())?;
        tuple.serialize_element(&self.value)?;
        tuple.end()
    }
}

/// Arguments of a single `get_list` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub doctype: String,
    pub fields: Vec<String>,
    pub filters: Vec<Condition>,
    pub limit: usize,
    /// Parent doctype, required by the server when listing a child table
    pub parent_doctype: Option<String>,
}

impl ListQuery {
    pub fn new(doctype: impl Into<String>, fields: &[&str], limit: usize) -> Self {
        Self {
            doctype: doctype.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            filters: Vec::new(),
            limit,
            parent_doctype: None,
        }
    }

    pub fn child_of(mut self, parent_doctype: impl Into<String>) -> Self {
        self.parent_doctype = Some(parent_doctype.into());
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filters.push(condition);
        self
    }

    /// Find the first clause on `field` with `op`
    pub fn condition(&self, field: &str, op: Operator) -> Option<&Condition> {
        self.filters
            .iter()
            .find(|c| c.field == field && c.op == op)
    }

    /// Request body for `frappe.client.get_list`
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::json!({
            "doctype": self.doctype,
            "fields": self.fields,
            "filters": self.filters,
            "limit_page_length": self.limit,
        });
        if let Some(parent) = &self.parent_doctype {
            body["parent"] = Value::from(parent.as_str());
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_uses_list_of_lists_filters() {
        let query = ListQuery::new("Sales Invoice", &["name"], 1000)
            .filter(Condition::equals("docstatus", 1))
            .filter(Condition::new("posting_date", Operator::Gte, "2024-01-01"))
            .filter(Condition::new("posting_date", Operator::Lte, "2024-01-31"));

        assert_eq!(
            query.to_body(),
            json!({
                "doctype": "Sales Invoice",
                "fields": ["name"],
                "filters": [
                    ["docstatus", "=", 1],
                    ["posting_date", ">=", "2024-01-01"],
                    ["posting_date", "<=", "2024-01-31"],
                ],
                "limit_page_length": 1000,
            })
        );
    }

    #[test]
    fn child_table_query_names_its_parent() {
        let query = ListQuery::new("Sales Invoice Item", &["parent", "item_code", "qty"], 1000)
            .child_of("Sales Invoice")
            .filter(Condition::equals("docstatus", 1));

        let body = query.to_body();
        assert_eq!(body["doctype"], "Sales Invoice Item");
        assert_eq!(body["parent"], "Sales Invoice");
    }

    #[test]
    fn top_level_query_has_no_parent() {
        let body = ListQuery::new("Sales Invoice", &["name"], 10).to_body();
        assert!(body.get("parent").is_none());
    }

    #[test]
    fn in_clause_carries_an_array() {
        let names = vec!["INV-1".to_string(), "INV-2".to_string()];
        let cond = Condition::is_in("parent", &names);
        assert_eq!(
            serde_json::to_value(&cond).unwrap(),
            json!(["parent", "in", ["INV-1", "INV-2"]])
        );
    }
}
