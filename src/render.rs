//! Presentation of matrix rows: the point where per-customer quantities are
//! flattened into one column per item code.

use std::str::FromStr;

use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use crate::error::{MatrixError, Result};
use crate::matrix::{item_columns, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(MatrixError::InvalidFormat(s.to_string())),
        }
    }
}

pub fn render(rows: &[Row], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(rows)),
        OutputFormat::Json => render_json(rows),
        OutputFormat::Csv => Ok(render_csv(rows)),
    }
}

/// Quantities print without decimals when whole
pub fn format_qty(qty: f64) -> String {
    if qty.fract() == 0.0 && qty.abs() < 1e15 {
        format!("{}", qty as i64)
    } else {
        format!("{qty:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Rounded table with a per-customer TOTAL column and a TOTAL footer row
pub fn render_table(rows: &[Row]) -> String {
    let columns = item_columns(rows);

    let mut builder = Builder::default();
    let mut header = vec!["CUSTOMER".to_string()];
    header.extend(columns.iter().cloned());
    header.push("TOTAL".to_string());
    builder.push_record(header);

    let mut column_totals = vec![0.0; columns.len()];
    for row in rows {
        let mut record = vec![row.customer.clone()];
        for (i, code) in columns.iter().enumerate() {
            match row.quantity(code) {
                Some(qty) => {
                    column_totals[i] += qty;
                    record.push(format_qty(qty));
                }
                None => record.push(String::new()),
            }
        }
        record.push(format_qty(row.total()));
        builder.push_record(record);
    }

    let mut footer = vec!["TOTAL".to_string()];
    footer.extend(column_totals.iter().map(|t| format_qty(*t)));
    footer.push(format_qty(column_totals.iter().sum()));
    builder.push_record(footer);

    builder.build().with(Style::rounded()).to_string()
}

/// Array of flat records, `{"customer": .., "<item>": qty}`
pub fn render_json(rows: &[Row]) -> Result<String> {
    let records: Vec<Value> = rows.iter().map(|r| Value::Object(r.to_record())).collect();
    serde_json::to_string_pretty(&records).map_err(|e| {
        MatrixError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Comma separated with a header line; absent quantities are empty fields
pub fn render_csv(rows: &[Row]) -> String {
    let columns = item_columns(rows);
    let mut out = String::new();

    csv_field(&mut out, "customer");
    for code in &columns {
        out.push(',');
        csv_field(&mut out, code);
    }
    out.push('\n');

    for row in rows {
        csv_field(&mut out, &row.customer);
        for code in &columns {
            out.push(',');
            if let Some(qty) = row.quantity(code) {
                out.push_str(&format_qty(qty));
            }
        }
        out.push('\n');
    }
    out
}

fn csv_field(out: &mut String, value: &str) {
    if value.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}
