//! Client-side table helpers for collection rows.
//!
//! Rows are kept as plain JSON objects because the collection schema is
//! owned by the backend.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::utils::{cmp_ignore_case, contains_ignore_case, format_date, truncate_string};

/// One row of a remote collection.
pub type Record = Map<String, Value>;

/// Keep rows where any scalar field contains `query`, ignoring case.
/// An empty query keeps everything.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let query = query.trim();
    if query.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            record
                .values()
                .filter_map(scalar_text)
                .any(|text| contains_ignore_case(&text, query))
        })
        .collect()
}

/// Stable sort by one field. Missing and null values go last in both directions.
pub fn sort_records(records: &mut [&Record], field: &str, ascending: bool) {
    records.sort_by(|a, b| {
        match (present(a.get(field)), present(b.get(field))) {
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Display text for one cell, at most `max_len` characters.
pub fn record_cell(record: &Record, field: &str, max_len: usize) -> String {
    let text = match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if field.starts_with("date_") => format_date(s),
        Some(value) => scalar_text(value).unwrap_or_else(|| value.to_string()),
    };
    truncate_string(&text.replace(['\n', '\r'], " "), max_len)
}

/// Preferred columns that occur in the data, in order. Falls back to the
/// keys of the first row when none of them do.
pub fn columns_for(records: &[&Record], preferred: &[&str]) -> Vec<String> {
    let columns: Vec<String> = preferred
        .iter()
        .filter(|col| records.iter().any(|r| r.contains_key(**col)))
        .map(|col| col.to_string())
        .collect();

    if !columns.is_empty() {
        return columns;
    }
    records
        .first()
        .map(|r| r.keys().cloned().collect())
        .unwrap_or_default()
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => {
            let x = scalar_text(a).unwrap_or_else(|| a.to_string());
            let y = scalar_text(b).unwrap_or_else(|| b.to_string());
            cmp_ignore_case(&x, &y)
        }
    }
}
