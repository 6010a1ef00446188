pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;
pub mod yaml;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Yaml => yaml::print_yaml(value),
    }
}

/// A result object split into scalar rows and per-period breakdowns.
///
/// Nested objects are flattened to dotted keys (`duration_only.estimated_price`);
/// arrays of objects (`discounted_cashflows`) are kept aside so they can be
/// rendered as their own table.
pub(crate) struct FlatResult<'a> {
    pub fields: Vec<(String, String)>,
    pub breakdowns: Vec<(String, &'a [Value])>,
}

pub(crate) fn flatten_result(map: &Map<String, Value>) -> FlatResult<'_> {
    let mut flat = FlatResult {
        fields: Vec::new(),
        breakdowns: Vec::new(),
    };
    flatten_into("", map, &mut flat);
    flat
}

fn flatten_into<'a>(prefix: &str, map: &'a Map<String, Value>, flat: &mut FlatResult<'a>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, flat),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                flat.breakdowns.push((name, items.as_slice()));
            }
            _ => flat.fields.push((name, format_scalar(val))),
        }
    }
}

/// Column names of an array of objects, taken from its first element.
pub(crate) fn array_headers(items: &[Value]) -> Vec<String> {
    match items.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_scalar).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
