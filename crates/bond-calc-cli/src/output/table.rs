use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{array_headers, flatten_result, format_scalar};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    println!("{}", render_table(value));
}

pub fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => render_envelope(result, map),
            _ => render_fields(map),
        },
        Value::Array(arr) => render_array(arr),
        other => other.to_string(),
    }
}

fn render_envelope(result: &Map<String, Value>, envelope: &Map<String, Value>) -> String {
    let flat = flatten_result(result);

    let mut builder = Builder::default();
    builder.push_record(["Field".to_string(), "Value".to_string()]);
    for (key, val) in flat.fields {
        builder.push_record([key, val]);
    }
    let mut out = Table::from(builder).to_string();

    for (name, rows) in flat.breakdowns {
        out.push_str(&format!("\n\n{}:\n", name));
        out.push_str(&render_array(rows));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("\n  - {}", w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\n\nMethodology: {}", meth));
    }

    out
}

fn render_fields(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field".to_string(), "Value".to_string()]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_scalar(val)]);
    }
    Table::from(builder).to_string()
}

fn render_array(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)".to_string();
    }

    let headers = array_headers(arr);
    if headers.is_empty() {
        let items: Vec<String> = arr.iter().map(format_scalar).collect();
        return items.join("\n");
    }

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    Table::from(builder).to_string()
}
