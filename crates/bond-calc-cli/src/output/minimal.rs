use serde_json::Value;

use super::format_scalar;

/// Headline field of each calculation, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "estimated_price",
    "total_percent_change",
    "convexity",
    "modified_duration",
    "macaulay_duration",
    "present_value",
    "price",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

pub fn render_minimal(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_scalar(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}
