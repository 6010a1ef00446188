use serde_json::Value;
use std::io::{self, Write};

use super::{array_headers, flatten_result, format_scalar};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(value, stdout.lock()) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Two-column `field,value` rows for the result, then one section per
/// per-period breakdown (a title row, a header row, data rows).
pub fn write_csv<W: Write>(value: &Value, writer: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let flat = flatten_result(map);
            wtr.write_record(["field", "value"])?;
            for (key, val) in &flat.fields {
                wtr.write_record([key.as_str(), val.as_str()])?;
            }
            for (name, rows) in flat.breakdowns {
                wtr.write_record([name.as_str()])?;
                write_array(&mut wtr, rows)?;
            }
        }
        Value::Array(arr) => write_array(&mut wtr, arr)?,
        other => wtr.write_record([format_scalar(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_array<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let headers = array_headers(arr);
    if headers.is_empty() {
        for item in arr {
            wtr.write_record([format_scalar(item)])?;
        }
        return Ok(());
    }

    wtr.write_record(&headers)?;
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
