use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{flatten_scalars, format_scalar};

/// Write output as CSV to stdout.
///
/// A report with an annual projection is written as one row per year (the
/// chart series); a sensitivity result as its matrix; anything else as
/// two-column field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

pub(crate) fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let Value::Object(map) = value else {
        let _ = wtr.write_record([format_scalar(value)]);
        return;
    };

    let target = match map.get("result") {
        Some(Value::Object(result)) => result,
        _ => map,
    };

    if let Some(Value::Array(rows)) = target.get("annual_projection") {
        write_rows(wtr, rows);
    } else if let Some(Value::Array(matrix)) = target.get("matrix") {
        write_matrix(wtr, target, matrix);
    } else {
        write_fields(wtr, target);
    }
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten_scalars(map) {
        let _ = wtr.write_record([key, format_scalar(&val)]);
    }
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

/// Long format: one line per cell, easier to pivot than a wide grid.
fn write_matrix<W: Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>, matrix: &[Value]) {
    let v1 = result
        .get("variable_1_values")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let v2 = result
        .get("variable_2_values")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let name = |key: &str| result.get(key).map(format_scalar).unwrap_or_default();

    let _ = wtr.write_record([
        name("variable_1_name"),
        name("variable_2_name"),
        name("output_metric"),
    ]);
    for (a, row) in v1.iter().zip(matrix) {
        let Some(cells) = row.as_array() else { continue };
        for (b, cell) in v2.iter().zip(cells) {
            let _ = wtr.write_record([format_scalar(a), format_scalar(b), format_scalar(cell)]);
        }
    }
}
