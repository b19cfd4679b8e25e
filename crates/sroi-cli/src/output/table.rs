use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_scalars, format_scalar};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_tables(result, map),
            _ => println!("{}", field_table(map)),
        },
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    if let Some(Value::Object(display)) = envelope.get("display") {
        println!("{}", field_table(display));
        println!();
    }

    if let Some(grid) = sensitivity_grid(result) {
        println!("{}", grid);
    } else {
        println!("{}", field_table(result));
    }

    if let Some(Value::Array(rows)) = result.get("annual_projection") {
        println!("\nAnnual projection:");
        println!("{}", rows_table(rows));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn field_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_scalars(map) {
        builder.push_record([key, format_scalar(&val)]);
    }
    builder.build()
}

fn rows_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();
    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        builder.push_record(headers.clone());
        for row in rows {
            if let Value::Object(map) = row {
                builder.push_record(
                    headers
                        .iter()
                        .map(|h| map.get(h).map(format_scalar).unwrap_or_default()),
                );
            }
        }
    }
    builder.build()
}

/// Render a sensitivity matrix with variable_1 down the side and
/// variable_2 across the top.
fn sensitivity_grid(result: &Map<String, Value>) -> Option<Table> {
    let matrix = result.get("matrix")?.as_array()?;
    let v1 = result.get("variable_1_values")?.as_array()?;
    let v2 = result.get("variable_2_values")?.as_array()?;
    let corner = format!(
        "{} \\ {}",
        result.get("variable_1_name").map(format_scalar).unwrap_or_default(),
        result.get("variable_2_name").map(format_scalar).unwrap_or_default()
    );

    let mut builder = Builder::default();
    builder.push_record(std::iter::once(corner).chain(v2.iter().map(format_scalar)));
    for (label, row) in v1.iter().zip(matrix) {
        let cells = row.as_array()?;
        builder.push_record(
            std::iter::once(format_scalar(label)).chain(cells.iter().map(format_scalar)),
        );
    }
    Some(builder.build())
}
