use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{as_rows, format_cell};

/// Format output as tables using the tabled crate.
///
/// Scalar fields share one Field/Value table; every list of objects (risks,
/// recommendations, decision steps) gets a table of its own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    if let Some(Value::String(origin)) = envelope.get("origin") {
        println!("Origin: {}\n", origin);
    }

    match result {
        Value::Object(map) => print_object(map),
        other => println!("{}", other),
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
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections = Vec::new();
    for (key, val) in map {
        match as_rows(val) {
            Some(rows) => sections.push((key, rows)),
            None => builder.push_record([key.as_str(), &format_cell(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, rows) in sections {
        println!("\n{}:", key);
        print_rows(rows);
    }
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}
