use serde_json::{Map, Value};
use std::io;

use super::{as_rows, format_cell};

/// Field holding the findings of an assessment; written as rows.
const ROWS_KEY: &str = "risks";

/// Write output as CSV to stdout.
///
/// An assessment becomes one row per finding. Any other object is written
/// as two columns, field and value.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_object(&mut wtr, result),
            _ => write_object(&mut wtr, map),
        },
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_object<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    if let Some(rows) = map.get(ROWS_KEY).and_then(as_rows) {
        write_rows(wtr, rows);
        return;
    }

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Map<String, Value>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_object(&mut wtr, value);
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_findings_become_rows() {
        let value = json!({
            "overallRisk": "High",
            "risks": [
                {"id": "risk-1", "severity": "High", "mitigation": ["a", "b"]},
                {"id": "risk-6", "severity": "High", "mitigation": []}
            ]
        });
        let out = render(value.as_object().unwrap());
        assert_eq!(out, "id,mitigation,severity\nrisk-1,\"a, b\",High\nrisk-6,,High\n");
    }

    #[test]
    fn test_plain_object_is_two_columns() {
        let value = json!({"severity": "medium"});
        let out = render(value.as_object().unwrap());
        assert_eq!(out, "field,value\nseverity,medium\n");
    }
}
