use serde_json::Value;

/// Fields that answer each command, in order of priority.
const PRIORITY_KEYS: [&str; 3] = ["overallRisk", "severity", "highRiskJurisdiction"];

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in order of priority, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overall_risk_from_envelope() {
        let value = json!({
            "origin": "local",
            "result": {"compliant": false, "overallRisk": "High"}
        });
        assert_eq!(minimal_answer(&value), "High");
    }

    #[test]
    fn test_severity_lookup() {
        let value = json!({"likelihood": "low", "impact": "high", "severity": "medium"});
        assert_eq!(minimal_answer(&value), "medium");
    }

    #[test]
    fn test_jurisdiction_flag() {
        let value = json!({"countries": "China", "highRiskJurisdiction": true});
        assert_eq!(minimal_answer(&value), "true");
    }
}
