use serde_json::Value;
use std::io::{self, Read};

/// Attempt to read a profile from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
///
/// JSON is tried first; anything else is parsed as YAML.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => {
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|e| format!("stdin is neither JSON ({}) nor YAML ({})", json_err, e))?;
            Ok(Some(value))
        }
    }
}
