use crate::{TallyError, TallyResult, Value};
use serde_json::{json, Value as JsonValue};

/// Render a batch of results as a JSON array.
///
/// Each entry carries the value type, its canonical display string and the
/// structured payload:
/// ```text
/// [{"type": "quantity", "display": "5 disk", "value": {"value": "5", "unit": "disk"}}]
/// ```
pub fn to_json(values: &[Value]) -> TallyResult<JsonValue> {
    values.iter().map(render).collect::<TallyResult<Vec<_>>>().map(JsonValue::Array)
}

/// [`to_json`], pretty-printed
pub fn to_json_string(values: &[Value]) -> TallyResult<String> {
    serde_json::to_string_pretty(&to_json(values)?)
        .map_err(|e| TallyError::Internal(format!("JSON rendering failed: {}", e)))
}

fn render(value: &Value) -> TallyResult<JsonValue> {
    let tagged = serde_json::to_value(value)
        .map_err(|e| TallyError::Internal(format!("JSON rendering failed: {}", e)))?;
    let payload = tagged.get("value").cloned().unwrap_or(JsonValue::Null);
    Ok(json!({
        "type": value.type_name(),
        "display": value.to_string(),
        "value": payload,
    }))
}
