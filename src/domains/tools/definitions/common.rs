//! Helpers shared across tool definitions.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domains::tools::error::ToolError;
use crate::domains::tools::schema::{FieldKind, FieldSpec};

/// Decode validated arguments into a typed params struct.
///
/// Validation has already checked the shape, so a decode failure here is a
/// schema/params mismatch in the tool definition itself.
pub(super) fn parse_params<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::internal(format!("parameter decode failed after validation: {e}")))
}

/// A custom field value pair as accepted by task and job creation.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct CustomField {
    pub code: String,
    pub value: Value,
}

/// Schema fragment for an array of `{code, value}` custom fields.
pub(super) fn custom_fields_kind() -> FieldKind {
    FieldKind::Array(Box::new(FieldKind::Object(vec![
        FieldSpec::new("code", FieldKind::String)
            .required()
            .describe("Code of the custom field"),
        FieldSpec::new("value", FieldKind::Any)
            .required()
            .describe("Value for the custom field. Type depends on the field type."),
    ])))
}

/// Insert an optional string field into a request body.
pub(super) fn insert_opt(body: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::String(value.clone()));
    }
}

/// Insert an optional numeric field into a request body.
pub(super) fn insert_opt_number(
    body: &mut Map<String, Value>,
    key: &str,
    value: &Option<serde_json::Number>,
) {
    if let Some(value) = value {
        body.insert(key.to_string(), Value::Number(value.clone()));
    }
}

/// Project a `form` array into `{name, id, type, value}` summaries.
pub(super) fn summarize_form(entry: &Value) -> Value {
    let fields = entry
        .get("form")
        .and_then(Value::as_array)
        .map(|form| {
            form.iter()
                .map(|f| {
                    serde_json::json!({
                        "name": f.get("name").cloned().unwrap_or(Value::Null),
                        "id": f.get("id").cloned().unwrap_or(Value::Null),
                        "type": f.get("type").cloned().unwrap_or(Value::Null),
                        "value": f.get("display").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Value::Array(fields)
}

/// Copy a set of keys from a backend record into a summary object.
pub(super) fn pick(entry: &Value, keys: &[&str]) -> Map<String, Value> {
    let mut summary = Map::new();
    for key in keys {
        summary.insert(
            key.to_string(),
            entry.get(*key).cloned().unwrap_or(Value::Null),
        );
    }
    summary
}
