//! Input schema model for tool invocations.
//!
//! Every tool declares its parameters as a flat list of typed field
//! constraints. Validation runs strictly before the handler: required fields
//! must be present, present fields must have the declared shape, enum values
//! must be in the declared set. Unknown extra fields are tolerated so newer
//! clients can talk to older servers.
//!
//! The same model renders to a JSON-Schema object for `tools/list`.

use serde_json::{Map, Value, json};

use super::error::ToolError;

/// The shape a field's value must have.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// A string restricted to a fixed set of values.
    Enum(&'static [&'static str]),
    /// An array whose elements all have the given kind.
    Array(Box<FieldKind>),
    /// A nested object with its own field constraints.
    Object(Vec<FieldSpec>),
    /// Accept anything (used for custom field values whose type depends on
    /// the field definition in the backend).
    Any,
}

/// One named, typed, possibly-required field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    description: &'static str,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            description: "",
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A structural schema over named fields.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Validate an argument object against this schema.
    ///
    /// Returns the first violation as a [`ToolError::Validation`] carrying
    /// the offending field path and the violated constraint.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<(), ToolError> {
        validate_fields(&self.fields, args, None)
    }

    /// Render this schema as a JSON-Schema object.
    pub fn to_json(&self) -> Value {
        fields_to_json(&self.fields)
    }
}

fn validate_fields(
    fields: &[FieldSpec],
    args: &Map<String, Value>,
    parent: Option<&str>,
) -> Result<(), ToolError> {
    for spec in fields {
        let path = match parent {
            Some(parent) => format!("{parent}.{}", spec.name),
            None => spec.name.to_string(),
        };
        match args.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ToolError::validation(path, "required field is missing"));
                }
            }
            Some(value) => validate_kind(&path, &spec.kind, value)?,
        }
    }
    Ok(())
}

fn validate_kind(path: &str, kind: &FieldKind, value: &Value) -> Result<(), ToolError> {
    match kind {
        FieldKind::String => {
            if !value.is_string() {
                return Err(ToolError::validation(path, "expected a string"));
            }
        }
        FieldKind::Number => {
            if !value.is_number() {
                return Err(ToolError::validation(path, "expected a number"));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                return Err(ToolError::validation(path, "expected a boolean"));
            }
        }
        FieldKind::Enum(allowed) => {
            let matches = value.as_str().is_some_and(|v| allowed.contains(&v));
            if !matches {
                return Err(ToolError::validation(
                    path,
                    format!("expected one of: {}", allowed.join(", ")),
                ));
            }
        }
        FieldKind::Array(element) => {
            let Some(items) = value.as_array() else {
                return Err(ToolError::validation(path, "expected an array"));
            };
            for (index, item) in items.iter().enumerate() {
                validate_kind(&format!("{path}[{index}]"), element, item)?;
            }
        }
        FieldKind::Object(fields) => {
            let Some(map) = value.as_object() else {
                return Err(ToolError::validation(path, "expected an object"));
            };
            validate_fields(fields, map, Some(path))?;
        }
        FieldKind::Any => {}
    }
    Ok(())
}

fn fields_to_json(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for spec in fields {
        let mut property = kind_to_json(&spec.kind);
        if !spec.description.is_empty() {
            if let Some(object) = property.as_object_mut() {
                object.insert(
                    "description".to_string(),
                    Value::String(spec.description.to_string()),
                );
            }
        }
        properties.insert(spec.name.to_string(), property);
        if spec.required {
            required.push(Value::String(spec.name.to_string()));
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn kind_to_json(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({"type": "string"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Boolean => json!({"type": "boolean"}),
        FieldKind::Enum(allowed) => json!({"type": "string", "enum": allowed}),
        FieldKind::Array(element) => json!({"type": "array", "items": kind_to_json(element)}),
        FieldKind::Object(fields) => fields_to_json(fields),
        FieldKind::Any => json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn sample_schema() -> InputSchema {
        InputSchema::new()
            .field(FieldSpec::new("name", FieldKind::String).required())
            .field(FieldSpec::new("page", FieldKind::Number))
            .field(FieldSpec::new(
                "status",
                FieldKind::Enum(&["active", "done"]),
            ))
            .field(FieldSpec::new(
                "tags",
                FieldKind::Array(Box::new(FieldKind::String)),
            ))
            .field(FieldSpec::new(
                "custom_fields",
                FieldKind::Array(Box::new(FieldKind::Object(vec![
                    FieldSpec::new("code", FieldKind::String).required(),
                    FieldSpec::new("value", FieldKind::Any).required(),
                ]))),
            ))
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let err = sample_schema().validate(&args(json!({"page": 1}))).unwrap_err();
        match err {
            ToolError::Validation { path, constraint } => {
                assert_eq!(path, "name");
                assert_eq!(constraint, "required field is missing");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_null_counts_as_absent() {
        let schema = sample_schema();
        assert!(schema.validate(&args(json!({"name": "x", "page": null}))).is_ok());
        assert!(schema.validate(&args(json!({"name": null}))).is_err());
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let err = sample_schema()
            .validate(&args(json!({"name": "x", "page": "two"})))
            .unwrap_err();
        match err {
            ToolError::Validation { path, constraint } => {
                assert_eq!(path, "page");
                assert_eq!(constraint, "expected a number");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_constrains_values() {
        let schema = sample_schema();
        assert!(schema.validate(&args(json!({"name": "x", "status": "done"}))).is_ok());

        let err = schema
            .validate(&args(json!({"name": "x", "status": "archived"})))
            .unwrap_err();
        match err {
            ToolError::Validation { path, constraint } => {
                assert_eq!(path, "status");
                assert!(constraint.contains("active"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_array_elements_validated_with_index_path() {
        let err = sample_schema()
            .validate(&args(json!({"name": "x", "tags": ["ok", 3]})))
            .unwrap_err();
        match err {
            ToolError::Validation { path, .. } => assert_eq!(path, "tags[1]"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_object_fields_validated() {
        let err = sample_schema()
            .validate(&args(json!({
                "name": "x",
                "custom_fields": [{"value": "prod"}]
            })))
            .unwrap_err();
        match err {
            ToolError::Validation { path, constraint } => {
                assert_eq!(path, "custom_fields[0].code");
                assert_eq!(constraint, "required field is missing");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_extra_fields_tolerated() {
        let result = sample_schema().validate(&args(json!({
            "name": "x",
            "not_in_schema": {"anything": true}
        })));
        assert!(result.is_ok());
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = sample_schema().to_json();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["name"]["type"], "string");
        assert_eq!(rendered["properties"]["status"]["enum"], json!(["active", "done"]));
        assert_eq!(rendered["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(rendered["required"], json!(["name"]));
        assert_eq!(
            rendered["properties"]["custom_fields"]["items"]["required"],
            json!(["code", "value"])
        );
    }
}
