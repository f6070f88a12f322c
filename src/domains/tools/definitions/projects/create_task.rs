//! Tool for creating a single task in a project board.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{
    CustomField, custom_fields_kind, insert_opt, parse_params,
};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

#[derive(Debug, Deserialize)]
struct CreateTaskParams {
    name: String,
    board_id: String,
    creator_username: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    custom_fields: Option<Vec<CustomField>>,
}

pub struct CreateTaskTool;

impl CreateTaskTool {
    pub const NAME: &'static str = "create_task";

    const DESCRIPTION: &'static str = "Creates a single task in a Project board. Use board_id. \
         Required: name + board_id. Supports custom fields as array of {code, value}.";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<CreateTaskParams>(args)?;
                Self::run(params, &clients.project).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(FieldSpec::new("name", FieldKind::String).required().describe(
                "REQUIRED: Name of the task. Put a relevant emoji followed by a blank space before the name.",
            ))
            .field(
                FieldSpec::new("board_id", FieldKind::String)
                    .required()
                    .describe("REQUIRED: ID of the board to create the task in."),
            )
            .field(FieldSpec::new("creator_username", FieldKind::String).required().describe(
                "REQUIRED: Username of the creator. This will be used to indicate the task creator.",
            ))
            .field(
                FieldSpec::new("content", FieldKind::String)
                    .describe("Optional html formatted description for the task"),
            )
            .field(
                FieldSpec::new("deadline", FieldKind::String)
                    .describe("Optional deadline. Supports Unix timestamps (seconds)"),
            )
            .field(
                FieldSpec::new("start_date", FieldKind::String)
                    .describe("Optional start date. Supports Unix timestamps (seconds)"),
            )
            .field(FieldSpec::new("user_id", FieldKind::String).describe(
                "Optional user ID of the assignee. This will be used to assign the task to the user.",
            ))
            .field(FieldSpec::new("parent_id", FieldKind::String).describe(
                "Optional ID of the parent task. When specified, this task will be created as a subtask of the specified parent task.",
            ))
            .field(
                FieldSpec::new("tags", FieldKind::Array(Box::new(FieldKind::String))).describe(
                    "Optional array of tag names to assign to the task. The tags must already exist in the space.",
                ),
            )
            .field(FieldSpec::new("custom_fields", custom_fields_kind()).describe(
                "Optional array of custom field values to set on the task. Each object must have a 'code' and 'value' property.",
            ))
    }

    async fn run(params: CreateTaskParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let body = Self::build_body(&params);
        Ok(client.create_task(&body).await?)
    }

    /// Tags collapse to a comma-separated string; custom fields flatten into
    /// top-level `code=value` body entries.
    fn build_body(params: &CreateTaskParams) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(params.name.clone()));
        body.insert(
            "board_id".to_string(),
            Value::String(params.board_id.clone()),
        );
        body.insert(
            "creator_username".to_string(),
            Value::String(params.creator_username.clone()),
        );
        insert_opt(&mut body, "content", &params.content);
        insert_opt(&mut body, "deadline", &params.deadline);
        insert_opt(&mut body, "start_date", &params.start_date);
        insert_opt(&mut body, "parent_id", &params.parent_id);
        insert_opt(&mut body, "user_id", &params.user_id);
        if let Some(tags) = &params.tags {
            body.insert("tags".to_string(), Value::String(tags.join(",")));
        }
        if let Some(custom_fields) = &params.custom_fields {
            for field in custom_fields {
                body.insert(field.code.clone(), field.value.clone());
            }
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> CreateTaskParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_body_flattens_tags_and_custom_fields() {
        let body = CreateTaskTool::build_body(&params(json!({
            "name": "🚀 Ship it",
            "board_id": "11",
            "creator_username": "alice",
            "tags": ["urgent", "release"],
            "custom_fields": [
                {"code": "env", "value": "prod"},
                {"code": "effort", "value": 3}
            ]
        })));

        assert_eq!(body["name"], json!("🚀 Ship it"));
        assert_eq!(body["tags"], json!("urgent,release"));
        assert_eq!(body["env"], json!("prod"));
        assert_eq!(body["effort"], json!(3));
        assert!(!body.contains_key("custom_fields"));
    }

    #[test]
    fn test_optional_fields_omitted_from_body() {
        let body = CreateTaskTool::build_body(&params(json!({
            "name": "Task",
            "board_id": "11",
            "creator_username": "alice"
        })));
        assert_eq!(body.len(), 3);
        assert!(!body.contains_key("content"));
        assert!(!body.contains_key("deadline"));
    }

    #[test]
    fn test_schema_requires_name_board_and_creator() {
        let schema = CreateTaskTool::schema();
        let err = schema
            .validate(json!({"name": "x", "board_id": "1"}).as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation { path, .. } if path == "creator_username"));
    }
}
