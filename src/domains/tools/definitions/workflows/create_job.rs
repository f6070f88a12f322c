//! Tool for creating a single job in a workflow.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{
    CustomField, custom_fields_kind, insert_opt, parse_params,
};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

#[derive(Debug, Deserialize)]
struct CreateJobParams {
    name: String,
    workflow_id: String,
    creator_username: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    custom_fields: Option<Vec<CustomField>>,
}

pub struct CreateJobTool;

impl CreateJobTool {
    pub const NAME: &'static str = "create_job";

    const DESCRIPTION: &'static str = "Creates a single job in a Workflow. Use workflow_id. \
         Required: name + workflow_id. Supports custom fields as array of {code, value}.";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<CreateJobParams>(args)?;
                Self::run(params, &clients.workflow).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(FieldSpec::new("name", FieldKind::String).required().describe(
                "REQUIRED: Name of the job. Put a relevant emoji followed by a blank space before the name.",
            ))
            .field(
                FieldSpec::new("workflow_id", FieldKind::String)
                    .required()
                    .describe("REQUIRED: ID of the workflow to create the job in."),
            )
            .field(FieldSpec::new("creator_username", FieldKind::String).required().describe(
                "REQUIRED: Username of the creator. This will be used to indicate the job creator.",
            ))
            .field(
                FieldSpec::new("content", FieldKind::String)
                    .describe("Optional html formatted description for the job"),
            )
            .field(
                FieldSpec::new("deadline", FieldKind::String)
                    .describe("Optional deadline. Supports Unix timestamps (seconds)"),
            )
            .field(FieldSpec::new("user_id", FieldKind::String).describe(
                "Optional user ID of the assignee. This will be used to assign the job to the user.",
            ))
            .field(
                FieldSpec::new("tags", FieldKind::Array(Box::new(FieldKind::String))).describe(
                    "Optional array of tag names to assign to the job. The tags must already exist in the space.",
                ),
            )
            .field(FieldSpec::new("custom_fields", custom_fields_kind()).describe(
                "Optional array of custom field values to set on the job. Each object must have a \
                 'code' and 'value' property. If the field type is 'date' or 'datetime' the value \
                 should be a Unix timestamp (seconds).",
            ))
    }

    async fn run(params: CreateJobParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let body = Self::build_body(&params);
        Ok(client.request("/workflows/v1/job/create", &body).await?)
    }

    /// Unlike task creation, tags and custom fields pass through as arrays;
    /// the workflow backend accepts the bracket-encoded form.
    fn build_body(params: &CreateJobParams) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(params.name.clone()));
        body.insert(
            "workflow_id".to_string(),
            Value::String(params.workflow_id.clone()),
        );
        body.insert(
            "creator_username".to_string(),
            Value::String(params.creator_username.clone()),
        );
        insert_opt(&mut body, "content", &params.content);
        insert_opt(&mut body, "deadline", &params.deadline);
        insert_opt(&mut body, "user_id", &params.user_id);
        if let Some(tags) = &params.tags {
            body.insert("tags".to_string(), json!(tags));
        }
        if let Some(custom_fields) = &params.custom_fields {
            let fields: Vec<Value> = custom_fields
                .iter()
                .map(|field| json!({"code": field.code, "value": field.value}))
                .collect();
            body.insert("custom_fields".to_string(), Value::Array(fields));
        }
        body
    }
}
