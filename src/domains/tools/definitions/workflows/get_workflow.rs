//! Tool for fetching one workflow with its input fields and stages.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{insert_opt, parse_params, pick};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

#[derive(Debug, Deserialize)]
struct GetWorkflowParams {
    #[serde(default)]
    id: Option<String>,
}

pub struct GetWorkflowTool;

impl GetWorkflowTool {
    pub const NAME: &'static str = "get_workflow";

    const DESCRIPTION: &'static str = "Get detail of a workflow. The workflow detail contains a list of stages and a list \
         of fields that are used to create a job. Each field contains: name (name of the field), \
         code (code of the field), type (type of the field), required (true if the field is \
         required), options (options of the field) and placeholder (description of the field).";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetWorkflowParams>(args)?;
                Self::run(params, &clients.workflow).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new().field(
            FieldSpec::new("id", FieldKind::String).describe("Optional ID of the workflow."),
        )
    }

    async fn run(params: GetWorkflowParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        insert_opt(&mut body, "id", &params.id);

        let data = client.request("/workflows/v1/workflow/get", &body).await?;
        Ok(Self::summarize(data))
    }

    fn summarize(mut data: Value) -> Value {
        let workflow = Self::trim_workflow(data.get("workflow").unwrap_or(&Value::Null));
        let stages = data
            .get("stages")
            .and_then(Value::as_array)
            .map(|stages| {
                stages
                    .iter()
                    .map(|stage| Value::Object(pick(stage, &["name", "id", "metatype"])))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if let Some(object) = data.as_object_mut() {
            object.insert("workflow".to_string(), workflow);
            object.insert("stages".to_string(), Value::Array(stages));
            data
        } else {
            json!({ "workflow": workflow, "stages": stages })
        }
    }

    fn trim_workflow(workflow: &Value) -> Value {
        let mut summary = pick(workflow, &["name", "id", "content"]);

        let fields = workflow
            .pointer("/input_model/fields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .map(|field| {
                        json!({
                            "name": field.get("name").cloned().unwrap_or(Value::Null),
                            "code": field.get("code").cloned().unwrap_or(Value::Null),
                            "type": field.get("type").cloned().unwrap_or(Value::Null),
                            "required": field.pointer("/attrs/required").cloned().unwrap_or(Value::Null),
                            "options": field.pointer("/data/options").cloned().unwrap_or(Value::Null),
                            "placeholder": field.pointer("/data/placeholder").cloned().unwrap_or(Value::Null),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        summary.insert("fields".to_string(), Value::Array(fields));

        let stages = workflow
            .pointer("/execution_model/stages")
            .and_then(Value::as_array)
            .map(|stages| {
                stages
                    .iter()
                    .map(|stage| Value::Object(pick(stage, &["name", "id", "metatype"])))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        summary.insert("stages".to_string(), Value::Array(stages));

        Value::Object(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workflow_fields_projected_for_job_creation() {
        let data = json!({
            "workflow": {
                "name": "Expense Approval",
                "id": "w1",
                "content": "",
                "input_model": {"fields": [{
                    "name": "Amount",
                    "code": "amount",
                    "type": "number",
                    "attrs": {"required": true},
                    "data": {"options": [1, 2], "placeholder": "How much"},
                    "internal": "dropped"
                }]},
                "execution_model": {"stages": [{"name": "Review", "id": "s1", "metatype": "manual"}]}
            },
            "stages": [{"name": "Review", "id": "s1", "metatype": "manual", "extra": 1}]
        });

        let result = GetWorkflowTool::summarize(data);
        let field = &result["workflow"]["fields"][0];
        assert_eq!(field["code"], json!("amount"));
        assert_eq!(field["required"], json!(true));
        assert_eq!(field["placeholder"], json!("How much"));
        assert!(field.get("internal").is_none());
        assert_eq!(
            result["stages"],
            json!([{"name": "Review", "id": "s1", "metatype": "manual"}])
        );
    }
}
