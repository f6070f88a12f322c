//! Tool for listing workflows, ranked against an optional name query.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Number, Value, json};

use crate::domains::matching::match_name;
use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{insert_opt, insert_opt_number, parse_params, pick};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

#[derive(Debug, Deserialize)]
struct GetWorkflowsParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    page: Option<Number>,
}

pub struct GetWorkflowsTool;

impl GetWorkflowsTool {
    pub const NAME: &'static str = "get_workflows";

    const DESCRIPTION: &'static str =
        "Get workflows. Can be filtered by q. Each workflow contains a list of stages";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetWorkflowsParams>(args)?;
                Self::run(params, &clients.workflow).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::new("q", FieldKind::String)
                    .describe("Optional search query to filter workflows by name."),
            )
            .field(
                FieldSpec::new("page", FieldKind::Number)
                    .describe("Optional page number. Defaults to 0, each page has 20 workflows"),
            )
    }

    async fn run(params: GetWorkflowsParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        insert_opt(&mut body, "q", &params.q);
        insert_opt_number(&mut body, "page", &params.page);

        let data = client.request("/workflows/v1/workflows/get", &body).await?;
        Ok(Self::rank(data, params.q.as_deref()))
    }

    /// Project workflows to summaries, score them against the query, drop
    /// non-matches and order by descending score (stable on ties).
    fn rank(mut data: Value, query: Option<&str>) -> Value {
        let mut ranked: Vec<(u8, Value)> = data
            .get("workflows")
            .and_then(Value::as_array)
            .map(|workflows| {
                workflows
                    .iter()
                    .filter_map(|workflow| {
                        let name = workflow
                            .get("name")
                            .and_then(Value::as_str)
                            .unwrap_or_default();
                        let result = match_name(name, query);
                        result
                            .is_match
                            .then(|| (result.score, Self::trim_workflow(workflow, result.score)))
                    })
                    .collect()
            })
            .unwrap_or_default();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        let workflows: Vec<Value> = ranked.into_iter().map(|(_, workflow)| workflow).collect();

        if let Some(object) = data.as_object_mut() {
            object.insert("workflows".to_string(), Value::Array(workflows));
            data
        } else {
            json!({ "workflows": workflows })
        }
    }

    fn trim_workflow(workflow: &Value, score: u8) -> Value {
        let mut summary = pick(workflow, &["name", "id", "content"]);
        summary.insert(
            "fields".to_string(),
            workflow
                .pointer("/input_model/fields")
                .cloned()
                .unwrap_or_else(|| json!([])),
        );
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
        summary.insert("score".to_string(), json!(score));
        Value::Object(summary)
    }
}
