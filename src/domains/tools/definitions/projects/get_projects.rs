//! Tool for listing projects and their boards.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Number, Value, json};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{insert_opt, insert_opt_number, parse_params, pick};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

#[derive(Debug, Deserialize)]
struct GetProjectsParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    page: Option<Number>,
}

pub struct GetProjectsTool;

impl GetProjectsTool {
    pub const NAME: &'static str = "get_projects";

    const DESCRIPTION: &'static str = "Get projects. Can be filtered by q. Each project contains a list of boards with \
         metatype tasks or docs. Tasks boards contain lists of tasks.";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetProjectsParams>(args)?;
                Self::run(params, &clients.project).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::new("q", FieldKind::String)
                    .describe("Optional search query to filter projects by name."),
            )
            .field(
                FieldSpec::new("page", FieldKind::Number)
                    .describe("Optional page number. Defaults to 0, each page has 20 projects"),
            )
    }

    async fn run(params: GetProjectsParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        insert_opt(&mut body, "q", &params.q);
        insert_opt_number(&mut body, "page", &params.page);

        let data = client.request("/projects/v1/project/all", &body).await?;
        Ok(Self::summarize(data))
    }

    fn summarize(mut data: Value) -> Value {
        let projects = data
            .get("projects")
            .and_then(Value::as_array)
            .map(|projects| projects.iter().map(Self::trim_project).collect::<Vec<_>>())
            .unwrap_or_default();
        if let Some(object) = data.as_object_mut() {
            object.insert("projects".to_string(), Value::Array(projects));
            data
        } else {
            json!({ "projects": projects })
        }
    }

    fn trim_project(project: &Value) -> Value {
        let mut summary = pick(project, &["name", "id", "content"]);
        let boards = project
            .get("cached_boards")
            .and_then(Value::as_array)
            .map(|boards| {
                boards
                    .iter()
                    .map(|board| Value::Object(pick(board, &["name", "id", "metatype"])))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        summary.insert("boards".to_string(), Value::Array(boards));
        Value::Object(summary)
    }
}
