//! Tool for fetching one task by id.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::parse_params;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

#[derive(Debug, Deserialize)]
struct GetDetailTaskParams {
    id: String,
}

pub struct GetDetailTaskTool;

impl GetDetailTaskTool {
    pub const NAME: &'static str = "get_detail_task";

    const DESCRIPTION: &'static str = "Get detail of a task by ID of task";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetDetailTaskParams>(args)?;
                Self::run(params, &clients.project).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new().field(
            FieldSpec::new("id", FieldKind::String)
                .required()
                .describe("Required ID of the task."),
        )
    }

    async fn run(params: GetDetailTaskParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        body.insert("id".to_string(), Value::String(params.id));
        Ok(client.request("/projects/v1/task/get", &body).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_is_required() {
        let schema = GetDetailTaskTool::schema();
        let err = schema.validate(json!({}).as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ToolError::Validation { path, .. } if path == "id"));
        assert!(schema.validate(json!({"id": "42"}).as_object().unwrap()).is_ok());
    }
}
