//! Tool for fetching one job by id.

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
struct GetDetailJobParams {
    id: String,
}

pub struct GetDetailJobTool;

impl GetDetailJobTool {
    pub const NAME: &'static str = "get_detail_job";

    const DESCRIPTION: &'static str = "Get detail of a job by ID of job";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetDetailJobParams>(args)?;
                Self::run(params, &clients.workflow).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new().field(
            FieldSpec::new("id", FieldKind::String)
                .required()
                .describe("Required ID of the job."),
        )
    }

    async fn run(params: GetDetailJobParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        body.insert("id".to_string(), Value::String(params.id));
        Ok(client.request("/workflows/v1/job/get", &body).await?)
    }
}
