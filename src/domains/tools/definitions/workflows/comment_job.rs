//! Tool for commenting on a job.

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
struct CommentJobParams {
    id: String,
    content: String,
    creator_username: String,
}

pub struct CommentJobTool;

impl CommentJobTool {
    pub const NAME: &'static str = "comment_job";

    const DESCRIPTION: &'static str = "Comment on a job by ID of job";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<CommentJobParams>(args)?;
                Self::run(params, &clients.workflow).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::new("id", FieldKind::String)
                    .required()
                    .describe("Required ID of the job."),
            )
            .field(
                FieldSpec::new("content", FieldKind::String)
                    .required()
                    .describe("Required content of the comment."),
            )
            .field(
                FieldSpec::new("creator_username", FieldKind::String)
                    .required()
                    .describe("Required username of the creator."),
            )
    }

    async fn run(params: CommentJobParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        body.insert("id".to_string(), Value::String(params.id));
        body.insert("content".to_string(), Value::String(params.content));
        body.insert(
            "creator_username".to_string(),
            Value::String(params.creator_username),
        );
        Ok(client.request("/workflows/v1/job/post/create", &body).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_three_fields_required() {
        let schema = CommentJobTool::schema();
        for missing in [
            json!({"content": "c", "creator_username": "u"}),
            json!({"id": "1", "creator_username": "u"}),
            json!({"id": "1", "content": "c"}),
        ] {
            assert!(schema.validate(missing.as_object().unwrap()).is_err());
        }
        assert!(
            schema
                .validate(
                    json!({"id": "1", "content": "c", "creator_username": "u"})
                        .as_object()
                        .unwrap()
                )
                .is_ok()
        );
    }
}
