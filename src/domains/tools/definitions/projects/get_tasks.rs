//! Tool for listing tasks across boards with optional filters.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Map, Number, Value, json};

use crate::domains::rework::{ReworkClient, ReworkClients};
use crate::domains::tools::definitions::common::{
    insert_opt, insert_opt_number, parse_params, pick, summarize_form,
};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::schema::{FieldKind, FieldSpec, InputSchema};

/// Task status filters understood by the backend.
const TASK_STATUSES: &[&str] = &[
    "active",
    "done",
    "review",
    "todo",
    "doing",
    "donelate",
    "overdue",
    "notreview",
    "today",
];

/// Responses larger than this are trimmed to summary fields.
const SUMMARY_THRESHOLD: usize = 30;

#[derive(Debug, Deserialize)]
struct GetTasksParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    board_id: Option<String>,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    deadline_from: Option<String>,
    #[serde(default)]
    deadline_to: Option<String>,
    #[serde(default)]
    created_from: Option<String>,
    #[serde(default)]
    created_to: Option<String>,
    #[serde(default)]
    page: Option<Number>,
    #[serde(default)]
    creator: Option<String>,
    #[serde(default)]
    assign: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub struct GetTasksTool;

impl GetTasksTool {
    pub const NAME: &'static str = "get_tasks";

    const DESCRIPTION: &'static str = "Get tasks from all boards. Can be filtered by q (query to filter task name), \
         board_id, project_id, deadline_from/deadline_to (Unix timestamps in seconds), \
         created_from/created_to (Unix timestamps in seconds), page (page number), \
         creator (user id of creator), assign (user id of assignee), and status \
         (one of: 'active' (not done), 'done', 'review' (in review process), 'todo' (not started), \
         'doing' (started), 'donelate' (completed after deadline), 'overdue' (not done and past deadline), \
         'notreview' (not in review), 'today' (due today)).";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetTasksParams>(args)?;
                Self::run(params, &clients.project).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::new("q", FieldKind::String)
                    .describe("Optional search query to filter tasks by name."),
            )
            .field(
                FieldSpec::new("board_id", FieldKind::String)
                    .describe("Optional ID of the board that the tasks belong to."),
            )
            .field(
                FieldSpec::new("project_id", FieldKind::String)
                    .describe("Optional ID of the project that the tasks belong to."),
            )
            .field(
                FieldSpec::new("deadline_from", FieldKind::String)
                    .describe("Optional deadline from. Supports Unix timestamps (seconds)"),
            )
            .field(
                FieldSpec::new("deadline_to", FieldKind::String)
                    .describe("Optional deadline to. Supports Unix timestamps (seconds)"),
            )
            .field(
                FieldSpec::new("created_from", FieldKind::String)
                    .describe("Optional created from. Supports Unix timestamps (seconds)"),
            )
            .field(
                FieldSpec::new("created_to", FieldKind::String)
                    .describe("Optional created to. Supports Unix timestamps (seconds)"),
            )
            .field(
                FieldSpec::new("page", FieldKind::Number)
                    .describe("Optional page number. Defaults to 0, each page has 100 tasks"),
            )
            .field(FieldSpec::new("creator", FieldKind::String).describe(
                "Optional username of the creator. This will be used to indicate the task creator.",
            ))
            .field(FieldSpec::new("assign", FieldKind::String).describe(
                "Optional user ID of the assignee. This will be used to assign the task to the user.",
            ))
            .field(
                FieldSpec::new("status", FieldKind::Enum(TASK_STATUSES)).describe(
                    "Optional status of the tasks. Can be one of: 'active' (not done), 'done', \
                     'review' (in review process), 'todo' (not started), 'doing' (started), \
                     'donelate' (completed after deadline), 'overdue' (not done and past deadline), \
                     'notreview' (not in review), 'today' (due today)",
                ),
            )
    }

    async fn run(params: GetTasksParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        body.insert("limit".to_string(), json!(10));
        insert_opt(&mut body, "q", &params.q);
        insert_opt(&mut body, "board_id", &params.board_id);
        insert_opt(&mut body, "project_id", &params.project_id);
        insert_opt(&mut body, "deadline_from", &params.deadline_from);
        insert_opt(&mut body, "deadline_to", &params.deadline_to);
        insert_opt(&mut body, "created_from", &params.created_from);
        insert_opt(&mut body, "created_to", &params.created_to);
        insert_opt_number(&mut body, "page", &params.page);
        insert_opt(&mut body, "creator", &params.creator);
        insert_opt(&mut body, "assign", &params.assign);
        insert_opt(&mut body, "status", &params.status);

        let data = client.request("/projects/v1/task/list", &body).await?;
        Ok(Self::summarize(data))
    }

    /// Keep small result sets verbatim; trim large ones to summary fields so
    /// the reply stays readable.
    fn summarize(mut data: Value) -> Value {
        let tasks = data
            .get("tasks")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let tasks = if tasks.len() > SUMMARY_THRESHOLD {
            tasks.iter().map(Self::trim_task).collect()
        } else {
            tasks
        };
        if let Some(object) = data.as_object_mut() {
            object.insert("tasks".to_string(), Value::Array(tasks));
            data
        } else {
            json!({ "tasks": tasks })
        }
    }

    fn trim_task(task: &Value) -> Value {
        let mut summary = pick(
            task,
            &[
                "name",
                "id",
                "content",
                "since",
                "status",
                "user_id",
                "creator_id",
                "board_export",
                "project_export",
                "result",
                "deadline",
                "last_update",
            ],
        );
        summary.insert("custom_fields".to_string(), summarize_form(task));
        Value::Object(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_small_result_passes_through() {
        let data = json!({"page": 0, "tasks": [{"id": "1", "name": "A", "internal": "kept"}]});
        let result = GetTasksTool::summarize(data.clone());
        assert_eq!(result, data);
    }

    #[test]
    fn test_large_result_is_trimmed() {
        let task = json!({
            "id": "1",
            "name": "A",
            "status": 0,
            "internal_blob": "dropped",
            "form": [{"name": "Env", "id": "f1", "type": "select", "display": "prod", "raw": 1}]
        });
        let tasks: Vec<Value> = (0..31).map(|_| task.clone()).collect();
        let result = GetTasksTool::summarize(json!({"tasks": tasks, "page": 0}));

        let trimmed = result["tasks"].as_array().unwrap();
        assert_eq!(trimmed.len(), 31);
        assert_eq!(trimmed[0]["name"], json!("A"));
        assert!(trimmed[0].get("internal_blob").is_none());
        assert_eq!(
            trimmed[0]["custom_fields"][0],
            json!({"name": "Env", "id": "f1", "type": "select", "value": "prod"})
        );
        // Fields outside the response list are preserved
        assert_eq!(result["page"], json!(0));
    }

    #[test]
    fn test_status_enum_rejects_unknown_value() {
        let schema = GetTasksTool::schema();
        let err = schema
            .validate(json!({"status": "archived"}).as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation { path, .. } if path == "status"));
    }
}
