//! Tool for listing jobs with optional filters.

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

/// Job status filters understood by the backend.
const JOB_STATUSES: &[&str] = &["active", "done", "failed", "overdue"];

/// Responses larger than this are trimmed to summary fields.
const SUMMARY_THRESHOLD: usize = 30;

#[derive(Debug, Deserialize)]
struct GetJobsParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    workflow_id: Option<String>,
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
    creator_username: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub struct GetJobsTool;

impl GetJobsTool {
    pub const NAME: &'static str = "get_jobs";

    const DESCRIPTION: &'static str = "Get jobs in the system. Can be filtered by q (query to filter job name), \
         workflow_id (ID of the workflow that the jobs belong to), deadline_from/deadline_to \
         (Unix timestamps in seconds), created_from/created_to (Unix timestamps in seconds), \
         page (page number), creator_username (username of creator), username (username of \
         assignee), and status (one of: 'active' (not done), 'done', 'failed', 'overdue').";

    pub fn definition(clients: &Arc<ReworkClients>) -> ToolDefinition {
        let clients = Arc::clone(clients);
        ToolDefinition::new(Self::NAME, Self::DESCRIPTION, Self::schema(), move |args| {
            let clients = Arc::clone(&clients);
            async move {
                let params = parse_params::<GetJobsParams>(args)?;
                Self::run(params, &clients.workflow).await
            }
            .boxed()
        })
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .field(
                FieldSpec::new("q", FieldKind::String)
                    .describe("Optional search query to filter jobs by name."),
            )
            .field(
                FieldSpec::new("workflow_id", FieldKind::String)
                    .describe("Optional ID of the workflow that the jobs belong to."),
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
                    .describe("Optional page number. Defaults to 0, each page has 100 jobs"),
            )
            .field(FieldSpec::new("creator_username", FieldKind::String).describe(
                "Optional username of the creator. This will be used to indicate the job creator.",
            ))
            .field(FieldSpec::new("username", FieldKind::String).describe(
                "Optional username of the assignee. This will be used to assign the job to the user.",
            ))
            .field(
                FieldSpec::new("status", FieldKind::Enum(JOB_STATUSES)).describe(
                    "Optional status of the jobs. Can be one of: 'active' (not done), 'done', \
                     'failed', 'overdue' (not done and past deadline)",
                ),
            )
    }

    async fn run(params: GetJobsParams, client: &ReworkClient) -> Result<Value, ToolError> {
        let mut body = Map::new();
        body.insert("limit".to_string(), json!(10));
        insert_opt(&mut body, "q", &params.q);
        insert_opt(&mut body, "workflow_id", &params.workflow_id);
        insert_opt(&mut body, "deadline_from", &params.deadline_from);
        insert_opt(&mut body, "deadline_to", &params.deadline_to);
        insert_opt(&mut body, "created_from", &params.created_from);
        insert_opt(&mut body, "created_to", &params.created_to);
        insert_opt_number(&mut body, "page", &params.page);
        insert_opt(&mut body, "creator_username", &params.creator_username);
        insert_opt(&mut body, "username", &params.username);
        insert_opt(&mut body, "status", &params.status);

        let data = client.request("/workflows/v1/jobs/get", &body).await?;
        Ok(Self::summarize(data))
    }

    fn summarize(mut data: Value) -> Value {
        let jobs = data
            .get("jobs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let jobs = if jobs.len() > SUMMARY_THRESHOLD {
            jobs.iter().map(Self::trim_job).collect()
        } else {
            jobs
        };
        if let Some(object) = data.as_object_mut() {
            object.insert("jobs".to_string(), Value::Array(jobs));
            data
        } else {
            json!({ "jobs": jobs })
        }
    }

    fn trim_job(job: &Value) -> Value {
        let mut summary = pick(
            job,
            &[
                "name",
                "id",
                "content",
                "since",
                "status",
                "user_id",
                "creator_id",
                "stage_export",
            ],
        );
        summary.insert("custom_fields".to_string(), summarize_form(job));
        Value::Object(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_small_result_passes_through() {
        let data = json!({"jobs": [{"id": "1", "name": "Job", "everything": "kept"}]});
        assert_eq!(GetJobsTool::summarize(data.clone()), data);
    }

    #[test]
    fn test_large_result_keeps_stage_export() {
        let job = json!({
            "id": "1",
            "name": "Job",
            "stage_export": "Review",
            "giant_payload": "dropped",
            "form": []
        });
        let jobs: Vec<Value> = (0..40).map(|_| job.clone()).collect();
        let result = GetJobsTool::summarize(json!({"jobs": jobs}));

        let trimmed = result["jobs"].as_array().unwrap();
        assert_eq!(trimmed.len(), 40);
        assert_eq!(trimmed[0]["stage_export"], json!("Review"));
        assert!(trimmed[0].get("giant_payload").is_none());
    }

    #[test]
    fn test_status_enum_matches_job_lifecycle() {
        let schema = GetJobsTool::schema();
        assert!(
            schema
                .validate(json!({"status": "failed"}).as_object().unwrap())
                .is_ok()
        );
        // "review" is a task status, not a job status
        assert!(
            schema
                .validate(json!({"status": "review"}).as_object().unwrap())
                .is_err()
        );
    }
}
