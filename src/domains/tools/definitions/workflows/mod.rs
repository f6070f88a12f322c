//! Workflow-scope tools: workflow and job operations.

mod comment_job;
mod create_job;
mod get_detail_job;
mod get_jobs;
mod get_workflow;
mod get_workflows;

pub use comment_job::CommentJobTool;
pub use create_job::CreateJobTool;
pub use get_detail_job::GetDetailJobTool;
pub use get_jobs::GetJobsTool;
pub use get_workflow::GetWorkflowTool;
pub use get_workflows::GetWorkflowsTool;
