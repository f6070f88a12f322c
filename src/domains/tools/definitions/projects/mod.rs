//! Project-scope tools: task and project operations.

mod create_task;
mod get_detail_task;
mod get_projects;
mod get_tasks;

pub use create_task::CreateTaskTool;
pub use get_detail_task::GetDetailTaskTool;
pub use get_projects::GetProjectsTool;
pub use get_tasks::GetTasksTool;
