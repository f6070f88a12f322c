//! Tool definitions - one file per tool, grouped by backend scope.
//!
//! ## Adding a new tool
//!
//! 1. Create a new file in the matching scope directory
//! 2. Define the params struct, schema and `run()`
//! 3. Export it here and add it to [`build_registry`]

mod common;

pub mod account;
pub mod projects;
pub mod workflows;

pub use account::{FindUsersTool, ListUsersTool};
pub use projects::{CreateTaskTool, GetDetailTaskTool, GetProjectsTool, GetTasksTool};
pub use workflows::{
    CommentJobTool, CreateJobTool, GetDetailJobTool, GetJobsTool, GetWorkflowTool,
    GetWorkflowsTool,
};

use std::sync::Arc;

use tracing::info;

use super::error::ToolError;
use super::registry::ToolRegistry;
use crate::domains::rework::ReworkClients;

/// Build the registry with the full tool catalog, skipping disabled tools.
///
/// The scoped clients are injected here once; every handler closes over the
/// bundle and picks its scope.
pub fn build_registry(
    clients: Arc<ReworkClients>,
    disabled: &[String],
) -> Result<ToolRegistry, ToolError> {
    let definitions = vec![
        CreateTaskTool::definition(&clients),
        GetTasksTool::definition(&clients),
        GetDetailTaskTool::definition(&clients),
        GetProjectsTool::definition(&clients),
        ListUsersTool::definition(&clients),
        FindUsersTool::definition(&clients),
        GetWorkflowsTool::definition(&clients),
        GetWorkflowTool::definition(&clients),
        CreateJobTool::definition(&clients),
        GetJobsTool::definition(&clients),
        GetDetailJobTool::definition(&clients),
        CommentJobTool::definition(&clients),
    ];

    let mut registry = ToolRegistry::new();
    for definition in definitions {
        if disabled.iter().any(|name| name == definition.name()) {
            info!("Tool disabled by configuration: {}", definition.name());
            continue;
        }
        registry.register(definition)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CredentialsConfig;

    fn test_clients() -> Arc<ReworkClients> {
        let credentials = CredentialsConfig {
            project_access_token: "t".into(),
            project_password: "p".into(),
            account_access_token: "t".into(),
            account_password: "p".into(),
            workflow_access_token: "t".into(),
            workflow_password: "p".into(),
            ..CredentialsConfig::default()
        };
        Arc::new(ReworkClients::from_config(&credentials).unwrap())
    }

    #[test]
    fn test_full_catalog_registers() {
        let registry = build_registry(test_clients(), &[]).unwrap();
        let names = registry.tool_names();
        assert_eq!(names.len(), 12);
        for name in [
            "create_task",
            "get_tasks",
            "get_detail_task",
            "get_projects",
            "list_users",
            "find_users",
            "get_workflows",
            "get_workflow",
            "create_job",
            "get_jobs",
            "get_detail_job",
            "comment_job",
        ] {
            assert!(names.contains(&name), "missing tool {name}");
        }
    }

    #[test]
    fn test_disabled_tools_are_skipped() {
        let disabled = vec!["create_task".to_string(), "comment_job".to_string()];
        let registry = build_registry(test_clients(), &disabled).unwrap();
        let names = registry.tool_names();
        assert_eq!(names.len(), 10);
        assert!(!names.contains(&"create_task"));
        assert!(!names.contains(&"comment_job"));
    }

    #[test]
    fn test_every_tool_lists_a_schema() {
        let registry = build_registry(test_clients(), &[]).unwrap();
        for tool in registry.list() {
            assert_eq!(tool["inputSchema"]["type"], "object", "tool {}", tool["name"]);
            assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
        }
    }
}
