//! MCP server handler shared by both transports.
//!
//! The server owns the tool registry and nothing else. At construction it
//! builds the three credential-scoped backend clients from configuration and
//! injects them into the tool catalog; a missing secret aborts startup before
//! any transport opens.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::config::Config;
use super::error::Result;
use crate::domains::rework::ReworkClients;
use crate::domains::tools::{Envelope, ToolError, ToolRegistry, build_registry};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// The tool catalog with its handlers bound to the scoped clients.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new server with the given configuration.
    ///
    /// Fails if any credential scope is missing a secret or if the tool
    /// catalog contains a duplicate name.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let clients = Arc::new(ReworkClients::from_config(&config.credentials)?);
        let registry = Arc::new(build_registry(clients, &config.tools.disabled)?);

        info!("Tool registry built: {} tools", registry.tool_names().len());

        Ok(Self { config, registry })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Instructions reported to clients during initialization.
    pub fn instructions(&self) -> &'static str {
        "This server exposes Rework workspace operations: tasks, projects, \
         workflows, jobs and user resolution."
    }

    /// List all available tools.
    pub fn list_tools(&self) -> Vec<Value> {
        self.registry.list()
    }

    /// Call a tool by name with raw arguments.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> std::result::Result<Envelope, ToolError> {
        self.registry.invoke(name, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CredentialsConfig;

    fn test_config() -> Config {
        Config {
            credentials: CredentialsConfig {
                project_access_token: "t".into(),
                project_password: "p".into(),
                account_access_token: "t".into(),
                account_password: "p".into(),
                workflow_access_token: "t".into(),
                workflow_password: "p".into(),
                ..CredentialsConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_credentials_abort_startup() {
        let config = Config::default();
        assert!(McpServer::new(config).is_err());
    }

    #[test]
    fn test_server_exposes_full_catalog() {
        let server = McpServer::new(test_config()).unwrap();
        let tools = server.list_tools();
        assert_eq!(tools.len(), 12);
        assert!(tools.iter().any(|t| t["name"] == "find_users"));
    }

    #[tokio::test]
    async fn test_call_tool_surfaces_registry_errors() {
        let server = McpServer::new(test_config()).unwrap();
        let err = server
            .call_tool("does_not_exist", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }
}
