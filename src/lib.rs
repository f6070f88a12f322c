//! Rework MCP Server Library
//!
//! This crate implements a Model Context Protocol (MCP) server that exposes
//! Rework workspace operations (tasks, projects, workflows, jobs, users) as
//! schema-validated tools over two transports.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the server handler and the
//!   transport layer (exclusive stdio channel or multi-session SSE)
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: The tool registry, input schemas and the tool catalog
//!   - **rework**: Credential-scoped clients for the Rework backend API
//!   - **matching**: Deterministic fuzzy name matching for entity resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use rework_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
