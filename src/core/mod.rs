//! Core infrastructure for the Rework MCP server.
//!
//! This module contains the foundational components:
//! - Configuration management
//! - Error handling
//! - The server handler shared by both transports
//! - The transport layer (stdio and SSE)

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
