//! Transport layer for the Rework MCP server.
//!
//! Two mutually exclusive operating modes, selected once at startup:
//!
//! - **Stdio**: a single duplex channel over stdin/stdout, newline-delimited
//!   JSON-RPC. One client; a channel failure is process-fatal.
//! - **SSE**: an HTTP listener serving many concurrent sessions. Each session
//!   gets a server-push event stream and posts correlated requests carrying
//!   its session id; one session's failure never affects the others.
//!
//! Both modes delegate message processing to the shared [`rpc`] dispatch.

mod config;
mod error;
pub mod rpc;
mod service;
pub mod sse;
pub mod stdio;

pub use config::{SseConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;
