//! Business domains of the Rework MCP server.
//!
//! - **tools**: Tool registry, input schemas and the tool catalog
//! - **rework**: Credential-scoped HTTP clients for the Rework backend
//! - **matching**: Fuzzy name matching used to resolve entity references

pub mod matching;
pub mod rework;
pub mod tools;
