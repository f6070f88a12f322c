//! Rework backend API domain.
//!
//! All backend access goes through credential-scoped clients: one client per
//! scope (project, account, workflow), each closing over an immutable
//! [`CredentialScope`]. The clients are constructed once at startup and
//! injected into the tool catalog.

mod client;
mod error;
mod scope;

pub use client::{ReworkClient, ReworkClients};
pub use error::ApiError;
pub use scope::{CredentialScope, ScopeId};
