//! Credential scopes for the Rework backend.

use super::error::ApiError;

/// The backend partition a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeId {
    Project,
    Account,
    Workflow,
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScopeId::Project => "project",
            ScopeId::Account => "account",
            ScopeId::Workflow => "workflow",
        };
        f.write_str(name)
    }
}

/// A credential pair plus base address identifying one backend partition.
///
/// Immutable after construction; lives for the whole process.
#[derive(Clone)]
pub struct CredentialScope {
    scope: ScopeId,
    access_token: String,
    password: String,
    base_url: String,
}

impl CredentialScope {
    /// Create a scope, rejecting empty secrets.
    pub fn new(
        scope: ScopeId,
        access_token: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let access_token = access_token.into();
        let password = password.into();
        if access_token.is_empty() || password.is_empty() {
            return Err(ApiError::MissingCredentials { scope });
        }
        Ok(Self {
            scope,
            access_token,
            password,
            base_url: base_url.into(),
        })
    }

    pub fn id(&self) -> ScopeId {
        self.scope
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialScope")
            .field("scope", &self.scope)
            .field("access_token", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_requires_both_secrets() {
        let err = CredentialScope::new(ScopeId::Project, "", "secret", "http://x").unwrap_err();
        assert!(matches!(
            err,
            ApiError::MissingCredentials {
                scope: ScopeId::Project
            }
        ));

        let err = CredentialScope::new(ScopeId::Account, "token", "", "http://x").unwrap_err();
        assert!(matches!(
            err,
            ApiError::MissingCredentials {
                scope: ScopeId::Account
            }
        ));

        assert!(CredentialScope::new(ScopeId::Workflow, "token", "secret", "http://x").is_ok());
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let scope =
            CredentialScope::new(ScopeId::Project, "token-123", "secret-456", "http://x").unwrap();
        let debug_str = format!("{:?}", scope);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("token-123"));
        assert!(!debug_str.contains("secret-456"));
    }
}
