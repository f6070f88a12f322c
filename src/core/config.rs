//! Configuration management for the Rework MCP server.
//!
//! Configuration is resolved from three layers, highest priority first:
//! `--env KEY=VALUE` command line arguments, process environment variables,
//! and built-in defaults. A `.env` file is loaded into the environment if
//! present.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Default base URL for the Rework backend API.
pub const DEFAULT_BASE_URL: &str = "https://apis.rework.com";

/// Main configuration structure for the server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Rework API credentials, one pair per scope.
    pub credentials: CredentialsConfig,

    /// Tool catalog configuration.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Tool catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Tool names excluded from registration (`DISABLED_TOOLS`, comma
    /// separated).
    pub disabled: Vec<String>,
}

/// Credentials for the Rework backend, one access token/password pair per
/// scope. Scopes fall back to the shared pair when no dedicated pair is set.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Base URL of the Rework API.
    pub base_url: String,

    pub project_access_token: String,
    pub project_password: String,

    pub account_access_token: String,
    pub account_password: String,

    pub workflow_access_token: String,
    pub workflow_password: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() { "[EMPTY]" } else { "[REDACTED]" }
        }

        f.debug_struct("CredentialsConfig")
            .field("base_url", &self.base_url)
            .field("project_access_token", &redact(&self.project_access_token))
            .field("project_password", &redact(&self.project_password))
            .field("account_access_token", &redact(&self.account_access_token))
            .field("account_password", &redact(&self.account_password))
            .field(
                "workflow_access_token",
                &redact(&self.workflow_access_token),
            )
            .field("workflow_password", &redact(&self.workflow_password))
            .finish()
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_access_token: String::new(),
            project_password: String::new(),
            account_access_token: String::new(),
            account_password: String::new(),
            workflow_access_token: String::new(),
            workflow_password: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "rework-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "error".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment and command line.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(&args)
    }

    /// Load configuration, resolving `--env KEY=VALUE` argument pairs on top
    /// of environment variables.
    pub fn from_args(args: &[String]) -> Self {
        let overrides = parse_env_args(args);
        let lookup = |key: &str| -> Option<String> {
            overrides
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(disabled) = lookup("DISABLED_TOOLS") {
            config.tools.disabled = disabled
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
        }

        config.credentials = CredentialsConfig::from_lookup(&lookup);
        config.transport = TransportConfig::from_lookup(&lookup);

        config
    }
}

impl CredentialsConfig {
    /// Resolve credentials from a lookup function. Each scope prefers its
    /// dedicated variables and falls back to the shared
    /// `REWORK_ACCESS_TOKEN`/`REWORK_PASSWORD` pair.
    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let shared_token = lookup("REWORK_ACCESS_TOKEN").unwrap_or_default();
        let shared_password = lookup("REWORK_PASSWORD").unwrap_or_default();

        let scoped = |key: &str, shared: &str| -> String {
            lookup(key).unwrap_or_else(|| shared.to_string())
        };

        let config = Self {
            base_url: lookup("REWORK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            project_access_token: scoped("REWORK_PROJECT_ACCESS_TOKEN", &shared_token),
            project_password: scoped("REWORK_PROJECT_PASSWORD", &shared_password),
            account_access_token: scoped("REWORK_ACCOUNT_ACCESS_TOKEN", &shared_token),
            account_password: scoped("REWORK_ACCOUNT_PASSWORD", &shared_password),
            workflow_access_token: scoped("REWORK_WORKFLOW_ACCESS_TOKEN", &shared_token),
            workflow_password: scoped("REWORK_WORKFLOW_PASSWORD", &shared_password),
        };

        if config.project_access_token.is_empty() || config.project_password.is_empty() {
            warn!("Rework credentials are not fully configured; startup will fail");
        }

        config
    }
}

/// Parse `--env KEY=VALUE` pairs from command line arguments.
fn parse_env_args(args: &[String]) -> HashMap<String, String> {
    let mut overrides = HashMap::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--env" {
            if let Some(pair) = iter.next() {
                if let Some((key, value)) = pair.split_once('=') {
                    overrides.insert(key.to_string(), value.to_string());
                }
            }
        }
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_rework_env() {
        for key in [
            "REWORK_ACCESS_TOKEN",
            "REWORK_PASSWORD",
            "REWORK_PROJECT_ACCESS_TOKEN",
            "REWORK_PROJECT_PASSWORD",
            "REWORK_ACCOUNT_ACCESS_TOKEN",
            "REWORK_ACCOUNT_PASSWORD",
            "REWORK_WORKFLOW_ACCESS_TOKEN",
            "REWORK_WORKFLOW_PASSWORD",
            "REWORK_BASE_URL",
            "DISABLED_TOOLS",
            "LOG_LEVEL",
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_shared_credentials_fan_out_to_all_scopes() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_rework_env();
        unsafe {
            std::env::set_var("REWORK_ACCESS_TOKEN", "token-1");
            std::env::set_var("REWORK_PASSWORD", "secret-1");
        }

        let config = Config::from_args(&[]);
        assert_eq!(config.credentials.project_access_token, "token-1");
        assert_eq!(config.credentials.account_access_token, "token-1");
        assert_eq!(config.credentials.workflow_access_token, "token-1");
        assert_eq!(config.credentials.workflow_password, "secret-1");

        clear_rework_env();
    }

    #[test]
    fn test_scoped_credentials_override_shared() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_rework_env();
        unsafe {
            std::env::set_var("REWORK_ACCESS_TOKEN", "token-1");
            std::env::set_var("REWORK_PASSWORD", "secret-1");
            std::env::set_var("REWORK_ACCOUNT_ACCESS_TOKEN", "account-token");
        }

        let config = Config::from_args(&[]);
        assert_eq!(config.credentials.project_access_token, "token-1");
        assert_eq!(config.credentials.account_access_token, "account-token");
        assert_eq!(config.credentials.account_password, "secret-1");

        clear_rework_env();
    }

    #[test]
    fn test_env_args_take_priority() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_rework_env();
        unsafe {
            std::env::set_var("REWORK_ACCESS_TOKEN", "from-env");
        }

        let args: Vec<String> = [
            "--env",
            "REWORK_ACCESS_TOKEN=from-args",
            "--env",
            "LOG_LEVEL=debug",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let config = Config::from_args(&args);
        assert_eq!(config.credentials.project_access_token, "from-args");
        assert_eq!(config.logging.level, "debug");

        clear_rework_env();
    }

    #[test]
    fn test_disabled_tools_parsing() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_rework_env();
        unsafe {
            std::env::set_var("DISABLED_TOOLS", "create_task, comment_job ,");
        }

        let config = Config::from_args(&[]);
        assert_eq!(config.tools.disabled, vec!["create_task", "comment_job"]);

        clear_rework_env();
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            project_access_token: "super_secret_token".to_string(),
            project_password: "super_secret_password".to_string(),
            ..CredentialsConfig::default()
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
        assert!(!debug_str.contains("super_secret_password"));
    }

    #[test]
    fn test_default_base_url() {
        let config = CredentialsConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
