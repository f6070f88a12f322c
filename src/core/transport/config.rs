//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Default port for the SSE listener.
const DEFAULT_SSE_PORT: u16 = 3231;

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Exclusive stdin/stdout channel (default MCP mode).
    Stdio,

    /// Multi-session HTTP listener with server-sent events.
    Sse(SseConfig),
}

/// SSE transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Stdio
    }
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSE_PORT,
            host: default_host(),
        }
    }
}

impl TransportConfig {
    /// Create a stdio transport config.
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an SSE transport config.
    pub fn sse(port: u16, host: impl Into<String>) -> Self {
        Self::Sse(SseConfig {
            port,
            host: host.into(),
        })
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Resolve the transport from a configuration lookup.
    ///
    /// `REWORK_ENABLE_SSE=true` selects the multi-session listener;
    /// everything else is the exclusive stdio channel.
    pub(crate) fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let enable_sse = lookup("REWORK_ENABLE_SSE")
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if !enable_sse {
            return Self::Stdio;
        }

        let port = lookup("REWORK_PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_SSE_PORT);
        let host = lookup("REWORK_HOST").unwrap_or_else(default_host);
        Self::Sse(SseConfig { port, host })
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            Self::Sse(cfg) => format!("SSE on {}:{}", cfg.host, cfg.port),
        }
    }

    /// Check if this transport is the exclusive stdio mode.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Self::Stdio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_stdio() {
        let config = TransportConfig::from_lookup(&lookup_from(&[]));
        assert!(config.is_stdio());
    }

    #[test]
    fn test_enable_sse_selects_listener_with_default_port() {
        let config = TransportConfig::from_lookup(&lookup_from(&[("REWORK_ENABLE_SSE", "true")]));
        match config {
            TransportConfig::Sse(cfg) => {
                assert_eq!(cfg.port, 3231);
                assert_eq!(cfg.host, "127.0.0.1");
            }
            other => panic!("expected SSE config, got {other:?}"),
        }
    }

    #[test]
    fn test_port_and_host_overrides() {
        let config = TransportConfig::from_lookup(&lookup_from(&[
            ("REWORK_ENABLE_SSE", "TRUE"),
            ("REWORK_PORT", "8080"),
            ("REWORK_HOST", "0.0.0.0"),
        ]));
        match config {
            TransportConfig::Sse(cfg) => {
                assert_eq!(cfg.port, 8080);
                assert_eq!(cfg.host, "0.0.0.0");
            }
            other => panic!("expected SSE config, got {other:?}"),
        }
    }

    #[test]
    fn test_non_true_values_stay_on_stdio() {
        for value in ["false", "0", "yes", ""] {
            let config =
                TransportConfig::from_lookup(&lookup_from(&[("REWORK_ENABLE_SSE", value)]));
            assert!(config.is_stdio(), "value {value:?} should not enable SSE");
        }
    }
}
