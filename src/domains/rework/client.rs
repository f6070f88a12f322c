//! Credential-scoped HTTP client for the Rework API.
//!
//! One [`ReworkClient`] exists per credential scope. All variants share the
//! same request logic and differ only in which scope they close over. Bodies
//! are form-encoded with the scope's `access_token` and `password` merged in
//! unless the caller opts out. A call is a single attempt: no retries happen
//! here, and a bounded timeout turns a hung backend into a network error.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ApiError;
use super::scope::{CredentialScope, ScopeId};
use crate::core::config::CredentialsConfig;

/// Upper bound for one backend call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client bound to one credential scope.
#[derive(Debug, Clone)]
pub struct ReworkClient {
    scope: CredentialScope,
    http: reqwest::Client,
}

impl ReworkClient {
    /// Create a client for the given scope.
    pub fn new(scope: CredentialScope) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { scope, http })
    }

    /// The scope this client is bound to.
    pub fn scope(&self) -> ScopeId {
        self.scope.id()
    }

    /// POST a form-encoded body with credentials merged in.
    pub async fn request(&self, endpoint: &str, body: &Map<String, Value>) -> Result<Value, ApiError> {
        self.request_with(endpoint, Method::POST, body, true).await
    }

    /// General request form: explicit method and auth opt-out.
    ///
    /// Success responses with a JSON content type decode into structured
    /// values; everything else comes back as raw text. Non-success responses
    /// become [`ApiError::Backend`] carrying the status and the payload
    /// unmodified.
    pub async fn request_with(
        &self,
        endpoint: &str,
        method: Method,
        body: &Map<String, Value>,
        include_auth: bool,
    ) -> Result<Value, ApiError> {
        let mut pairs = form_pairs(body);
        if include_auth {
            pairs.push((
                "access_token".to_string(),
                self.scope.access_token().to_string(),
            ));
            pairs.push(("password".to_string(), self.scope.password().to_string()));
        }
        let encoded = serde_urlencoded::to_string(&pairs)?;

        let url = format!("{}{}", self.scope.base_url(), endpoint);
        debug!(scope = %self.scope.id(), %endpoint, "Rework API request");

        let response = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encoded)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));
        let text = response.text().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            return Err(ApiError::Backend {
                status: status.as_u16(),
                payload: text,
            });
        }

        if is_json {
            // Lenient decode: a backend that lies about its content type
            // still gets its payload through as raw text.
            Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        } else {
            Ok(Value::String(text))
        }
    }

    /// Create a new task. `task` must carry `board_id` and `name`.
    pub async fn create_task(&self, task: &Map<String, Value>) -> Result<Value, ApiError> {
        self.request("/projects/v1/task/create", task).await
    }

    /// Get task details by id.
    pub async fn get_task(&self, task_id: &str) -> Result<Value, ApiError> {
        let mut body = Map::new();
        body.insert("task_id".to_string(), Value::String(task_id.to_string()));
        self.request("/projects/v1/task/get", &body).await
    }

    /// List tasks of a board with optional extra filters.
    pub async fn list_tasks(
        &self,
        board_id: &str,
        options: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let mut body = options.clone();
        body.insert("board_id".to_string(), Value::String(board_id.to_string()));
        self.request("/projects/v1/task/list", &body).await
    }

    /// Update an existing task.
    pub async fn update_task(
        &self,
        task_id: &str,
        patch: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let mut body = patch.clone();
        body.insert("task_id".to_string(), Value::String(task_id.to_string()));
        self.request("/projects/v1/task/update", &body).await
    }
}

/// The three scoped clients, constructed once at startup and passed into the
/// tool catalog.
#[derive(Debug, Clone)]
pub struct ReworkClients {
    pub project: ReworkClient,
    pub account: ReworkClient,
    pub workflow: ReworkClient,
}

impl ReworkClients {
    /// Build all three clients from configuration, validating every scope's
    /// credentials.
    pub fn from_config(credentials: &CredentialsConfig) -> Result<Self, ApiError> {
        let base_url = credentials.base_url.clone();
        let scope = |id, token: &str, password: &str| {
            CredentialScope::new(id, token, password, base_url.clone())
        };

        Ok(Self {
            project: ReworkClient::new(scope(
                ScopeId::Project,
                &credentials.project_access_token,
                &credentials.project_password,
            )?)?,
            account: ReworkClient::new(scope(
                ScopeId::Account,
                &credentials.account_access_token,
                &credentials.account_password,
            )?)?,
            workflow: ReworkClient::new(scope(
                ScopeId::Workflow,
                &credentials.workflow_access_token,
                &credentials.workflow_password,
            )?)?,
        })
    }
}

/// Flatten a JSON body into form pairs, bracket-encoding nested values the
/// way qs does: `tags[0]=a`, `custom_fields[0][code]=x`.
fn form_pairs(body: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in body {
        append_pairs(key, value, &mut pairs);
    }
    pairs
}

fn append_pairs(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Bool(b) => pairs.push((key.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_pairs(&format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub_key, sub_value) in map {
                append_pairs(&format!("{key}[{sub_key}]"), sub_value, pairs);
            }
        }
    }
}
