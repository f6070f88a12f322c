//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry owns the tool catalog: each [`ToolDefinition`] bundles a
//! unique name, a description, an input schema and a handler. `invoke`
//! validates the arguments against the schema before the handler runs and
//! wraps the raw result in a reply envelope. The registry is stateless per
//! call; it never swallows handler failures.

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::error::ToolError;
use super::response::{Envelope, normalize};
use super::schema::InputSchema;

/// Future returned by a tool handler.
pub type ToolFuture = BoxFuture<'static, Result<Value, ToolError>>;

/// A tool handler: validated arguments in, raw result out.
pub type ToolHandler = Box<dyn Fn(Map<String, Value>) -> ToolFuture + Send + Sync>;

/// A named, schema-described remote operation.
pub struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    schema: InputSchema,
    handler: ToolHandler,
}

impl ToolDefinition {
    /// Create a definition. The handler is taken by value: a tool without
    /// one cannot be expressed, which is exactly the registration invariant.
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: InputSchema,
        handler: impl Fn(Map<String, Value>) -> ToolFuture + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            description,
            schema,
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tool metadata as listed to clients.
    pub fn metadata(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.schema.to_json(),
        })
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .finish()
    }
}

/// Tool registry - manages the full catalog.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; duplicate names are rejected.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), ToolError> {
        if self.index.contains_key(definition.name()) {
            return Err(ToolError::DuplicateTool(definition.name().to_string()));
        }
        self.index.insert(definition.name(), self.tools.len());
        self.tools.push(definition);
        Ok(())
    }

    /// All registered tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(ToolDefinition::name).collect()
    }

    /// Tool metadata for `tools/list`, in registration order.
    pub fn list(&self) -> Vec<Value> {
        self.tools.iter().map(ToolDefinition::metadata).collect()
    }

    /// Invoke a tool by name.
    ///
    /// Fails with [`ToolError::UnknownTool`] for an unregistered name and
    /// [`ToolError::Validation`] before the handler runs for bad input;
    /// handler failures propagate unchanged.
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<Envelope, ToolError> {
        let Some(definition) = self.index.get(name).map(|i| &self.tools[*i]) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::UnknownTool(name.to_string()));
        };

        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ToolError::validation("arguments", "expected an object")),
        };

        definition.schema.validate(&args)?;

        debug!("Invoking tool: {}", name);
        let raw = (definition.handler)(args).await?;
        Ok(normalize(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::rework::ApiError;
    use crate::domains::tools::schema::{FieldKind, FieldSpec};
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn echo_tool(name: &'static str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            "Echo the given message",
            InputSchema::new().field(FieldSpec::new("message", FieldKind::String).required()),
            |args| async move { Ok(args["message"].clone()) }.boxed(),
        )
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo")).unwrap();
        let err = registry.register(echo_tool("echo")).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(name) if name == "echo"));
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("c")).unwrap();
        registry.register(echo_tool("a")).unwrap();
        registry.register(echo_tool("b")).unwrap();
        assert_eq!(registry.tool_names(), vec!["c", "a", "b"]);

        let listed = registry.list();
        assert_eq!(listed[0]["name"], "c");
        assert_eq!(listed[1]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_validation_runs_before_handler() {
        let reached = Arc::new(AtomicBool::new(false));
        let flag = reached.clone();

        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDefinition::new(
                "guarded",
                "Never runs on bad input",
                InputSchema::new().field(FieldSpec::new("id", FieldKind::String).required()),
                move |_| {
                    let flag = flag.clone();
                    async move {
                        flag.store(true, Ordering::SeqCst);
                        Ok(json!("ran"))
                    }
                    .boxed()
                },
            ))
            .unwrap();

        let err = registry.invoke("guarded", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
        assert!(!reached.load(Ordering::SeqCst), "handler must not run");

        registry.invoke("guarded", json!({"id": "1"})).await.unwrap();
        assert!(reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_invoke_normalizes_result() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo")).unwrap();

        let envelope = registry
            .invoke("echo", json!({"message": "hello"}))
            .await
            .unwrap();
        assert_eq!(envelope.content.len(), 1);
        assert_eq!(envelope.content[0].text, "hello");
    }

    #[tokio::test]
    async fn test_handler_failure_propagates_with_cause() {
        let mut registry = ToolRegistry::new();
        registry
            .register(ToolDefinition::new(
                "failing",
                "Always fails",
                InputSchema::new(),
                |_| {
                    async {
                        Err(ToolError::Handler(ApiError::Backend {
                            status: 500,
                            payload: "boom".to_string(),
                        }))
                    }
                    .boxed()
                },
            ))
            .unwrap();

        let err = registry.invoke("failing", json!({})).await.unwrap_err();
        match err {
            ToolError::Handler(ApiError::Backend { status, payload }) => {
                assert_eq!(status, 500);
                assert_eq!(payload, "boom");
            }
            other => panic!("expected handler error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_object_arguments_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool("echo")).unwrap();
        let err = registry.invoke("echo", json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { .. }));
    }
}
