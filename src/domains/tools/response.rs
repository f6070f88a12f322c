//! Reply envelope and response normalizer.
//!
//! Whatever a tool handler returns - structured JSON, a preformatted display
//! block, or plain text - ends up in the same envelope shape: an ordered
//! sequence of text content blocks (exactly one in this design).

use serde::Serialize;
use serde_json::{Value, json};

/// One content block of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// The canonical reply wrapper returned for every tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub content: Vec<ContentBlock>,
}

impl Envelope {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Render as a `tools/call` result payload.
    pub fn to_call_result(&self, is_error: bool) -> Value {
        json!({
            "content": self.content,
            "isError": is_error,
        })
    }
}

/// Convert an arbitrary raw result into an envelope. Total: never fails.
///
/// Priority order: a mapping carrying a preformatted `hierarchy` display
/// block passes that block through verbatim; a bare string passes through
/// verbatim; anything else is pretty-printed as JSON.
pub fn normalize(raw: Value) -> Envelope {
    if let Some(hierarchy) = raw.get("hierarchy").and_then(Value::as_str) {
        return Envelope::text(hierarchy);
    }
    match raw {
        Value::String(text) => Envelope::text(text),
        other => {
            let text =
                serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string());
            Envelope::text(text)
        }
    }
}
