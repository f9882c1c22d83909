use super::errors::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::future::Future;
use tools::{ToolError, ToolSpec};

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: Value,
}

/// The outcome of one tool dispatch.
///
/// A failure here is data on its way back to the model, not a fault of the
/// loop; only model-call errors escape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { output: Value },
    Failure { error: ToolError },
}

impl ToolOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The JSON payload fed back to the model for this outcome.
    ///
    /// Success output is passed through (wrapped if it isn't an object, as
    /// the wire format requires one); failures become a
    /// `{status: "failure", error}` object.
    pub fn payload(&self) -> Value {
        match self {
            Self::Success { output } if output.is_object() => output.clone(),
            Self::Success { output } => json!({ "result": output }),
            Self::Failure { error } => json!({
                "status": "failure",
                "error": error.to_string(),
            }),
        }
    }
}

/// The result returned for one tool call, keyed by name and paired
/// positionally with its request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    pub outcome: ToolOutcome,
}

/// One entry in the conversation history.
#[derive(Debug, Clone)]
pub enum Turn {
    User(String),
    Model(String),
    ToolCalls(Vec<ToolCall>),
    ToolResults(Vec<ToolResult>),
}

/// Everything needed for a model request.
#[derive(Debug, Clone)]
pub struct ModelRequest<'a> {
    pub turns: &'a [Turn],
    pub system: Option<&'a str>,
    pub tools: &'a [ToolSpec],
}

/// What the model answered: final text, or an ordered batch of tool calls.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub calls: Vec<ToolCall>,
}

impl ModelReply {
    /// A plain-text reply with no tool calls.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: Vec::new(),
        }
    }

    /// A reply consisting of tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            text: String::new(),
            calls,
        }
    }

    pub fn has_calls(&self) -> bool {
        !self.calls.is_empty()
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The response from a model.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub reply: ModelReply,
    pub usage: Usage,
}

/// Trait for hosted-model provider backends.
pub trait Backend: Send + Sync {
    fn call(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<ModelResponse, ModelError>> + Send;
}
