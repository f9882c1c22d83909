//! Conversation protocol types and the backend trait.

pub mod errors;
pub mod types;

pub use errors::ModelError;
pub use types::{
    Backend, ModelReply, ModelRequest, ModelResponse, ToolCall, ToolOutcome, ToolResult, Turn,
    Usage,
};
