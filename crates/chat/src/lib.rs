//! Chat runtime — conversation state and the tool-calling loop.
//!
//! This crate drives a hosted LLM through repeated rounds of tool use until
//! the model produces a final textual answer.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **Session**: owns one append-only [`History`], the busy flag, and the
//!   loop that alternates between model calls and tool dispatch.
//! - **Backend**: a trait abstracting hosted-model providers; the shipped
//!   provider speaks the Gemini `generateContent` API.
//! - **ToolHost**: the boundary between the loop and tool side effects;
//!   implemented by `tools::Registry`.
//! - **EventSink**: the presentation boundary. The loop renders nothing
//!   itself; it emits [`SessionEvent`]s for a renderer to consume.
//!
//! # Example
//!
//! ```ignore
//! use chat::{GeminiBackend, Session};
//!
//! # async fn example() -> chat::Result<()> {
//! let backend = GeminiBackend::builder("AIza...", "gemini-2.0-flash").build();
//! let registry = tools::demo::registry().expect("demo registry");
//!
//! let mut session = Session::new(backend, registry)
//!     .with_system("You are a helpful assistant.");
//! let answer = session.send("What's the weather in Tokyo?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

mod error;
mod event;
mod history;
pub mod model;
mod providers;
mod session;

pub use error::{Error, Result};
pub use event::{EventSink, FnSink, NullSink, SessionEvent};
pub use history::History;
pub use model::{
    Backend, ModelError, ModelReply, ModelRequest, ModelResponse, ToolCall, ToolOutcome,
    ToolResult, Turn, Usage,
};
pub use providers::{GeminiBackend, GeminiBackendBuilder};
pub use session::{Limits, Session, SessionId, ToolHost};
