//! The session event stream.
//!
//! The loop emits one event per observable moment; a renderer consumes them.
//! Events never feed back into orchestration decisions.

use crate::model::ToolOutcome;
use serde_json::Value;

/// An observable moment in one session's request cycle.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user's message was accepted into the history.
    UserMessage { text: String },
    /// A requested tool call is about to be dispatched.
    ToolCallStarted { name: String, args: Value },
    /// A tool call resolved, successfully or not.
    ToolCallFinished { name: String, outcome: ToolOutcome },
    /// The model produced its final text answer.
    ModelText { text: String },
}

/// Sink for session events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// Sink that drops every event. Useful for headless use and tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: SessionEvent) {}
}

/// Events can be forwarded over a channel to a renderer task.
impl EventSink for tokio::sync::mpsc::UnboundedSender<SessionEvent> {
    fn emit(&self, event: SessionEvent) {
        let _ = self.send(event);
    }
}

/// Adapter turning a thread-safe closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn emit(&self, event: SessionEvent) {
        (self.0)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.emit(SessionEvent::UserMessage { text: "hi".into() });
        assert!(matches!(
            rx.try_recv(),
            Ok(SessionEvent::UserMessage { text }) if text == "hi"
        ));
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        // Must not panic.
        tx.emit(SessionEvent::ModelText { text: "late".into() });
    }
}
