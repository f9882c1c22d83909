//! Session management and the tool-calling loop.

use crate::event::{EventSink, NullSink, SessionEvent};
use crate::model::{
    Backend, ModelError, ModelRequest, ModelResponse, ToolCall, ToolOutcome, ToolResult, Turn,
};
use crate::{Error, History, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tools::{Registry, ToolError, ToolSpec};
use tracing::{debug, warn};
use uuid::Uuid;

/// A unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for tool execution hosts.
///
/// This is the boundary between the loop and side effects: the loop asks
/// for the declared specs on every model call and hands each requested
/// invocation here.
pub trait ToolHost: Send + Sync {
    /// Declared tool specs, sent verbatim to the model.
    fn specs(&self) -> &[ToolSpec];

    /// Execute one requested invocation.
    fn execute(
        &self,
        name: &str,
        args: Value,
    ) -> impl Future<Output = std::result::Result<Value, ToolError>> + Send;
}

impl ToolHost for Registry {
    fn specs(&self) -> &[ToolSpec] {
        Registry::specs(self)
    }

    async fn execute(&self, name: &str, args: Value) -> std::result::Result<Value, ToolError> {
        self.dispatch(name, args).await
    }
}

/// Limits applied to each user request.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum tool rounds per user request; exceeding it fails closed.
    pub max_tool_rounds: usize,
    /// Deadline for each model call.
    pub model_timeout: Duration,
    /// Deadline for each tool dispatch.
    pub tool_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            model_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(30),
        }
    }
}

/// A conversation session.
///
/// Owns its history, busy flag, and event sink; no state is shared across
/// sessions. One request is processed at a time.
pub struct Session<B, T> {
    id: SessionId,
    backend: B,
    tools: T,
    history: History,
    system: Option<String>,
    limits: Limits,
    busy: Arc<AtomicBool>,
    sink: Box<dyn EventSink>,
}

impl<B: Backend, T: ToolHost> Session<B, T> {
    /// Create a new session over the given backend and tool host.
    pub fn new(backend: B, tools: T) -> Self {
        Self {
            id: SessionId::new(),
            backend,
            tools,
            history: History::new(),
            system: None,
            limits: Limits::default(),
            busy: Arc::new(AtomicBool::new(false)),
            sink: Box::new(NullSink),
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Override the default limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Attach an event sink for the presentation layer.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Shared handle to the busy flag, for UI affordances such as
    /// disabling input while a request is in flight.
    pub fn busy_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Send one user message and drive the loop to a final text answer.
    ///
    /// Alternates between model calls and tool dispatch until the model
    /// answers with no tool requests. Tool-level failures are fed back to
    /// the model as data; only model-call failures (or the round cap) abort
    /// the request, and then the history holds no partial turn.
    pub async fn send(&mut self, input: &str) -> Result<String> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }
        let result = self.drive(input).await;
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    async fn drive(&mut self, input: &str) -> Result<String> {
        self.sink.emit(SessionEvent::UserMessage {
            text: input.to_string(),
        });
        self.history.push(Turn::User(input.to_string()));

        let mut rounds = 0usize;
        loop {
            let response = self.call_model().await?;
            let reply = response.reply;

            if !reply.has_calls() {
                self.history.push(Turn::Model(reply.text.clone()));
                self.sink.emit(SessionEvent::ModelText {
                    text: reply.text.clone(),
                });
                return Ok(reply.text);
            }

            rounds += 1;
            if rounds > self.limits.max_tool_rounds {
                warn!(session = %self.id, rounds, "tool round cap exceeded");
                return Err(Error::TooManyToolRounds {
                    limit: self.limits.max_tool_rounds,
                });
            }

            self.history.push(Turn::ToolCalls(reply.calls.clone()));
            let results = self.run_tools(&reply.calls).await;
            self.history.push(Turn::ToolResults(results));
        }
    }

    async fn call_model(&self) -> Result<ModelResponse> {
        let request = ModelRequest {
            turns: self.history.turns(),
            system: self.system.as_deref(),
            tools: self.tools.specs(),
        };
        debug!(session = %self.id, turns = request.turns.len(), "calling model");

        match timeout(self.limits.model_timeout, self.backend.call(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::Model(ModelError::Timeout(
                self.limits.model_timeout.as_millis() as u64,
            ))),
        }
    }

    /// Dispatch each requested call in request order.
    ///
    /// Every failure (unknown tool, executor error, deadline) is captured
    /// as a failure outcome in the result batch; the batch always matches
    /// the request batch in length and name order.
    async fn run_tools(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            self.sink.emit(SessionEvent::ToolCallStarted {
                name: call.name.clone(),
                args: call.args.clone(),
            });

            let execution = self.tools.execute(&call.name, call.args.clone());
            let outcome = match timeout(self.limits.tool_timeout, execution).await {
                Ok(Ok(output)) => ToolOutcome::Success { output },
                Ok(Err(error)) => {
                    warn!(session = %self.id, tool = %call.name, %error, "tool failed");
                    ToolOutcome::Failure { error }
                }
                Err(_) => ToolOutcome::Failure {
                    error: ToolError::Timeout(self.limits.tool_timeout.as_millis() as u64),
                },
            };

            self.sink.emit(SessionEvent::ToolCallFinished {
                name: call.name.clone(),
                outcome: outcome.clone(),
            });
            results.push(ToolResult {
                name: call.name.clone(),
                outcome,
            });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelReply;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tools::ToolSpecBuilder;

    /// Backend that replays a scripted sequence of replies.
    struct ScriptedBackend {
        replies: Mutex<VecDeque<std::result::Result<ModelReply, ModelError>>>,
        busy_probe: Option<Arc<AtomicBool>>,
        observed_busy: AtomicBool,
    }

    impl ScriptedBackend {
        fn new(
            replies: impl IntoIterator<Item = std::result::Result<ModelReply, ModelError>>,
        ) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                busy_probe: None,
                observed_busy: AtomicBool::new(false),
            }
        }

        fn probing(mut self, handle: Arc<AtomicBool>) -> Self {
            self.busy_probe = Some(handle);
            self
        }
    }

    impl Backend for ScriptedBackend {
        async fn call(
            &self,
            _request: ModelRequest<'_>,
        ) -> std::result::Result<ModelResponse, ModelError> {
            if let Some(probe) = &self.busy_probe {
                self.observed_busy
                    .store(probe.load(Ordering::SeqCst), Ordering::SeqCst);
            }
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ModelReply::text("script exhausted")));
            reply.map(|reply| ModelResponse {
                reply,
                usage: Default::default(),
            })
        }
    }

    /// Tool host with three behaviors: echo, fail, and hang.
    struct TestHost {
        specs: Vec<ToolSpec>,
    }

    impl TestHost {
        fn new() -> Self {
            let specs = ["echo", "boom", "slow"]
                .iter()
                .map(|name| ToolSpecBuilder::new(*name, "test tool").build())
                .collect();
            Self { specs }
        }
    }

    impl ToolHost for TestHost {
        fn specs(&self) -> &[ToolSpec] {
            &self.specs
        }

        async fn execute(
            &self,
            name: &str,
            args: Value,
        ) -> std::result::Result<Value, ToolError> {
            match name {
                "echo" => Ok(args),
                "boom" => Err(ToolError::Execution("kaboom".into())),
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(json!({}))
                }
                other => Err(ToolError::NotFound(other.to_string())),
            }
        }
    }

    fn call(name: &str) -> ToolCall {
        ToolCall {
            name: name.into(),
            args: json!({"n": 1}),
        }
    }

    fn collecting_sink() -> (
        crate::FnSink<impl Fn(SessionEvent) + Send + Sync>,
        Arc<Mutex<Vec<SessionEvent>>>,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let collected = Arc::clone(&events);
        let sink = crate::FnSink(move |event| collected.lock().unwrap().push(event));
        (sink, events)
    }

    #[tokio::test]
    async fn terminates_after_a_single_text_reply() {
        let backend = ScriptedBackend::new([Ok(ModelReply::text("All done"))]);
        let mut session = Session::new(backend, TestHost::new());

        let answer = session.send("What time is it?").await.unwrap();

        assert_eq!(answer, "All done");
        assert_eq!(session.history().len(), 2);
        assert!(matches!(session.history().turns()[0], Turn::User(_)));
        assert!(matches!(session.history().turns()[1], Turn::Model(_)));
    }

    #[tokio::test]
    async fn result_batch_matches_request_batch_in_length_and_name_order() {
        let backend = ScriptedBackend::new([
            Ok(ModelReply::tool_calls(vec![
                call("echo"),
                call("boom"),
                call("ghost"),
            ])),
            Ok(ModelReply::text("done")),
        ]);
        let mut session = Session::new(backend, TestHost::new());

        session.send("go").await.unwrap();

        let turns = session.history().turns();
        assert_eq!(turns.len(), 4);
        let Turn::ToolCalls(calls) = &turns[1] else {
            panic!("expected tool calls turn");
        };
        let Turn::ToolResults(results) = &turns[2] else {
            panic!("expected tool results turn");
        };
        assert_eq!(results.len(), calls.len());
        for (request, result) in calls.iter().zip(results) {
            assert_eq!(request.name, result.name);
        }
        assert!(!results[0].outcome.is_failure());
        assert!(results[1].outcome.is_failure());
        assert!(results[2].outcome.is_failure());
    }

    #[tokio::test]
    async fn unknown_tool_is_fed_back_as_failure_not_fatal() {
        let backend = ScriptedBackend::new([
            Ok(ModelReply::tool_calls(vec![call("ghost")])),
            Ok(ModelReply::text("recovered")),
        ]);
        let mut session = Session::new(backend, TestHost::new());

        let answer = session.send("try it").await.unwrap();
        assert_eq!(answer, "recovered");
    }

    #[tokio::test]
    async fn model_failure_aborts_without_partial_turns() {
        let backend = ScriptedBackend::new([
            Err(ModelError::Api("500: overloaded".into())),
            Ok(ModelReply::text("second try")),
        ]);
        let mut session = Session::new(backend, TestHost::new());

        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, Error::Model(ModelError::Api(_))));
        assert_eq!(session.history().len(), 1);
        assert!(!session.is_busy());

        // The session stays usable afterwards.
        let answer = session.send("hello again").await.unwrap();
        assert_eq!(answer, "second try");
    }

    #[tokio::test]
    async fn round_cap_fails_closed_with_consistent_history() {
        let backend = ScriptedBackend::new([
            Ok(ModelReply::tool_calls(vec![call("echo")])),
            Ok(ModelReply::tool_calls(vec![call("echo")])),
            Ok(ModelReply::tool_calls(vec![call("echo")])),
        ]);
        let limits = Limits {
            max_tool_rounds: 2,
            ..Default::default()
        };
        let mut session = Session::new(backend, TestHost::new()).with_limits(limits);

        let err = session.send("loop forever").await.unwrap_err();
        assert!(matches!(err, Error::TooManyToolRounds { limit: 2 }));
        // User + two complete call/result pairs; no orphaned calls turn.
        assert_eq!(session.history().len(), 5);
        assert!(matches!(session.history().last(), Some(Turn::ToolResults(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn tool_deadline_becomes_failure_outcome() {
        let backend = ScriptedBackend::new([
            Ok(ModelReply::tool_calls(vec![call("slow")])),
            Ok(ModelReply::text("done")),
        ]);
        let mut session = Session::new(backend, TestHost::new());

        session.send("take your time").await.unwrap();

        let Some(Turn::ToolResults(results)) = session.history().turns().get(2) else {
            panic!("expected tool results turn");
        };
        assert!(matches!(
            results[0].outcome,
            ToolOutcome::Failure {
                error: ToolError::Timeout(_)
            }
        ));
    }

    #[tokio::test]
    async fn events_arrive_in_causal_order() {
        let backend = ScriptedBackend::new([
            Ok(ModelReply::tool_calls(vec![call("echo"), call("boom")])),
            Ok(ModelReply::text("done")),
        ]);
        let (sink, events) = collecting_sink();
        let mut session = Session::new(backend, TestHost::new()).with_sink(sink);

        session.send("go").await.unwrap();

        let events = events.lock().unwrap();
        let kinds: Vec<String> = events
            .iter()
            .map(|e| match e {
                SessionEvent::UserMessage { .. } => "user".into(),
                SessionEvent::ToolCallStarted { name, .. } => format!("start:{name}"),
                SessionEvent::ToolCallFinished { name, .. } => format!("finish:{name}"),
                SessionEvent::ModelText { .. } => "text".into(),
            })
            .collect();
        assert_eq!(
            kinds,
            ["user", "start:echo", "finish:echo", "start:boom", "finish:boom", "text"]
        );
    }

    #[tokio::test]
    async fn busy_flag_is_set_while_a_request_is_in_flight() {
        let backend = ScriptedBackend::new([Ok(ModelReply::text("ok"))]);
        let mut session = Session::new(backend, TestHost::new());
        let handle = session.busy_handle();

        // Re-wire the backend probe through the shared handle.
        session.backend = ScriptedBackend::new([Ok(ModelReply::text("ok"))]).probing(handle);

        session.send("hi").await.unwrap();
        assert!(session.backend.observed_busy.load(Ordering::SeqCst));
        assert!(!session.is_busy());
    }
}
