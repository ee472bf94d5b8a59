//! Core conversation loop.
//!
//! Alternates between model calls and local function dispatch until the model
//! stops asking for functions, then issues one final confirmation call.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use funcloop_core::{Completion, ConversationError, FunctionCallRequest, Message, ModelClient};
use funcloop_logging::{RunEvent, RunEventLogger};
use funcloop_tools::{FunctionExecutor, FunctionRegistry};

use crate::conversation::Conversation;
use crate::executed_set::ExecutedSet;

/// Where a run currently is.
#[derive(Debug)]
pub enum LoopState {
    /// Next step is a model call with the current transcript.
    AwaitingModel,
    /// The model asked for a function that has not run yet.
    DispatchingFunction(FunctionCallRequest),
    /// Final content from the confirmation call.
    Done(Option<String>),
    Failed(ConversationError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ConversationResult {
    pub run_id: Uuid,
    /// Content of the final assistant message; `None` if the model sent none.
    pub content: Option<String>,
    pub transcript: Vec<Message>,
    /// Executed function names, in dispatch order.
    pub executed: Vec<String>,
    pub model_calls: usize,
}

/// Per-run state. Never shared between runs.
struct ConversationRun {
    run_id: Uuid,
    conversation: Conversation,
    executed: ExecutedSet,
    model_calls: usize,
}

impl ConversationRun {
    fn new(prompt: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            conversation: Conversation::new(prompt),
            executed: ExecutedSet::new(),
            model_calls: 0,
        }
    }

    fn event(&self, event: RunEvent) {
        RunEventLogger::log_event(self.run_id, event);
    }

    fn finish(self, content: Option<String>) -> ConversationResult {
        ConversationResult {
            run_id: self.run_id,
            content,
            executed: self.executed.names().to_vec(),
            model_calls: self.model_calls,
            transcript: self.conversation.into_messages(),
        }
    }
}

/// Drives function-calling conversations against one model client.
///
/// The runner itself holds only read-only collaborators, so a single instance
/// may serve many concurrent runs.
pub struct ConversationRunner {
    client: Arc<dyn ModelClient>,
    executor: FunctionExecutor,
    call_timeout: Option<Duration>,
}

impl ConversationRunner {
    pub fn new(client: Arc<dyn ModelClient>, registry: Arc<FunctionRegistry>) -> Self {
        Self {
            client,
            executor: FunctionExecutor::new(registry),
            call_timeout: None,
        }
    }

    /// Bound each model call; expiry fails the run with a transport error.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Run one conversation starting from `prompt` until `Done` or `Failed`.
    pub async fn run(
        &self,
        prompt: impl Into<String>,
    ) -> Result<ConversationResult, ConversationError> {
        let run = ConversationRun::new(prompt.into());
        let span = info_span!("conversation", run_id = %run.run_id, client = self.client.name());
        self.drive(run).instrument(span).await
    }

    async fn drive(&self, mut run: ConversationRun) -> Result<ConversationResult, ConversationError> {
        info!("Starting conversation");

        let mut state = LoopState::AwaitingModel;
        loop {
            state = match state {
                LoopState::AwaitingModel => self.await_model(&mut run).await,
                LoopState::DispatchingFunction(call) => self.dispatch(&mut run, call),
                LoopState::Done(content) => {
                    info!(
                        model_calls = run.model_calls,
                        functions_executed = run.executed.len(),
                        "Conversation finished"
                    );
                    run.event(RunEvent::Finished {
                        model_calls: run.model_calls,
                        functions_executed: run.executed.len(),
                    });
                    return Ok(run.finish(content));
                }
                LoopState::Failed(err) => {
                    error!(kind = err.kind(), error = %err, "Conversation failed");
                    run.event(RunEvent::Error {
                        kind: err.kind().to_string(),
                        error_msg: err.to_string(),
                    });
                    return Err(err);
                }
            };
        }
    }

    async fn await_model(&self, run: &mut ConversationRun) -> LoopState {
        let completion = match self.complete(run).await {
            Ok(completion) => completion,
            Err(err) => return LoopState::Failed(err),
        };

        let Some(call) = completion.requested_call() else {
            debug!(
                finish_reason = completion.finish_reason.as_deref().unwrap_or("none"),
                "Model requested no function"
            );
            return self.confirm(run).await;
        };

        if run.executed.contains(&call.name) {
            warn!(function = %call.name, "Function already executed in this run, ending dispatch");
            run.event(RunEvent::LoopGuard {
                function: call.name.clone(),
            });
            return self.confirm(run).await;
        }

        LoopState::DispatchingFunction(call.clone())
    }

    fn dispatch(&self, run: &mut ConversationRun, call: FunctionCallRequest) -> LoopState {
        run.event(RunEvent::FunctionCall {
            function: call.name.clone(),
            arguments_json: call.arguments.clone(),
        });

        let output = match self.executor.execute_call(&call) {
            Ok(output) => output,
            Err(err) => return LoopState::Failed(err),
        };

        info!(function = %call.name, "Function executed");
        run.event(RunEvent::FunctionResult {
            function: call.name.clone(),
            output_json: output.clone(),
        });
        run.executed.insert(&call.name);
        run.conversation.record_function_call(call, output);
        LoopState::AwaitingModel
    }

    /// The confirmation call made once dispatch has ended. The transcript is
    /// the same one the previous call saw.
    async fn confirm(&self, run: &mut ConversationRun) -> LoopState {
        match self.complete(run).await {
            Ok(completion) => LoopState::Done(completion.content),
            Err(err) => LoopState::Failed(err),
        }
    }

    async fn complete(&self, run: &mut ConversationRun) -> Result<Completion, ConversationError> {
        run.model_calls += 1;
        run.event(RunEvent::ModelCall {
            call_index: run.model_calls,
            messages: run.conversation.len(),
        });
        debug!(
            call_index = run.model_calls,
            messages = run.conversation.len(),
            "Calling model"
        );

        let request = self.client.complete(
            run.conversation.snapshot(),
            self.executor.registry().catalog(),
        );
        match self.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, request)
                .await
                .map_err(|_| {
                    ConversationError::Transport(format!("model call timed out after {timeout:?}"))
                })?,
            None => request.await,
        }
    }
}
