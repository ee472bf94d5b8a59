use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use funcloop_core::{Completion, ConversationError, FunctionSpec, Message, ModelClient};

/// What a [`ScriptedClient`] was sent on one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub transcript: Vec<Message>,
    pub functions: Vec<FunctionSpec>,
}

#[derive(Default)]
struct Script {
    steps: VecDeque<Result<Completion, ConversationError>>,
    last: Option<Completion>,
    requests: Vec<RecordedRequest>,
}

/// A model client that replays canned completions in order.
///
/// Once the script runs out the last successful completion is repeated, so a
/// script ending in a final answer also covers any confirmation call after it.
#[derive(Default)]
pub struct ScriptedClient {
    script: Mutex<Script>,
}

impl ScriptedClient {
    pub fn new(completions: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            script: Mutex::new(Script {
                steps: completions.into_iter().map(Ok).collect(),
                ..Script::default()
            }),
        }
    }

    /// Append a failure to the end of the script.
    pub fn then_fail(self, error: ConversationError) -> Self {
        let mut script = self.script.into_inner();
        script.steps.push_back(Err(error));
        Self {
            script: Mutex::new(script),
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().await.requests.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.script.lock().await.requests.len()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        transcript: &[Message],
        functions: &[FunctionSpec],
    ) -> Result<Completion, ConversationError> {
        let mut script = self.script.lock().await;
        script.requests.push(RecordedRequest {
            transcript: transcript.to_vec(),
            functions: functions.to_vec(),
        });

        match script.steps.pop_front() {
            Some(Ok(completion)) => {
                script.last = Some(completion.clone());
                Ok(completion)
            }
            Some(Err(error)) => Err(error),
            None => script
                .last
                .clone()
                .ok_or_else(|| ConversationError::Protocol("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_then_repeats_last() {
        let client = ScriptedClient::new([
            Completion::call("get_current_weather", "{}"),
            Completion::answer("Done"),
        ]);
        let transcript = vec![Message::user("hi")];

        let first = client.complete(&transcript, &[]).await.unwrap();
        assert!(first.function_call.is_some());
        let second = client.complete(&transcript, &[]).await.unwrap();
        assert_eq!(second.content.as_deref(), Some("Done"));
        let third = client.complete(&transcript, &[]).await.unwrap();
        assert_eq!(third, second);

        assert_eq!(client.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let client = ScriptedClient::default()
            .then_fail(ConversationError::Transport("connection refused".into()));
        let err = client.complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, ConversationError::Transport(_)));

        let err = client.complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, ConversationError::Protocol(_)));
    }
}
