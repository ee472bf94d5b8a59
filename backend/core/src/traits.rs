use async_trait::async_trait;

use crate::error::ConversationError;
use crate::function::FunctionSpec;
use crate::message::{FunctionCallRequest, Message};

/// Finish reason the endpoint reports when the model considers itself done.
pub const FINISH_REASON_STOP: &str = "stop";

/// Chat-completion backend used by the orchestration loop.
///
/// Implementations receive the full transcript and the full function catalog
/// on every call; nothing is diffed between calls.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Backend name (e.g., "openai", "scripted").
    fn name(&self) -> &str;

    async fn complete(
        &self,
        transcript: &[Message],
        functions: &[FunctionSpec],
    ) -> Result<Completion, ConversationError>;
}

/// The model's next assistant message plus the reported finish reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: Option<String>,
    pub function_call: Option<FunctionCallRequest>,
    pub finish_reason: Option<String>,
}

impl Completion {
    /// A plain answer that ends the conversation.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            function_call: None,
            finish_reason: Some(FINISH_REASON_STOP.to_string()),
        }
    }

    /// A request to invoke `name` with the given JSON argument string.
    pub fn call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            content: None,
            function_call: Some(FunctionCallRequest::new(name, arguments)),
            finish_reason: Some("function_call".to_string()),
        }
    }

    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }

    pub fn is_stop(&self) -> bool {
        self.finish_reason.as_deref() == Some(FINISH_REASON_STOP)
    }

    /// The function call the loop should act on, if any.
    ///
    /// A `"stop"` finish reason wins over a function call carried in the same message.
    pub fn requested_call(&self) -> Option<&FunctionCallRequest> {
        if self.is_stop() {
            return None;
        }
        self.function_call.as_ref()
    }

    /// Converts a decoded assistant message into a completion.
    pub fn from_message(
        message: Message,
        finish_reason: Option<String>,
    ) -> Result<Self, ConversationError> {
        match message {
            Message::Assistant {
                content,
                function_call,
            } => Ok(Self {
                content,
                function_call,
                finish_reason,
            }),
            other => Err(ConversationError::Protocol(format!(
                "expected an assistant message, got role '{}'",
                other.role()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_overrides_function_call() {
        let completion = Completion::call("get_current_weather", "{}").with_finish_reason("stop");
        assert!(completion.is_stop());
        assert!(completion.requested_call().is_none());

        let completion = Completion::call("get_current_weather", "{}");
        assert_eq!(
            completion.requested_call().map(|c| c.name.as_str()),
            Some("get_current_weather")
        );
    }

    #[test]
    fn test_from_message_rejects_other_roles() {
        let err = Completion::from_message(Message::user("hi"), None).unwrap_err();
        assert!(matches!(err, ConversationError::Protocol(_)));

        let completion =
            Completion::from_message(Message::assistant("ok"), Some("stop".into())).unwrap();
        assert_eq!(completion.content.as_deref(), Some("ok"));
        assert!(completion.is_stop());
    }
}
