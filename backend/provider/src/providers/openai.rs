use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use funcloop_core::{Completion, ConversationError, FunctionSpec, Message, ModelClient};
use funcloop_logging::redact_sensitive_data;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0613";

/// Longest slice of an error body kept in a transport error.
const MAX_ERROR_BODY: usize = 512;

/// OpenAI-compatible chat-completions client using the `functions` calling API.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Without an API key no `Authorization` header is sent, and the endpoint's
    /// rejection surfaces as a transport error on the first call.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound every HTTP round-trip, connect included.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConversationError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConversationError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "no_functions")]
    functions: &'a [FunctionSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<&'static str>,
}

fn no_functions(functions: &&[FunctionSpec]) -> bool {
    functions.is_empty()
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

fn transport_error(err: reqwest::Error) -> ConversationError {
    if err.is_timeout() {
        ConversationError::Transport(format!("request timed out: {err}"))
    } else {
        ConversationError::Transport(format!("HTTP request failed: {err}"))
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        transcript: &[Message],
        functions: &[FunctionSpec],
    ) -> Result<Completion, ConversationError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: transcript,
            functions,
            function_call: (!functions.is_empty()).then_some("auto"),
        };

        debug!(
            model = %self.model,
            messages = transcript.len(),
            functions = functions.len(),
            "Sending chat completion request"
        );

        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            let detail = redact_sensitive_data(truncate(&text));
            return Err(ConversationError::Transport(format!(
                "endpoint returned {status}: {detail}"
            )));
        }

        let chat_response: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            ConversationError::Protocol(format!("failed to decode chat completion: {e}"))
        })?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ConversationError::Protocol("response has no choices".to_string()))?;

        let completion = Completion::from_message(choice.message, choice.finish_reason)?;

        info!(
            model = %self.model,
            finish_reason = completion.finish_reason.as_deref().unwrap_or("none"),
            function_call = completion.function_call.as_ref().map(|c| c.name.as_str()),
            tokens = chat_response.usage.and_then(|u| u.total_tokens).unwrap_or(0),
            latency_ms = start.elapsed().as_millis() as u64,
            "Chat completion received"
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenAiClient::new(None).with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let client = OpenAiClient::new(Some(String::new()));
        assert!(client.api_key.is_none());
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_truncate_error_body() {
        let body = "x".repeat(MAX_ERROR_BODY + 100);
        assert_eq!(truncate(&body).len(), MAX_ERROR_BODY);
        assert_eq!(truncate("short"), "short");
    }
}
