//! Transcript of one conversation run.

use funcloop_core::{FunctionCallRequest, Message};

/// Ordered, append-only message history sent to the model on every call.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// A transcript holding exactly the initial user prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Record a completed dispatch: the assistant's request, then its output.
    pub fn record_function_call(&mut self, call: FunctionCallRequest, output: String) {
        let name = call.name.clone();
        self.append(Message::function_call(call));
        self.append(Message::function_result(name, output));
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
