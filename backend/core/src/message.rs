use std::fmt;

use serde::{Deserialize, Serialize};

/// A model-issued request to invoke one local function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallRequest {
    pub name: String,
    /// JSON-encoded argument object, exactly as the model produced it.
    pub arguments: String,
}

impl FunctionCallRequest {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Function,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Function => write!(f, "function"),
        }
    }
}

/// One transcript entry, serialized in chat-completions wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    User { content: String },
    Assistant {
        #[serde(default)]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        function_call: Option<FunctionCallRequest>,
    },
    /// Output of a local function, fed back to the model.
    Function { name: String, content: String },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: Some(content.into()),
            function_call: None,
        }
    }

    pub fn function_call(call: FunctionCallRequest) -> Self {
        Message::Assistant {
            content: None,
            function_call: Some(call),
        }
    }

    pub fn function_result(name: impl Into<String>, content: impl Into<String>) -> Self {
        Message::Function {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
            Message::Function { .. } => Role::Function,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Message::User { content } | Message::Function { content, .. } => Some(content.as_str()),
            Message::Assistant { content, .. } => content.as_deref(),
        }
    }

    pub fn function_call_request(&self) -> Option<&FunctionCallRequest> {
        match self {
            Message::Assistant { function_call, .. } => function_call.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let call = Message::function_call(FunctionCallRequest::new(
            "get_current_weather",
            r#"{"location":"Boston, MA"}"#,
        ));
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "role": "assistant",
                "content": null,
                "function_call": {
                    "name": "get_current_weather",
                    "arguments": "{\"location\":\"Boston, MA\"}"
                }
            })
        );

        let result = Message::function_result("get_current_weather", "{}");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"role": "function", "name": "get_current_weather", "content": "{}"})
        );
    }

    #[test]
    fn test_assistant_without_function_call() {
        let msg: Message =
            serde_json::from_value(json!({"role": "assistant", "content": "Wear a coat."})).unwrap();
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.content(), Some("Wear a coat."));
        assert!(msg.function_call_request().is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let msg: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "refusal": null,
            "function_call": {"name": "get_clothing_recommendations", "arguments": "{}"}
        }))
        .unwrap();
        assert_eq!(
            msg.function_call_request().map(|c| c.name.as_str()),
            Some("get_clothing_recommendations")
        );
        assert_eq!(msg.content(), None);
    }
}
