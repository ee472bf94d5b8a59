//! Routes a model's function-call request to the matching local function.

use std::sync::Arc;

use funcloop_core::{ConversationError, FunctionCallRequest};
use tracing::debug;

use crate::registry::FunctionRegistry;

#[derive(Debug, Clone)]
pub struct FunctionExecutor {
    registry: Arc<FunctionRegistry>,
}

impl FunctionExecutor {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Run `name` with the model-supplied JSON arguments.
    ///
    /// Names outside the registry fail with `UnsupportedFunction` before the
    /// arguments are looked at; malformed arguments fail with `ArgumentParse`.
    pub fn execute(&self, name: &str, raw_arguments: &str) -> Result<String, ConversationError> {
        let function = self
            .registry
            .resolve(name)
            .ok_or_else(|| ConversationError::UnsupportedFunction(name.to_string()))?;

        debug!(function = name, "Dispatching function call");
        function.invoke(raw_arguments)
    }

    pub fn execute_call(&self, call: &FunctionCallRequest) -> Result<String, ConversationError> {
        self.execute(&call.name, &call.arguments)
    }
}

impl Default for FunctionExecutor {
    fn default() -> Self {
        Self::new(Arc::new(FunctionRegistry::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::KnownFunction;
    use serde_json::{json, Value};

    #[test]
    fn test_execute_weather() {
        let executor = FunctionExecutor::default();
        let output = executor
            .execute(
                "get_current_weather",
                r#"{"location":"Boston, MA","unit":"fahrenheit"}"#,
            )
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "location": "Boston, MA",
                "temperature": "30",
                "unit": "fahrenheit",
                "forecast": ["sunny", "windy"]
            })
        );
    }

    #[test]
    fn test_execute_clothing() {
        let executor = FunctionExecutor::default();
        let call = FunctionCallRequest::new("get_clothing_recommendations", r#"{"temperature":"59"}"#);
        assert_eq!(
            executor.execute_call(&call).unwrap(),
            r#"{"recommendation":"warm clothing colourful"}"#
        );
    }

    #[test]
    fn test_unsupported_function() {
        let executor = FunctionExecutor::default();
        let err = executor.execute("book_flight", "{}").unwrap_err();
        assert!(matches!(err, ConversationError::UnsupportedFunction(ref n) if n == "book_flight"));

        // Unknown names win over malformed arguments.
        let err = executor.execute("book_flight", "{not json").unwrap_err();
        assert!(matches!(err, ConversationError::UnsupportedFunction(_)));
    }

    #[test]
    fn test_function_outside_restricted_registry() {
        let registry = FunctionRegistry::with_functions([KnownFunction::CurrentWeather]);
        let executor = FunctionExecutor::new(Arc::new(registry));
        let err = executor
            .execute("get_clothing_recommendations", r#"{"temperature":"30"}"#)
            .unwrap_err();
        assert!(matches!(err, ConversationError::UnsupportedFunction(_)));
    }

    #[test]
    fn test_malformed_arguments() {
        let executor = FunctionExecutor::default();
        let err = executor
            .execute("get_current_weather", r#"{"location": "Boston"#)
            .unwrap_err();
        match err {
            ConversationError::ArgumentParse { function, .. } => {
                assert_eq!(function, "get_current_weather")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
