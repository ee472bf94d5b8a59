use funcloop_core::{ConversationError, FunctionSpec};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

pub const NAME: &str = "get_clothing_recommendations";

/// Readings strictly below this get the warm recommendation.
const WARM_BELOW: f64 = 60.0;

pub fn spec() -> FunctionSpec {
    FunctionSpec::new(
        NAME,
        "Get clothing recommendation based on temperature",
        json!({
            "type": "object",
            "properties": {
                "temperature": {
                    "type": "string",
                    "description": "The current temperature"
                }
            },
            "required": ["temperature"]
        }),
    )
}

#[derive(Debug, Deserialize)]
struct ClothingArgs {
    temperature: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub recommendation: String,
}

pub fn get_clothing_recommendations(temperature: f64) -> Recommendation {
    let recommendation = if temperature < WARM_BELOW {
        "warm clothing colourful"
    } else {
        "light clothing tye-dye"
    };
    Recommendation {
        recommendation: recommendation.to_string(),
    }
}

/// Accepts the temperature as a JSON number or a numeric string, optionally
/// followed by a unit ("30", " 72.5 ", "30°F", "12 C").
fn parse_temperature(value: &Value) -> Result<f64, ConversationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    };
    parsed.filter(|t| t.is_finite()).ok_or_else(|| {
        ConversationError::argument_parse(NAME, format!("temperature {value} is not numeric"))
    })
}

/// The number at the start of `s`; whatever follows must contain no digits.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(end);
    if suffix.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

pub(crate) fn invoke(raw_arguments: &str) -> Result<String, ConversationError> {
    let args: ClothingArgs = serde_json::from_str(raw_arguments)
        .map_err(|e| ConversationError::argument_parse(NAME, e))?;
    let shown = match &args.temperature {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    info!("Called get_clothing_recommendations with temperature: {}", shown);

    let temperature = parse_temperature(&args.temperature)?;
    let recommendation = get_clothing_recommendations(temperature);
    serde_json::to_string(&recommendation)
        .map_err(|e| ConversationError::Protocol(format!("failed to encode {NAME} result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_boundary_at_sixty() {
        assert_eq!(
            get_clothing_recommendations(59.0).recommendation,
            "warm clothing colourful"
        );
        assert_eq!(
            get_clothing_recommendations(60.0).recommendation,
            "light clothing tye-dye"
        );
        assert_eq!(
            get_clothing_recommendations(61.0).recommendation,
            "light clothing tye-dye"
        );
    }

    #[test]
    fn test_string_and_number_temperatures() {
        assert_eq!(
            invoke(r#"{"temperature":"30"}"#).unwrap(),
            r#"{"recommendation":"warm clothing colourful"}"#
        );
        assert_eq!(
            invoke(r#"{"temperature":75}"#).unwrap(),
            r#"{"recommendation":"light clothing tye-dye"}"#
        );
        assert_eq!(
            invoke(r#"{"temperature":" 60 "}"#).unwrap(),
            r#"{"recommendation":"light clothing tye-dye"}"#
        );
    }

    #[test]
    fn test_temperature_with_unit_suffix() {
        assert_eq!(
            invoke(r#"{"temperature":"30°F"}"#).unwrap(),
            r#"{"recommendation":"warm clothing colourful"}"#
        );
        assert_eq!(
            invoke(r#"{"temperature":"72.5 F"}"#).unwrap(),
            r#"{"recommendation":"light clothing tye-dye"}"#
        );
        assert_eq!(
            invoke(r#"{"temperature":"-4 degrees"}"#).unwrap(),
            r#"{"recommendation":"warm clothing colourful"}"#
        );
    }

    #[test]
    fn test_non_numeric_temperature() {
        let err = invoke(r#"{"temperature":"chilly"}"#).unwrap_err();
        assert!(matches!(err, ConversationError::ArgumentParse { .. }));

        let err = invoke(r#"{"temperature":"30 to 40"}"#).unwrap_err();
        assert!(matches!(err, ConversationError::ArgumentParse { .. }));

        let err = invoke(r#"{"temperature":null}"#).unwrap_err();
        assert!(matches!(err, ConversationError::ArgumentParse { .. }));
    }

    #[test]
    #[traced_test]
    fn test_logs_call() {
        invoke(r#"{"temperature":"30"}"#).unwrap();
        assert!(logs_contain(
            "Called get_clothing_recommendations with temperature: 30"
        ));
    }
}
