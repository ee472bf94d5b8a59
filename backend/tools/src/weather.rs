use funcloop_core::{ConversationError, FunctionSpec};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub const NAME: &str = "get_current_weather";
pub const DEFAULT_UNIT: &str = "fahrenheit";

pub fn spec() -> FunctionSpec {
    FunctionSpec::new(
        NAME,
        "Get the current weather in a given location",
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"]
                }
            },
            "required": ["location"]
        }),
    )
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub unit: String,
    pub forecast: Vec<String>,
}

/// Simulated reading; always 30 degrees, sunny and windy.
pub fn get_current_weather(location: &str, unit: Option<&str>) -> WeatherReport {
    let unit = unit.unwrap_or(DEFAULT_UNIT);
    info!(
        "Called get_current_weather with location: {} and unit: {}",
        location, unit
    );

    WeatherReport {
        location: location.to_string(),
        temperature: "30".to_string(),
        unit: unit.to_string(),
        forecast: vec!["sunny".to_string(), "windy".to_string()],
    }
}

pub(crate) fn invoke(raw_arguments: &str) -> Result<String, ConversationError> {
    let args: WeatherArgs = serde_json::from_str(raw_arguments)
        .map_err(|e| ConversationError::argument_parse(NAME, e))?;
    let report = get_current_weather(&args.location, args.unit.as_deref());
    serde_json::to_string(&report)
        .map_err(|e| ConversationError::Protocol(format!("failed to encode {NAME} result: {e}")))
}
