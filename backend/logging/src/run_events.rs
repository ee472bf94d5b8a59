//! Run Event Log
//!
//! One structured record per loop milestone, emitted on the `run_events`
//! tracing target so it lands in the JSON file layer alongside ordinary logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    ModelCall {
        call_index: usize,
        messages: usize,
    },
    FunctionCall {
        function: String,
        arguments_json: String,
    },
    FunctionResult {
        function: String,
        output_json: String,
    },
    /// A repeated request for an already executed function ended dispatch.
    LoopGuard {
        function: String,
    },
    Finished {
        model_calls: usize,
        functions_executed: usize,
    },
    Error {
        kind: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct RunEventEntry {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: RunEvent,
}

pub struct RunEventLogger;

impl RunEventLogger {
    /// Redact the event's free-text fields and hand it to `tracing`.
    pub fn log_event(run_id: Uuid, event: RunEvent) -> RunEventEntry {
        let entry = RunEventEntry {
            run_id,
            timestamp: Utc::now(),
            event: redact_event(event),
        };

        let payload = serde_json::to_string(&entry).unwrap_or_else(|e| e.to_string());
        info!(target: "run_events", run_id = %run_id, event = %payload, "Run event");
        entry
    }
}

fn redact_event(mut event: RunEvent) -> RunEvent {
    match &mut event {
        RunEvent::FunctionCall { arguments_json, .. } => {
            *arguments_json = redact_sensitive_data(arguments_json);
        }
        RunEvent::FunctionResult { output_json, .. } => {
            *output_json = redact_sensitive_data(output_json);
        }
        RunEvent::Error { error_msg, .. } => {
            *error_msg = redact_sensitive_data(error_msg);
        }
        RunEvent::ModelCall { .. } | RunEvent::LoopGuard { .. } | RunEvent::Finished { .. } => {}
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_error_event_is_redacted() {
        let entry = RunEventLogger::log_event(
            Uuid::new_v4(),
            RunEvent::Error {
                kind: "transport".into(),
                error_msg: "401 for Bearer abc.def.ghi".into(),
            },
        );
        match entry.event {
            RunEvent::Error { error_msg, .. } => assert_eq!(error_msg, "401 for [REDACTED_TOKEN]"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    #[traced_test]
    fn test_event_serialized_with_tag() {
        let run_id = Uuid::new_v4();
        RunEventLogger::log_event(
            run_id,
            RunEvent::LoopGuard {
                function: "get_current_weather".into(),
            },
        );
        assert!(logs_contain("loop_guard"));
        assert!(logs_contain(&run_id.to_string()));
    }
}
