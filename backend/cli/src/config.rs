use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use funcloop_core::ConversationError;
use funcloop_provider::providers::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Credential for the completion endpoint. Never logged.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Per model call; `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
    /// Directory for rotated JSON logs; console only when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            call_timeout: None,
            log_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConversationError> {
        Self::from_vars(&utf8_vars(std::env::vars_os()))
    }

    /// Same as [`Config::from_env`] over an explicit variable map.
    pub fn from_vars(env: &HashMap<String, String>) -> Result<Self, ConversationError> {
        let var = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();
        let defaults = Self::default();

        let call_timeout = var("FUNCLOOP_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .transpose()?;

        Ok(Self {
            api_key: var("OPENAI_API_KEY"),
            base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            model: var("FUNCLOOP_MODEL").unwrap_or(defaults.model),
            call_timeout,
            log_dir: var("FUNCLOOP_LOG_DIR").map(PathBuf::from),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
        })
    }
}

/// Keeps the variables that are valid UTF-8; none of ours can be otherwise.
fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Whole seconds, strictly positive.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConversationError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConversationError::Config(format!(
            "timeout must be a positive number of seconds, got '{raw}'"
        ))),
    }
}
