mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use funcloop_agent::ConversationRunner;
use funcloop_core::{Completion, ModelClient};
use funcloop_provider::{OpenAiClient, ScriptedClient};
use funcloop_tools::FunctionRegistry;

use config::{parse_timeout, Config};

const DEFAULT_PROMPT: &str =
    "What's the weather like in Boston in fahrenheit and based on the temperature what should I wear?";

#[derive(Parser)]
#[command(name = "funcloop")]
#[command(about = "Run one function-calling conversation against a chat-completion API")]
#[command(version)]
struct Cli {
    /// Initial user message
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Model identifier (overrides FUNCLOOP_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Chat-completions base URL (overrides OPENAI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Per model call timeout in seconds (overrides FUNCLOOP_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<String>,

    /// Directory for rotated JSON logs (overrides FUNCLOOP_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Replay a canned weather/clothing exchange instead of calling the API
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn apply(self, config: Config) -> Result<(Config, String, bool)> {
        let call_timeout = match self.timeout_secs.as_deref() {
            Some(raw) => Some(parse_timeout(raw)?),
            None => config.call_timeout,
        };
        let config = Config {
            model: self.model.unwrap_or(config.model),
            base_url: self.base_url.unwrap_or(config.base_url),
            log_dir: self.log_dir.or(config.log_dir),
            log_level: self.log_level.unwrap_or(config.log_level),
            call_timeout,
            ..config
        };
        Ok((config, self.prompt, self.offline))
    }
}

fn offline_client() -> ScriptedClient {
    ScriptedClient::new([
        Completion::call(
            "get_current_weather",
            r#"{"location": "Boston, MA", "unit": "fahrenheit"}"#,
        ),
        Completion::call("get_clothing_recommendations", r#"{"temperature": "30"}"#),
        Completion::answer(
            "It's 30°F, sunny and windy in Boston. Wear warm, colourful clothing.",
        ),
    ])
}

fn build_client(config: &Config, offline: bool) -> Result<Arc<dyn ModelClient>> {
    if offline {
        info!("Using offline scripted client");
        return Ok(Arc::new(offline_client()));
    }

    let mut client = OpenAiClient::new(config.api_key.clone())
        .with_base_url(&config.base_url)
        .with_model(&config.model);
    if let Some(timeout) = config.call_timeout {
        client = client.with_timeout(timeout)?;
    }
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    // OPENAI_API_KEY usually lives in ./.env; real environment variables win.
    dotenv::dotenv().ok();

    let config = Config::from_env().context("invalid environment configuration")?;
    let (config, prompt, offline) = Cli::parse().apply(config)?;

    funcloop_logging::init_logger(&config.log_level, config.log_dir.as_deref())
        .context("failed to open log directory")?;

    info!(
        model = %config.model,
        base_url = %config.base_url,
        api_key_set = config.api_key.is_some(),
        offline,
        "Starting funcloop"
    );

    let client = build_client(&config, offline)?;
    let mut runner = ConversationRunner::new(client, Arc::new(FunctionRegistry::builtin()));
    if let Some(timeout) = config.call_timeout {
        runner = runner.with_call_timeout(timeout);
    }

    let result = match runner.run(prompt).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Conversation aborted");
            return Err(e).context("conversation failed");
        }
    };

    info!(
        run_id = %result.run_id,
        model_calls = result.model_calls,
        executed = ?result.executed,
        "Conversation complete"
    );
    println!("{}", result.content.as_deref().unwrap_or_default());

    Ok(())
}
