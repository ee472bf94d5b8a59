pub mod providers;

pub use providers::openai::OpenAiClient;
pub use providers::scripted::{RecordedRequest, ScriptedClient};
