use std::fmt;
use std::time::Duration;

pub mod bullets;
pub mod pipeline;
pub mod providers;

pub use pipeline::SummarizationPipeline;
pub use providers::create_hosted_providers;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: None,
            openai_base_url: None,
            anthropic_api_key: None,
            anthropic_model: None,
            anthropic_base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &self.openai_api_key.as_deref().map(|_| "<redacted>"))
            .field("openai_model", &self.openai_model)
            .field("anthropic_api_key", &self.anthropic_api_key.as_deref().map(|_| "<redacted>"))
            .field("anthropic_model", &self.anthropic_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::SummarizationPipeline;
    pub use dd_core::{Error, Result, SummaryRequest, SummaryResponse};
}
