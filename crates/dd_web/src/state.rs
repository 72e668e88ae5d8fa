use std::fmt;
use std::time::Duration;
use dd_core::Result;
use dd_inference::SummarizationPipeline;
use dd_news::{ContentExtractor, NewsAggregator};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Hides error details in responses.
    pub production: bool,
    pub fetch_timeout: Duration,
    pub inference: dd_inference::Config,
    pub news: dd_news::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            production: false,
            fetch_timeout: Duration::from_secs(10),
            inference: dd_inference::Config::default(),
            news: dd_news::Config::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("production", &self.production)
            .field("inference", &self.inference)
            .field("news", &self.news)
            .finish()
    }
}

pub struct AppState {
    pub pipeline: SummarizationPipeline,
    pub aggregator: NewsAggregator,
    pub extractor: ContentExtractor,
    pub production: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let state = Self {
            pipeline: SummarizationPipeline::from_config(&config.inference)?,
            aggregator: NewsAggregator::from_config(&config.news)?,
            extractor: ContentExtractor::new(config.fetch_timeout)?,
            production: config.production,
        };
        tracing::info!(
            summarizers = ?state.pipeline.provider_names(),
            news = ?state.aggregator.provider_names(),
            production = state.production,
            "application state ready"
        );
        Ok(state)
    }
}
