use std::fmt;
use std::time::Duration;

pub mod aggregator;
pub mod digest;
pub mod extractor;
pub mod fallback;
pub mod providers;
pub mod validation;

pub use aggregator::{Collected, NewsAggregator};
pub use digest::{format_digest, parse_digest};
pub use extractor::{ContentExtractor, ExtractedArticle};
pub use validation::{check_topic, is_valid_topic, validate_topics, TopicIssue};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub news_api_base_url: Option<String>,
    pub gnews_api_key: Option<String>,
    pub gnews_base_url: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news_api_base_url: None,
            gnews_api_key: None,
            gnews_base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("news_api_key", &self.news_api_key.as_deref().map(|_| "<redacted>"))
            .field("news_api_base_url", &self.news_api_base_url)
            .field("gnews_api_key", &self.gnews_api_key.as_deref().map(|_| "<redacted>"))
            .field("gnews_base_url", &self.gnews_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub mod prelude {
    pub use super::{Config, ContentExtractor, NewsAggregator};
    pub use dd_core::{Article, DigestRequest, DigestResponse, Error, Result, TopicCard};
}
