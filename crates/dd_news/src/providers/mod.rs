use std::sync::Arc;
use chrono::DateTime;
use dd_core::{Article, NewsProvider, Result};
use crate::Config;

pub mod gnews;
pub mod newsapi;

pub use gnews::GNewsProvider;
pub use newsapi::NewsApiProvider;

/// Parses an RFC 3339 timestamp from a provider payload; bad values read as missing.
pub(crate) fn parse_published(value: Option<&str>) -> Option<DateTime<chrono::Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

pub(crate) fn untitled() -> String {
    "No title available".to_string()
}

pub(crate) fn unknown_source() -> String {
    "Unknown source".to_string()
}

fn configured(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Builds the news providers that have API keys, NewsAPI first.
pub fn create_news_providers(config: &Config) -> Result<Vec<Arc<dyn NewsProvider>>> {
    let mut providers: Vec<Arc<dyn NewsProvider>> = Vec::new();

    if let Some(key) = configured(&config.news_api_key) {
        providers.push(Arc::new(NewsApiProvider::new(
            key.to_string(),
            config.news_api_base_url.clone(),
            config.timeout,
        )?));
    } else {
        tracing::debug!("NEWS_API_KEY not set; skipping NewsAPI");
    }

    if let Some(key) = configured(&config.gnews_api_key) {
        providers.push(Arc::new(GNewsProvider::new(
            key.to_string(),
            config.gnews_base_url.clone(),
            config.timeout,
        )?));
    } else {
        tracing::debug!("GNEWS_API_KEY not set; skipping GNews");
    }

    Ok(providers)
}

/// Article fields shared by both providers' wire formats.
pub(crate) fn into_article(
    title: Option<String>,
    description: Option<String>,
    source: Option<String>,
    published_at: Option<&str>,
    url: Option<String>,
    content: Option<String>,
) -> Article {
    Article {
        title: title.unwrap_or_else(untitled),
        description: description.filter(|d| !d.trim().is_empty()),
        source: source.unwrap_or_else(unknown_source),
        published_at: parse_published(published_at),
        url,
        content,
    }
}
