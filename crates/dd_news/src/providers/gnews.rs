use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use dd_core::{Article, Error, NewsProvider, Result};
use super::into_article;

const DEFAULT_BASE_URL: &str = "https://gnews.io";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
    // an array of strings or an object keyed by field
    #[serde(default)]
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    name: Option<String>,
}

fn describe_errors(errors: &Value) -> Option<String> {
    match errors {
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| item.as_str().map(String::from).unwrap_or_else(|| item.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Object(map) if !map.is_empty() => Some(
            map.values()
                .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Client for the GNews search endpoint.
pub struct GNewsProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GNewsProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("GNews API key is required".to_string()));
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

impl fmt::Debug for GNewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GNewsProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NewsProvider for GNewsProvider {
    fn name(&self) -> &str {
        "GNews"
    }

    async fn search(&self, topic: &str, from: NaiveDate) -> Result<Vec<Article>> {
        let from = from.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(format!("{}/api/v4/search", self.base_url))
            .query(&[
                ("q", topic),
                ("from", from.as_str()),
                ("sortby", "publishedAt"),
                ("lang", "en"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::provider(self.name(), e.to_string()))?;

        let status = response.status();
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(self.name(), e.to_string()))?;

        if let Some(message) = body.errors.as_ref().and_then(describe_errors) {
            return Err(Error::provider(self.name(), message));
        }
        if !status.is_success() {
            return Err(Error::provider(self.name(), format!("HTTP {}", status)));
        }

        Ok(body
            .articles
            .into_iter()
            .map(|a| {
                into_article(
                    a.title,
                    a.description,
                    a.source.and_then(|s| s.name),
                    a.published_at.as_deref(),
                    a.url,
                    a.content,
                )
            })
            .collect())
    }
}
