use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use dd_core::{Article, Error, NewsProvider, Result};
use super::into_article;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    source: Option<NewsApiSource>,
    published_at: Option<String>,
    url: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Client for the NewsAPI `everything` search.
pub struct NewsApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("NewsAPI key is required".to_string()));
        }
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

impl fmt::Debug for NewsApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn search(&self, topic: &str, from: NaiveDate) -> Result<Vec<Article>> {
        let from = from.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .query(&[
                ("q", topic),
                ("from", from.as_str()),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::provider(self.name(), e.to_string()))?;

        let status = response.status();
        let body: EverythingResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(self.name(), e.to_string()))?;

        if body.status.as_deref() == Some("error") || !status.is_success() {
            let message = body.message.unwrap_or_else(|| format!("HTTP {}", status));
            return Err(Error::provider(self.name(), message));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::serve;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn provider(base_url: String) -> NewsApiProvider {
        NewsApiProvider::new("news-key".to_string(), Some(base_url), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_query_and_maps_articles() {
        let router = Router::new().route(
            "/v2/everything",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params["q"], "AI Policy");
                assert_eq!(params["from"], "2024-03-01");
                assert_eq!(params["sortBy"], "publishedAt");
                assert_eq!(params["language"], "en");
                assert_eq!(params["apiKey"], "news-key");
                Json(json!({
                    "status": "ok",
                    "totalResults": 2,
                    "articles": [
                        {
                            "source": { "id": null, "name": "Reuters" },
                            "title": "EU finalizes AI policy",
                            "description": "Lawmakers agreed on the text.",
                            "url": "https://example.com/eu-ai",
                            "publishedAt": "2024-03-01T09:30:00Z",
                            "content": "Full body"
                        },
                        { "source": { "name": null }, "title": null, "publishedAt": "not a date" }
                    ]
                }))
            }),
        );
        let base_url = serve(router).await;
        let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let articles = provider(base_url).search("AI Policy", from).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "EU finalizes AI policy");
        assert_eq!(articles[0].source, "Reuters");
        assert!(articles[0].published_at.is_some());
        assert_eq!(articles[1].title, "No title available");
        assert_eq!(articles[1].source, "Unknown source");
        assert!(articles[1].published_at.is_none());
    }

    #[tokio::test]
    async fn test_error_status_payload_is_provider_error() {
        let router = Router::new().route(
            "/v2/everything",
            get(|| async {
                (
                    axum::http::StatusCode::UNAUTHORIZED,
                    Json(json!({ "status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid." })),
                )
            }),
        );
        let base_url = serve(router).await;
        let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let err = provider(base_url).search("AI", from).await.unwrap_err();
        assert_eq!(err.to_string(), "NewsAPI error: Your API key is invalid.");
    }
}
