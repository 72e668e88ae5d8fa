use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;
use dd_core::{DigestRequest, SummaryRequest, TopicCard, DEFAULT_TIMEFRAME};
use dd_news::parse_digest;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeArticleBody {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeArticleResponse {
    pub title: String,
    pub summary: Vec<String>,
    pub success: bool,
    pub content_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct DigestBody {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DigestReply {
    pub content: String,
    pub sources: Vec<String>,
    pub cards: Vec<TopicCard>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn summarize_article(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SummarizeArticleBody>, JsonRejection>,
) -> Result<Json<SummarizeArticleResponse>, ApiError> {
    let Json(body) = body?;
    let url = body
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;
    if Url::parse(&url).is_err() {
        return Err(ApiError::bad_request("Invalid URL format"));
    }

    let article = state
        .extractor
        .extract(&url)
        .await
        .map_err(|e| ApiError::from_error(e, state.production))?;

    let response = state
        .pipeline
        .summarize(&SummaryRequest::new(article.content.as_str(), article.title.as_str()))
        .await;

    Ok(Json(SummarizeArticleResponse {
        title: article.title,
        summary: response.summary,
        success: true,
        content_length: article.content.chars().count(),
    }))
}

pub async fn digest(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<DigestBody>, JsonRejection>,
) -> Result<Json<DigestReply>, ApiError> {
    let Json(body) = body?;
    if body.topics.is_empty() {
        return Err(ApiError::bad_request("Please provide at least one topic"));
    }

    let request = DigestRequest::new(body.topics)
        .with_timeframe(body.timeframe.unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string()));
    let digest = state
        .aggregator
        .aggregate(&request)
        .await
        .map_err(|e| ApiError::from_error(e, state.production))?;

    let cards = parse_digest(&digest.content);
    Ok(Json(DigestReply {
        content: digest.content,
        sources: digest.sources,
        cards,
    }))
}
