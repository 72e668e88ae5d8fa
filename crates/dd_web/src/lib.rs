use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, Config};

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/summarize-article", post(handlers::summarize_article))
        .route("/digest", post(handlers::digest))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `config.bind_addr` and serves until the process is stopped.
pub async fn serve(config: &Config) -> dd_core::Result<()> {
    let state = AppState::from_config(config)?;
    let app = create_app(state).await;
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use dd_core::{Error, Result};
    pub use crate::{AppState, Config};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Html,
    };
    use dd_inference::SummarizationPipeline;
    use dd_news::{ContentExtractor, NewsAggregator};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn state(production: bool) -> AppState {
        AppState {
            pipeline: SummarizationPipeline::new(Vec::new()),
            aggregator: NewsAggregator::new(Vec::new()),
            extractor: ContentExtractor::new(Duration::from_secs(5)).unwrap(),
            production,
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn serve_page(html: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new()
            .route("/article", get(move || async move { Html(html) }))
            .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_app(state(false)).await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_summarize_rejects_missing_and_invalid_urls() {
        let (status, body) = post_json(create_app(state(false)).await, "/summarize-article", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");

        let (status, body) =
            post_json(create_app(state(false)).await, "/summarize-article", json!({ "url": "nope" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid URL format");
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_json_bad_requests() {
        let (status, body) =
            post_json(create_app(state(false)).await, "/summarize-article", json!({ "url": 42 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

        let (status, body) =
            post_json(create_app(state(false)).await, "/digest", json!({ "topics": "Space" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let response = create_app(state(false))
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/summarize-article")
                    .body(Body::from(r#"{"url":"https://example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_summarize_article_end_to_end() {
        let paragraph = "Researchers found that the new battery design doubles storage capacity. ".repeat(5);
        let base = serve_page(format!(
            "<html><head><title>Battery breakthrough</title></head><body><p>{}</p></body></html>",
            paragraph
        ))
        .await;

        let (status, body) = post_json(
            create_app(state(false)).await,
            "/summarize-article",
            json!({ "url": format!("{}/article", base) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Battery breakthrough");
        assert_eq!(body["success"], true);
        assert_eq!(body["summary"].as_array().unwrap().len(), 5);
        assert!(body["contentLength"].as_u64().unwrap() >= 200);
    }

    #[tokio::test]
    async fn test_summarize_short_page_is_bad_request() {
        let base = serve_page("<html><body><p>Tiny.</p></body></html>".to_string()).await;
        let (status, body) = post_json(
            create_app(state(false)).await,
            "/summarize-article",
            json!({ "url": format!("{}/article", base) }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Could not extract sufficient content from the article. Please try a different URL."
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_details_depend_on_environment() {
        let base = serve_page(String::new()).await;
        let url = json!({ "url": format!("{}/down", base) });

        let (status, body) = post_json(create_app(state(false)).await, "/summarize-article", url.clone()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to fetch article: 503"));
        assert!(body.get("details").is_some());

        let (status, body) = post_json(create_app(state(true)).await, "/summarize-article", url).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_digest_returns_content_sources_and_cards() {
        let (status, body) = post_json(
            create_app(state(false)).await,
            "/digest",
            json!({ "topics": ["Ethereum"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sources"], json!(["Fallback News"]));
        assert!(body["content"].as_str().unwrap().contains("Timeframe: Last 24 hours"));
        assert_eq!(body["cards"][0]["topic"], "ETHEREUM");
        assert_eq!(body["cards"][0]["articles"].as_array().unwrap().len(), 3);
        assert_eq!(body["cards"][0]["color"], "ethereum");
    }

    #[tokio::test]
    async fn test_digest_rejects_bad_topics() {
        let (status, body) =
            post_json(create_app(state(false)).await, "/digest", json!({ "topics": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide at least one topic");

        let (status, body) = post_json(
            create_app(state(false)).await,
            "/digest",
            json!({ "topics": ["Space", "12345"] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid topics detected: 12345. Please enter valid topic names."
        );
    }
}
