use std::sync::Arc;
use dd_core::{take_chars, Result, SummaryProvider, SummaryRequest};
use crate::Config;

pub mod anthropic;
pub mod local;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use local::LocalHeuristicProvider;
pub use openai::OpenAiProvider;

/// Characters of article body sent to a hosted model.
pub const HOSTED_CONTENT_LIMIT: usize = 3000;

pub(crate) fn system_prompt(max_points: usize) -> String {
    format!(
        "You are a helpful assistant that summarizes articles in exactly {n} bullet points with key takeaways. \
         Always respond with exactly {n} bullet points, no more, no less.",
        n = max_points
    )
}

pub(crate) fn user_prompt(request: &SummaryRequest) -> String {
    format!(
        "Summarize the following article in exactly {} bullet points with key takeaways:\n\nTitle: {}\n\nContent: {}",
        request.max_points,
        request.title,
        take_chars(&request.content, HOSTED_CONTENT_LIMIT)
    )
}

fn configured(key: &Option<String>) -> Option<&str> {
    key.as_deref().map(str::trim).filter(|k| !k.is_empty())
}

/// Builds the hosted providers that have credentials, in priority order.
pub fn create_hosted_providers(config: &Config) -> Result<Vec<Arc<dyn SummaryProvider>>> {
    let mut providers: Vec<Arc<dyn SummaryProvider>> = Vec::new();

    if let Some(key) = configured(&config.openai_api_key) {
        providers.push(Arc::new(OpenAiProvider::new(
            key.to_string(),
            config.openai_model.clone(),
            config.openai_base_url.clone(),
            config.timeout,
        )?));
    }

    if let Some(key) = configured(&config.anthropic_api_key) {
        providers.push(Arc::new(AnthropicProvider::new(
            key.to_string(),
            config.anthropic_model.clone(),
            config.anthropic_base_url.clone(),
            config.timeout,
        )?));
    }

    Ok(providers)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_keyed_providers_are_created() {
        let config = Config::default();
        assert!(create_hosted_providers(&config).unwrap().is_empty());

        let config = Config {
            openai_api_key: Some("   ".to_string()),
            anthropic_api_key: Some("sk-ant".to_string()),
            ..Config::default()
        };
        let providers = create_hosted_providers(&config).unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name(), "Anthropic");

        let config = Config {
            openai_api_key: Some("sk-openai".to_string()),
            anthropic_api_key: Some("sk-ant".to_string()),
            ..Config::default()
        };
        let names: Vec<String> = create_hosted_providers(&config)
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["OpenAI", "Anthropic"]);
    }

    #[test]
    fn test_user_prompt_truncates_content() {
        let request = SummaryRequest::new("x".repeat(5000), "Title");
        let prompt = user_prompt(&request);
        assert!(prompt.contains("Title: Title"));
        assert!(prompt.ends_with(&"x".repeat(HOSTED_CONTENT_LIMIT)));
        assert!(!prompt.contains(&"x".repeat(HOSTED_CONTENT_LIMIT + 1)));
    }
}
