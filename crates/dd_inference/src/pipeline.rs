use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use dd_core::{Result, SummaryProvider, SummaryRequest, SummaryResponse};
use crate::bullets::normalize;
use crate::providers::{create_hosted_providers, LocalHeuristicProvider};
use crate::Config;

/// Tries each provider in order and stops at the first success.
///
/// The local heuristic always runs last, so `summarize` cannot fail and always
/// returns exactly `max_points` bullets.
pub struct SummarizationPipeline {
    providers: Vec<Arc<dyn SummaryProvider>>,
    local: LocalHeuristicProvider,
}

impl fmt::Debug for SummarizationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizationPipeline")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl SummarizationPipeline {
    pub fn new(providers: Vec<Arc<dyn SummaryProvider>>) -> Self {
        Self {
            providers,
            local: LocalHeuristicProvider::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(create_hosted_providers(config)?))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(self.local.name()))
            .collect()
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> SummaryResponse {
        for provider in &self.providers {
            match provider.summarize(request).await {
                Ok(response) if response.success => {
                    info!(provider = provider.name(), "summary generated");
                    return SummaryResponse::success(normalize(response.summary, request.max_points));
                }
                Ok(response) => {
                    warn!(
                        provider = provider.name(),
                        error = response.error.as_deref().unwrap_or("unknown"),
                        "summarization provider reported failure; falling through"
                    );
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "summarization provider failed; falling through");
                }
            }
        }

        debug!("using local summarization");
        let response = self.local.summarize_now(request);
        SummaryResponse::success(normalize(response.summary, request.max_points))
    }

    pub async fn summarize_text(&self, content: &str, title: &str) -> SummaryResponse {
        self.summarize(&SummaryRequest::new(content, title)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dd_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FailingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SummaryProvider for FailingProvider {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn summarize(&self, _request: &SummaryRequest) -> Result<SummaryResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::provider("Failing", "connection refused"))
        }
    }

    #[derive(Debug)]
    struct FixedProvider {
        points: Vec<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SummaryProvider for FixedProvider {
        fn name(&self) -> &str {
            "Fixed"
        }

        async fn summarize(&self, _request: &SummaryRequest) -> Result<SummaryResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SummaryResponse::success(
                self.points.iter().map(|p| p.to_string()).collect(),
            ))
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let failing = Arc::new(FailingProvider { calls: AtomicUsize::new(0) });
        let first = Arc::new(FixedProvider {
            points: vec!["• a", "• b", "• c", "• d", "• e"],
            calls: AtomicUsize::new(0),
        });
        let second = Arc::new(FixedProvider {
            points: vec!["• z"],
            calls: AtomicUsize::new(0),
        });
        let pipeline = SummarizationPipeline::new(vec![
            failing.clone(),
            first.clone(),
            second.clone(),
        ]);

        let response = pipeline.summarize_text("body", "title").await;
        assert_eq!(response.summary, vec!["• a", "• b", "• c", "• d", "• e"]);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_hosted_failures_fall_back_to_local() {
        let pipeline = SummarizationPipeline::new(vec![Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        })]);

        let response = pipeline
            .summarize(&SummaryRequest::new("", "Empty").with_max_points(4))
            .await;
        assert!(response.success);
        assert_eq!(response.summary.len(), 4);
        assert!(response.summary.iter().all(|p| p.starts_with('•')));
    }

    #[tokio::test]
    async fn test_result_always_has_requested_count() {
        let pipeline = SummarizationPipeline::new(vec![Arc::new(FixedProvider {
            points: vec!["too", "many", "points", "from", "the", "model", "here"],
            calls: AtomicUsize::new(0),
        })]);

        let response = pipeline.summarize_text("body", "title").await;
        assert_eq!(response.summary.len(), 5);
        assert!(response.summary.iter().all(|p| crate::bullets::is_bullet(p)));
    }

    #[test]
    fn test_provider_names_end_with_local() {
        let pipeline = SummarizationPipeline::from_config(&Config::default()).unwrap();
        assert_eq!(pipeline.provider_names(), vec!["Local"]);
    }
}
