use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};
use dd_core::{Article, DigestRequest, DigestResponse, NewsProvider, Result};
use crate::digest::format_digest;
use crate::fallback::{fallback_articles, FALLBACK_SOURCE};
use crate::providers::create_news_providers;
use crate::validation::validate_topics;
use crate::Config;

pub const ARTICLES_PER_TOPIC: usize = 5;

/// Articles gathered for a set of topics, before formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub articles: Vec<Article>,
    pub sources: Vec<String>,
}

impl Collected {
    fn record_source(&mut self, source: &str) {
        if !self.sources.iter().any(|s| s == source) {
            self.sources.push(source.to_string());
        }
    }
}

/// Queries every news provider for each topic and builds the digest.
pub struct NewsAggregator {
    providers: Vec<Arc<dyn NewsProvider>>,
}

impl fmt::Debug for NewsAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsAggregator")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl NewsAggregator {
    pub fn new(providers: Vec<Arc<dyn NewsProvider>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(create_news_providers(config)?))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Results of every provider for one topic, in provider order. Failures
    /// count as no results.
    async fn search_all(&self, topic: &str, from: chrono::NaiveDate) -> Vec<(&str, Vec<Article>)> {
        let searches = self.providers.iter().map(|provider| async move {
            let articles = match provider.search(topic, from).await {
                Ok(articles) => articles,
                Err(e) => {
                    warn!(provider = provider.name(), topic, error = %e, "news search failed");
                    Vec::new()
                }
            };
            (provider.name(), articles)
        });
        join_all(searches).await
    }

    /// Gathers articles for `topics` as of `now`.
    pub async fn collect(&self, topics: &[String], now: DateTime<Utc>) -> Collected {
        let from = (now - Duration::days(1)).date_naive();
        let mut collected = Collected::default();

        for topic in topics {
            let results = self.search_all(topic, from).await;

            let mut seen = HashSet::new();
            let unique: Vec<Article> = results
                .iter()
                .flat_map(|(_, articles)| articles.iter())
                .filter(|article| seen.insert(article.title.clone()))
                .take(ARTICLES_PER_TOPIC)
                .cloned()
                .collect();

            if unique.is_empty() {
                info!(topic = %topic, "no provider news; using fallback articles");
                collected.articles.extend(fallback_articles(topic, now));
                collected.record_source(FALLBACK_SOURCE);
            } else {
                debug!(topic = %topic, count = unique.len(), "collected provider news");
                collected.articles.extend(unique);
                for (name, articles) in &results {
                    if !articles.is_empty() {
                        collected.record_source(name);
                    }
                }
            }
        }

        collected
    }

    pub async fn aggregate(&self, request: &DigestRequest) -> Result<DigestResponse> {
        validate_topics(&request.topics)?;
        let now = Utc::now();
        let Collected { mut articles, sources } = self.collect(&request.topics, now).await;

        if articles.is_empty() {
            return Ok(DigestResponse {
                content: format!(
                    "No recent news found for the topics: {}. Please try different topics or check back later.",
                    request.topics.join(", ")
                ),
                sources: Vec::new(),
            });
        }

        articles.sort_by(|a, b| b.published_or(now).cmp(&a.published_or(now)));
        info!(articles = articles.len(), topics = request.topics.len(), "digest generated");

        Ok(DigestResponse {
            content: format_digest(&articles, &request.topics, &request.timeframe),
            sources,
        })
    }
}
