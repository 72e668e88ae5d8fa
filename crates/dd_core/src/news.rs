use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait NewsProvider: Send + Sync + fmt::Debug {
    /// Returns the name recorded in a digest's sources
    fn name(&self) -> &str;

    /// Searches for articles about `topic` published on or after `from`
    async fn search(&self, topic: &str, from: NaiveDate) -> Result<Vec<Article>>;
}
