use async_trait::async_trait;
use std::fmt;
use crate::types::{SummaryRequest, SummaryResponse};
use crate::Result;

#[async_trait]
pub trait SummaryProvider: Send + Sync + fmt::Debug {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Attempt to summarize the request into `max_points` bullet points.
    ///
    /// An `Err` means the pipeline should fall through to the next provider.
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResponse>;
}
