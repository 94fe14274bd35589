use anyhow::Result;

use crate::article::Article;

/// A feed the pipeline can pull articles from.
///
/// Implementations must guarantee every returned article carries a source
/// name. Errors are handled upstream as an empty batch for that feed.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Article>>;
    fn name(&self) -> &str;
}

/// Counters for one fetch pass across all configured feeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchStats {
    /// Articles produced by all feeds together.
    pub fetched: usize,
    /// Feeds that errored and contributed nothing.
    pub failed_feeds: usize,
}
