pub mod feed;
pub mod types;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::article::Article;
use crate::ingest::types::{FeedSource, FetchStats};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_articles_total", "Articles parsed from feeds.");
        describe_counter!(
            "ingest_entries_skipped_total",
            "Feed entries skipped during extraction."
        );
        describe_counter!("ingest_feed_errors_total", "Feed fetch/parse errors.");
    });
}

/// Pull every configured feed once, sequentially.
///
/// A failing feed is logged and counted; it never fails the pass. The
/// returned batch is the concatenation of all successful feeds in
/// configuration order.
pub async fn fetch_all(sources: &[Box<dyn FeedSource>]) -> (Vec<Article>, FetchStats) {
    ensure_metrics_described();

    let mut articles = Vec::new();
    let mut stats = FetchStats::default();

    for source in sources {
        match source.fetch_latest().await {
            Ok(mut batch) => {
                info!(source = source.name(), count = batch.len(), "fetched feed");
                articles.append(&mut batch);
            }
            Err(e) => {
                warn!(error = ?e, source = source.name(), "feed error");
                counter!("ingest_feed_errors_total").increment(1);
                stats.failed_feeds += 1;
            }
        }
    }

    stats.fetched = articles.len();
    counter!("ingest_articles_total").increment(articles.len() as u64);
    (articles, stats)
}

/// Normalize a feed entry's summary: decode HTML entities, strip tags,
/// collapse whitespace, trim. Length capping happens in the Article
/// constructor, not here.
pub fn clean_summary(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}
