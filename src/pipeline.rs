//! The batch pipeline: fetch -> classify -> persist -> report.

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::classify::{Classifier, UNCATEGORIZED};
use crate::config::{AppConfig, ALL_PARTITION};
use crate::ingest::fetch_all;
use crate::ingest::types::{FeedSource, FetchStats};
use crate::report::ReportGenerator;
use crate::store::ArticleStore;

/// What one run did, for the caller to log or print.
#[derive(Debug)]
pub struct RunSummary {
    pub stats: FetchStats,
    /// (partition, bucket size, newly added) per saved partition.
    pub saved: Vec<(String, usize, usize)>,
    pub report_path: PathBuf,
}

/// Run the whole pipeline once.
///
/// The only fatal condition is an entirely empty fetch: with zero articles
/// across all feeds no save or report is attempted and the error surfaces
/// to the caller. Everything else degrades — failed feeds and failed
/// partition saves are logged and the run continues.
pub async fn run_pipeline(cfg: &AppConfig, sources: &[Box<dyn FeedSource>]) -> Result<RunSummary> {
    let (mut articles, stats) = fetch_all(sources).await;
    info!(
        fetched = stats.fetched,
        failed_feeds = stats.failed_feeds,
        "fetch pass complete"
    );

    if articles.is_empty() {
        bail!("no articles fetched from any feed");
    }

    let classifier = Classifier::new(cfg.topic_rules());
    let classified = classifier.classify(&mut articles);

    let store = ArticleStore::new(&cfg.storage.data_dir, cfg.storage.retention_cap)?;
    let mut saved = Vec::new();

    // The unfiltered union first, then one partition per matched topic.
    match store.save(&articles, ALL_PARTITION) {
        Ok(added) => saved.push((ALL_PARTITION.to_string(), articles.len(), added)),
        Err(e) => warn!(error = ?e, partition = ALL_PARTITION, "save failed"),
    }
    for (topic, bucket) in &classified {
        if topic == UNCATEGORIZED {
            continue;
        }
        match store.save(bucket, topic) {
            Ok(added) => saved.push((topic.clone(), bucket.len(), added)),
            Err(e) => warn!(error = ?e, partition = %topic, "save failed"),
        }
    }

    let report_path =
        ReportGenerator::new(&cfg.report.output_dir).generate(&classified, cfg.report.top_n)?;

    Ok(RunSummary {
        stats,
        saved,
        report_path,
    })
}
