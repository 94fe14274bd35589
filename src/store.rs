//! Per-partition persistent article store with dedup and bounded retention.
//!
//! One JSON file per partition (a topic name, or the reserved `"all"`
//! union). Every save is a full load-merge-sort-truncate-write cycle; there
//! is no incremental update mode. Single-process use only — concurrent
//! saves to the same data dir may lose updates.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::article::Article;

/// Default retention cap per partition.
pub const DEFAULT_RETENTION_CAP: usize = 100;

/// Orders articles by `published` descending.
///
/// Plain string comparison: RFC 3339 timestamps sort lexically in
/// chronological order, which is all the store relies on. Swap this
/// function for a real datetime comparison if mixed formats ever appear.
pub fn published_desc(a: &Article, b: &Article) -> Ordering {
    b.published.cmp(&a.published)
}

pub struct ArticleStore {
    data_dir: PathBuf,
    cap: usize,
}

impl ArticleStore {
    pub fn new(data_dir: impl Into<PathBuf>, cap: usize) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        Ok(Self { data_dir, cap })
    }

    fn partition_path(&self, partition: &str) -> PathBuf {
        self.data_dir.join(format!("{partition}_articles.json"))
    }

    /// Merge a batch into a partition and return how many articles were
    /// newly added.
    ///
    /// Already-known fingerprints are silently dropped (no update-in-place
    /// of summary or published). The merged sequence is sorted by
    /// `published` descending and truncated to the retention cap before the
    /// prior state is fully overwritten; evicted articles are discarded.
    pub fn save(&self, articles: &[Article], partition: &str) -> Result<usize> {
        let path = self.partition_path(partition);

        let existing = self.read_partition(&path);
        let existing_ids: HashSet<&str> = existing.iter().map(|a| a.id.as_str()).collect();

        let new_articles: Vec<Article> = articles
            .iter()
            .filter(|a| !existing_ids.contains(a.id.as_str()))
            .cloned()
            .collect();
        let added = new_articles.len();

        let mut combined = existing;
        combined.extend(new_articles);
        // Stable sort: within equal timestamps, previously stored articles
        // stay ahead of the incoming batch.
        combined.sort_by(published_desc);
        combined.truncate(self.cap);

        let json = serde_json::to_string_pretty(&combined)
            .context("serializing partition articles")?;
        fs::write(&path, json)
            .with_context(|| format!("writing partition file {}", path.display()))?;

        info!(
            partition = %partition,
            added,
            total = combined.len(),
            "saved articles"
        );
        Ok(added)
    }

    /// Load a partition's articles, newest first.
    ///
    /// A partition that was never saved, or whose file is unreadable or
    /// corrupt, loads as empty — read failures are logged, not raised.
    pub fn load(&self, partition: &str) -> Vec<Article> {
        self.read_partition(&self.partition_path(partition))
    }

    fn read_partition(&self, path: &Path) -> Vec<Article> {
        if !path.exists() {
            return Vec::new();
        }
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read partition, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(articles) => articles,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt partition file, starting empty");
                Vec::new()
            }
        }
    }
}
