//! Markdown report rendering over classified articles.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::classify::Classified;
use crate::store::published_desc;

/// Rendered summaries are clipped to this many characters.
const SUMMARY_CLIP_CHARS: usize = 200;

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Render and write `news_report_<timestamp>.md`, returning its path.
    pub fn generate(&self, classified: &Classified, top_n: usize) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating report dir {}", self.output_dir.display()))?;

        let now = Utc::now();
        let path = self
            .output_dir
            .join(format!("news_report_{}.md", now.format("%Y%m%d_%H%M%S")));

        fs::write(&path, render(classified, top_n, now))
            .with_context(|| format!("writing report {}", path.display()))?;

        info!(path = %path.display(), "report generated");
        Ok(path)
    }
}

/// Pure rendering: one section per bucket in classifier order, each sorted
/// by `published` descending and truncated to `top_n`.
pub fn render(classified: &Classified, top_n: usize, generated_at: DateTime<Utc>) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "# News Report");
    let _ = writeln!(
        out,
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    let total: usize = classified.iter().map(|(_, articles)| articles.len()).sum();
    let topics: Vec<&str> = classified.iter().map(|(name, _)| name.as_str()).collect();
    let _ = writeln!(out, "**Total Articles:** {total}");
    let _ = writeln!(out, "**Topics:** {}\n", topics.join(", "));

    for (topic, articles) in classified {
        let _ = writeln!(out, "## {topic}");
        let _ = writeln!(out, "*{} articles*\n", articles.len());

        let mut ranked: Vec<_> = articles.iter().collect();
        ranked.sort_by(|a, b| published_desc(a, b));

        for (i, article) in ranked.iter().take(top_n).enumerate() {
            let _ = writeln!(out, "### {}. {}", i + 1, article.title);
            let _ = writeln!(out, "**Source:** {}", article.source);
            let _ = writeln!(out, "**Link:** {}", article.url);

            if !article.published.is_empty() {
                let date: String = article.published.chars().take(10).collect();
                let _ = writeln!(out, "**Published:** {date}");
            }

            if !article.summary.is_empty() {
                let clipped: String = article.summary.chars().take(SUMMARY_CLIP_CHARS).collect();
                let _ = writeln!(out, "\n{clipped}...");
            }

            let _ = writeln!(out, "\n---\n");
        }
    }

    out
}
