//! rss-topic-digest — binary entrypoint.
//!
//! Fetches the configured feeds once, classifies articles into topics,
//! persists per-topic partitions, and writes a markdown report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rss_topic_digest::config::{AppConfig, TopicConfig};
use rss_topic_digest::ingest::feed::RssFeedSource;
use rss_topic_digest::ingest::types::FeedSource;
use rss_topic_digest::pipeline::run_pipeline;

#[derive(Parser, Debug)]
#[command(author, version, about = "Aggregate RSS/Atom feeds into per-topic digests")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated topic names to track instead of the configured ones
    #[arg(long)]
    topics: Option<String>,

    /// Articles per topic in the report (overrides the config value)
    #[arg(long)]
    top_n: Option<usize>,

    /// Log filter used when RUST_LOG is unset (e.g. info, debug, warn)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "digest run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load_default()?,
    };

    if let Some(names) = &args.topics {
        cfg.topics = topics_from_cli(names);
    }
    if let Some(top_n) = args.top_n {
        cfg.report.top_n = top_n;
    }

    info!(
        feeds = cfg.feeds.len(),
        topics = cfg.topics.len(),
        "starting digest run"
    );

    let sources: Vec<Box<dyn FeedSource>> = cfg
        .feeds
        .iter()
        .map(|feed| Box::new(RssFeedSource::from_config(feed)) as Box<dyn FeedSource>)
        .collect();

    let summary = run_pipeline(&cfg, &sources).await?;

    println!("News aggregation complete");
    for (partition, size, added) in &summary.saved {
        println!("  {partition}: {size} articles ({added} new)");
    }
    println!("Report: {}", summary.report_path.display());
    Ok(())
}

/// `--topics ai,tech` becomes one single-keyword topic per name.
fn topics_from_cli(names: &str) -> Vec<TopicConfig> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| TopicConfig {
            name: name.to_string(),
            keywords: vec![name.to_lowercase()],
            exclude: vec![],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_topics_become_single_keyword_rules() {
        let topics = topics_from_cli("AI, tech,, security ");
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].name, "AI");
        assert_eq!(topics[0].keywords, vec!["ai"]);
        assert_eq!(topics[2].name, "security");
    }
}
