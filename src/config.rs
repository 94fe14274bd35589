//! Typed run configuration.
//!
//! Loaded from a TOML file (`DIGEST_CONFIG_PATH`, then `config/digest.toml`,
//! then a built-in seed), deserialized into explicit structs and validated
//! before anything runs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::classify::UNCATEGORIZED;
use crate::store::DEFAULT_RETENTION_CAP;
use crate::topic::TopicRule;

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/digest.toml";

/// Reserved partition name for the unfiltered union of all fetched articles.
pub const ALL_PARTITION: &str = "all";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    /// Display name for the source; defaults to the feed URL's host.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicConfig {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_n: usize,
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            output_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub retention_cap: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            retention_cap: DEFAULT_RETENTION_CAP,
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(toml_str).context("parsing config toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the config with the usual fallbacks:
    /// 1) `$DIGEST_CONFIG_PATH`
    /// 2) `config/digest.toml`
    /// 3) the built-in seed
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            bail!("{ENV_CONFIG_PATH} points to non-existent path");
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(&default);
        }
        Ok(Self::default_seed())
    }

    fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            bail!("config has no feeds");
        }
        for feed in &self.feeds {
            if feed.url.trim().is_empty() {
                bail!("feed with empty url");
            }
        }

        let mut seen = HashSet::new();
        for topic in &self.topics {
            if topic.name.trim().is_empty() {
                bail!("topic with empty name");
            }
            if topic.name == ALL_PARTITION || topic.name == UNCATEGORIZED {
                bail!("topic name `{}` is reserved", topic.name);
            }
            if !seen.insert(topic.name.as_str()) {
                bail!("duplicate topic name `{}`", topic.name);
            }
            if topic.keywords.iter().all(|k| k.trim().is_empty()) {
                bail!("topic `{}` has no keywords", topic.name);
            }
        }
        Ok(())
    }

    /// Matcher rules in config order (the classifier's evaluation order).
    pub fn topic_rules(&self) -> Vec<TopicRule> {
        self.topics
            .iter()
            .map(|t| TopicRule::new(t.name.clone(), t.keywords.clone(), t.exclude.clone()))
            .collect()
    }

    /// Built-in fallback used when no config file is found.
    pub fn default_seed() -> Self {
        Self {
            feeds: vec![
                FeedConfig {
                    url: "https://hnrss.org/frontpage".into(),
                    name: Some("Hacker News".into()),
                },
                FeedConfig {
                    url: "https://feeds.arstechnica.com/arstechnica/index".into(),
                    name: Some("Ars Technica".into()),
                },
            ],
            topics: vec![
                TopicConfig {
                    name: "AI".into(),
                    keywords: [
                        "ai",
                        "artificial intelligence",
                        "machine learning",
                        "gpt",
                        "llm",
                        "neural",
                        "deep learning",
                    ]
                    .map(String::from)
                    .to_vec(),
                    exclude: vec![],
                },
                TopicConfig {
                    name: "Security".into(),
                    keywords: [
                        "security",
                        "vulnerability",
                        "breach",
                        "hack",
                        "cyber",
                        "malware",
                        "ransomware",
                    ]
                    .map(String::from)
                    .to_vec(),
                    exclude: vec![],
                },
                TopicConfig {
                    name: "Programming".into(),
                    keywords: [
                        "python",
                        "javascript",
                        "rust",
                        "golang",
                        "java",
                        "programming",
                        "coding",
                        "developer",
                        "github",
                    ]
                    .map(String::from)
                    .to_vec(),
                    exclude: vec![],
                },
            ],
            report: ReportConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
