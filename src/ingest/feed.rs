//! RSS 2.0 / Atom feed source.
//!
//! Fetches over HTTP (or from an inline fixture in tests), deserializes the
//! XML with quick-xml, and maps entries to [`Article`]s. Partial entries get
//! defaults; entries with no title, url, or summary at all are skipped and
//! counted.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use metrics::counter;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;

use crate::article::Article;
use crate::config::FeedConfig;
use crate::ingest::clean_summary;
use crate::ingest::types::FeedSource;

/// At most this many entries are taken from a single feed per fetch.
pub const MAX_ENTRIES_PER_FEED: usize = 20;

// ---- RSS 2.0 document shape ----

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// guid carries an isPermaLink attribute, so it cannot deserialize
// straight into a String.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

// ---- Atom document shape ----

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<TextValue>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    id: Option<String>,
    summary: Option<TextValue>,
    content: Option<TextValue>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

// Atom text constructs allow a type attribute next to the text node.
#[derive(Debug, Deserialize)]
struct TextValue {
    #[serde(rename = "$text")]
    value: Option<String>,
}

impl TextValue {
    fn into_inner(self) -> Option<String> {
        self.value
    }
}

/// A feed entry reduced to the fields the article model cares about.
#[derive(Debug)]
struct RawEntry {
    title: Option<String>,
    url: Option<String>,
    summary: Option<String>,
    published: Option<String>,
}

impl RawEntry {
    fn from_rss(item: Item) -> Self {
        Self {
            title: item.title,
            url: item.link.or(item.guid.and_then(|g| g.value)),
            summary: item.description,
            published: item.pub_date,
        }
    }

    fn from_atom(entry: AtomEntry) -> Self {
        let url = entry
            .links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .and_then(|l| l.href.clone())
            .or(entry.id);
        Self {
            title: entry.title.and_then(TextValue::into_inner),
            url,
            summary: entry
                .summary
                .and_then(TextValue::into_inner)
                .or(entry.content.and_then(TextValue::into_inner)),
            published: entry.published.or(entry.updated),
        }
    }
}

/// One configured RSS/Atom feed.
pub struct RssFeedSource {
    name: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl RssFeedSource {
    pub fn from_config(feed: &FeedConfig) -> Self {
        let name = feed
            .name
            .clone()
            .unwrap_or_else(|| host_name(&feed.url));
        Self {
            name,
            mode: Mode::Http {
                url: feed.url.clone(),
                client: reqwest::Client::new(),
            },
        }
    }

    /// Parse-only source backed by inline XML; no HTTP involved.
    pub fn from_fixture(name: &str, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    fn parse_feed_str(&self, body: &str) -> Result<Vec<Article>> {
        let xml = scrub_html_entities_for_xml(body);

        let entries: Vec<RawEntry> = match from_str::<Rss>(&xml) {
            Ok(rss) => rss.channel.items.into_iter().map(RawEntry::from_rss).collect(),
            Err(_) => {
                let atom: AtomFeed = from_str(&xml)
                    .with_context(|| format!("parsing feed `{}` as rss or atom", self.name))?;
                atom.entries.into_iter().map(RawEntry::from_atom).collect()
            }
        };

        let mut out = Vec::new();
        let mut skipped = 0usize;
        for entry in entries.into_iter().take(MAX_ENTRIES_PER_FEED) {
            let title = entry.title.unwrap_or_default();
            let url = entry.url.unwrap_or_default();
            let summary = entry.summary.map(|s| clean_summary(&s)).unwrap_or_default();

            if title.is_empty() && url.is_empty() && summary.is_empty() {
                skipped += 1;
                continue;
            }

            let published = entry.published.as_deref().and_then(parse_feed_date);
            out.push(Article::new(
                title,
                url,
                self.name.as_str(),
                Some(summary),
                published,
            ));
        }

        if skipped > 0 {
            debug!(source = %self.name, skipped, "skipped empty feed entries");
            counter!("ingest_entries_skipped_total").increment(skipped as u64);
        }

        Ok(out)
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch_latest(&self) -> Result<Vec<Article>> {
        match &self.mode {
            Mode::Fixture(xml) => self.parse_feed_str(xml),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|resp| resp.error_for_status())
                    .with_context(|| format!("fetching feed {url}"))?
                    .text()
                    .await
                    .with_context(|| format!("reading feed body {url}"))?;
                self.parse_feed_str(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Normalize a feed timestamp (RFC 2822 `pubDate` or RFC 3339 Atom dates)
/// to an RFC 3339 UTC string. Unparseable values yield `None`, leaving the
/// article to default to its ingestion time.
fn parse_feed_date(ts: &str) -> Option<String> {
    let dt = DateTime::parse_from_rfc2822(ts)
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()?;
    Some(
        dt.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Source name fallback when the config gives none: the feed URL's host.
fn host_name(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

// Feeds in the wild use HTML entities that XML does not declare; scrub the
// common ones before handing the document to quick-xml.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
