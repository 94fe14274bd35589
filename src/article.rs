//! Article record and its identity fingerprint.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Summaries are clipped to this many characters at construction time.
pub const MAX_SUMMARY_CHARS: usize = 500;

/// One news article flowing through the pipeline.
///
/// `title`, `url` and `source` may be empty when the origin feed omits them,
/// but they are never absent. `topics` is filled in by the classifier,
/// append-only within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default)]
    pub summary: String,
    pub published: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Article {
    /// Build an article, deriving `id` from (source, url, title).
    ///
    /// A missing `published` defaults to the ingestion time; a missing
    /// summary becomes the empty string. Summaries longer than
    /// [`MAX_SUMMARY_CHARS`] are clipped.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        summary: Option<String>,
        published: Option<String>,
    ) -> Self {
        let title = title.into();
        let url = url.into();
        let source = source.into();
        let id = fingerprint(&source, &url, &title);

        let mut summary = summary.unwrap_or_default();
        if summary.chars().count() > MAX_SUMMARY_CHARS {
            summary = summary.chars().take(MAX_SUMMARY_CHARS).collect();
        }

        Self {
            id,
            title,
            url,
            source,
            summary,
            published: published.unwrap_or_else(now_rfc3339),
            topics: Vec::new(),
        }
    }

    /// Text the topic matcher sees: title and summary, space-joined.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// Stable 12-hex-char identity hash over `source|url|title`.
///
/// Deliberately independent of summary and published, so later edits to
/// either do not change an article's identity. This is the sole dedup key.
pub fn fingerprint(source: &str, url: &str, title: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"|");
    hasher.update(url.as_bytes());
    hasher.update(b"|");
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Current UTC time as an RFC 3339 string; lexical order matches
/// chronological order for values produced here.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint("HN", "https://example.test/a", "Title");
        let b = fingerprint("HN", "https://example.test/a", "Title");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn fingerprint_ignores_summary_and_published() {
        let a = Article::new(
            "Title",
            "https://example.test/a",
            "HN",
            Some("one summary".into()),
            Some("2025-01-01T00:00:00Z".into()),
        );
        let b = Article::new(
            "Title",
            "https://example.test/a",
            "HN",
            Some("a different summary".into()),
            Some("2025-06-01T00:00:00Z".into()),
        );
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn fingerprint_varies_with_identity_fields() {
        let base = fingerprint("HN", "https://example.test/a", "Title");
        assert_ne!(base, fingerprint("Ars", "https://example.test/a", "Title"));
        assert_ne!(base, fingerprint("HN", "https://example.test/b", "Title"));
        assert_ne!(base, fingerprint("HN", "https://example.test/a", "Other"));
    }

    #[test]
    fn summary_is_clipped_at_cap() {
        let long = "x".repeat(MAX_SUMMARY_CHARS + 100);
        let a = Article::new("t", "u", "s", Some(long), None);
        assert_eq!(a.summary.chars().count(), MAX_SUMMARY_CHARS);
    }

    #[test]
    fn missing_fields_get_defaults() {
        let a = Article::new("t", "u", "s", None, None);
        assert!(a.summary.is_empty());
        assert!(!a.published.is_empty());
        assert!(a.topics.is_empty());
    }

    #[test]
    fn persisted_records_without_optional_fields_deserialize() {
        let json = r#"{
            "id": "abc123abc123",
            "title": "t",
            "url": "u",
            "source": "s",
            "published": "2025-01-01T00:00:00Z"
        }"#;
        let a: Article = serde_json::from_str(json).unwrap();
        assert!(a.summary.is_empty());
        assert!(a.topics.is_empty());
    }
}
