//! Keyword-based topic rules.
//!
//! Matching is case-insensitive substring containment over the article's
//! title + summary: "programming" matches "Programmers" and "reprogramming"
//! alike. Exclude words take absolute precedence over keywords.

/// A named topic with include keywords and exclude words.
///
/// Terms are lowercased at construction; `matches` lowercases the input
/// text once per call. No stemming, no punctuation stripping.
#[derive(Debug, Clone)]
pub struct TopicRule {
    pub name: String,
    keywords: Vec<String>,
    exclude_words: Vec<String>,
}

impl TopicRule {
    pub fn new(
        name: impl Into<String>,
        keywords: Vec<String>,
        exclude_words: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            exclude_words: exclude_words
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// True iff no exclude word occurs in `text` and at least one keyword
    /// does. Deterministic, no side effects.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();

        if self
            .exclude_words
            .iter()
            .any(|word| text.contains(word.as_str()))
        {
            return false;
        }

        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }
}
