//! Multi-label classification of articles into topic buckets.

use tracing::info;

use crate::article::Article;
use crate::topic::TopicRule;

/// Reserved bucket for articles matching no configured topic.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Topic buckets in evaluation order (configured topics first,
/// `uncategorized` last); empty buckets are never included.
pub type Classified = Vec<(String, Vec<Article>)>;

/// Applies every topic rule to a batch of articles.
#[derive(Debug, Clone)]
pub struct Classifier {
    topics: Vec<TopicRule>,
}

impl Classifier {
    pub fn new(topics: Vec<TopicRule>) -> Self {
        Self { topics }
    }

    /// Group articles by matched topic. Multi-label: an article lands in
    /// every bucket whose rule matches, and its `topics` field records the
    /// matched names in evaluation order — observable by the caller after
    /// the call returns. Articles matching nothing go to `uncategorized`.
    ///
    /// Never fails; an article with an empty summary is matched on its
    /// title alone.
    pub fn classify(&self, articles: &mut [Article]) -> Classified {
        let mut buckets: Vec<(String, Vec<Article>)> = self
            .topics
            .iter()
            .map(|t| (t.name.clone(), Vec::new()))
            .collect();
        let mut uncategorized: Vec<Article> = Vec::new();

        for article in articles.iter_mut() {
            let text = article.search_text();

            let matched: Vec<usize> = self
                .topics
                .iter()
                .enumerate()
                .filter(|(_, topic)| topic.matches(&text))
                .map(|(i, _)| i)
                .collect();

            // Record every label before copying into buckets, so each
            // stored copy carries the complete label set for this run.
            for &i in &matched {
                article.topics.push(self.topics[i].name.clone());
            }

            if matched.is_empty() {
                uncategorized.push(article.clone());
            } else {
                for &i in &matched {
                    buckets[i].1.push(article.clone());
                }
            }
        }

        buckets.push((UNCATEGORIZED.to_string(), uncategorized));
        buckets.retain(|(_, articles)| !articles.is_empty());

        for (topic, articles) in &buckets {
            info!(topic = %topic, count = articles.len(), "classified");
        }

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::TopicRule;

    fn article(title: &str, summary: &str) -> Article {
        Article::new(
            title,
            format!("https://example.test/{}", title.replace(' ', "-")),
            "Test",
            Some(summary.to_string()),
            Some("2025-01-01T00:00:00Z".into()),
        )
    }

    fn classifier() -> Classifier {
        Classifier::new(vec![
            TopicRule::new("AI", vec!["ai".into(), "llm".into()], vec![]),
            TopicRule::new("Rust", vec!["rust".into()], vec![]),
        ])
    }

    fn bucket<'a>(classified: &'a Classified, name: &str) -> Option<&'a Vec<Article>> {
        classified.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    #[test]
    fn article_can_land_in_multiple_buckets() {
        let mut articles = vec![article("LLM inference in Rust", "")];
        let classified = classifier().classify(&mut articles);

        assert_eq!(bucket(&classified, "AI").unwrap().len(), 1);
        assert_eq!(bucket(&classified, "Rust").unwrap().len(), 1);
        assert_eq!(articles[0].topics, vec!["AI", "Rust"]);
    }

    #[test]
    fn bucket_copies_carry_the_full_label_set() {
        let mut articles = vec![article("LLM inference in Rust", "")];
        let classified = classifier().classify(&mut articles);

        let in_ai = &bucket(&classified, "AI").unwrap()[0];
        assert_eq!(in_ai.topics, vec!["AI", "Rust"]);
    }

    #[test]
    fn unmatched_articles_fall_back_to_uncategorized() {
        let mut articles = vec![article("Gardening tips", "spring planting")];
        let classified = classifier().classify(&mut articles);

        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].0, UNCATEGORIZED);
        assert!(articles[0].topics.is_empty());
    }

    #[test]
    fn empty_buckets_are_dropped() {
        let mut articles = vec![article("Rust 1.80 released", "")];
        let classified = classifier().classify(&mut articles);

        assert!(bucket(&classified, "AI").is_none());
        assert!(bucket(&classified, UNCATEGORIZED).is_none());
        assert_eq!(bucket(&classified, "Rust").unwrap().len(), 1);
    }

    #[test]
    fn summary_participates_in_matching() {
        let mut articles = vec![article("Weekly roundup", "new llm benchmarks")];
        let classified = classifier().classify(&mut articles);
        assert_eq!(bucket(&classified, "AI").unwrap().len(), 1);
    }

    #[test]
    fn matching_is_boolean_not_scored() {
        // An article mentioning a keyword five times appears once.
        let mut articles = vec![article("ai ai ai ai ai", "")];
        let classified = classifier().classify(&mut articles);
        assert_eq!(bucket(&classified, "AI").unwrap().len(), 1);
        assert_eq!(articles[0].topics, vec!["AI"]);
    }
}
