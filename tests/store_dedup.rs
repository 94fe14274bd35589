// tests/store_dedup.rs
use rss_topic_digest::article::Article;
use rss_topic_digest::store::ArticleStore;

fn article(n: usize) -> Article {
    Article::new(
        format!("Article {n}"),
        format!("https://example.test/{n}"),
        "Test",
        Some(format!("summary {n}")),
        Some(format!("2025-01-01T00:{:02}:{:02}Z", n / 60, n % 60)),
    )
}

#[test]
fn saving_the_same_batch_twice_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), 100).unwrap();
    let batch: Vec<Article> = (0..5).map(article).collect();

    assert_eq!(store.save(&batch, "tech").unwrap(), 5);
    assert_eq!(store.save(&batch, "tech").unwrap(), 0);

    let loaded = store.load("tech");
    assert_eq!(loaded.len(), 5);
}

#[test]
fn idempotent_save_leaves_the_partition_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), 100).unwrap();
    let batch: Vec<Article> = (0..5).map(article).collect();

    store.save(&batch, "tech").unwrap();
    let first = store.load("tech");
    store.save(&batch, "tech").unwrap();
    let second = store.load("tech");

    assert_eq!(first, second);
}

#[test]
fn same_identity_triple_counts_as_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), 100).unwrap();

    let a = Article::new(
        "Same title",
        "https://example.test/same",
        "Feed",
        Some("first fetch".into()),
        Some("2025-01-01T00:00:00Z".into()),
    );
    // Second fetch of the same entry: identity triple matches, content differs.
    let b = Article::new(
        "Same title",
        "https://example.test/same",
        "Feed",
        Some("second fetch, edited summary".into()),
        Some("2025-01-02T00:00:00Z".into()),
    );

    assert_eq!(store.save(&[a], "all").unwrap(), 1);
    assert_eq!(store.save(&[b], "all").unwrap(), 0);
    assert_eq!(store.load("all").len(), 1);
}

#[test]
fn partitions_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), 100).unwrap();
    let batch: Vec<Article> = (0..3).map(article).collect();

    store.save(&batch, "tech").unwrap();
    assert!(store.load("security").is_empty());
    assert_eq!(store.save(&batch, "security").unwrap(), 3);
}

#[test]
fn loaded_articles_round_trip_their_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArticleStore::new(dir.path(), 100).unwrap();

    let mut original = article(7);
    original.topics = vec!["AI".into(), "Rust".into()];
    store.save(&[original.clone()], "tech").unwrap();

    let loaded = store.load("tech");
    assert_eq!(loaded[0], original);
    assert_eq!(loaded[0].topics, vec!["AI", "Rust"]);
}
