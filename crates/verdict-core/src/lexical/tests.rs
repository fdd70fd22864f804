use super::cache::LexicalIndexCache;
use super::index::{LexicalIndexBuilder, tokenize};
use crate::vectordb::ChunkPayload;

fn chunk(text: &str, policy_id: &str, url: &str, page: u32) -> ChunkPayload {
    ChunkPayload {
        text: text.to_string(),
        policy_id: Some(policy_id.to_string()),
        url: url.to_string(),
        page: Some(page),
        section: String::new(),
        language: Some("en".to_string()),
    }
}

fn sample_index() -> super::index::LexicalIndex {
    let mut builder = LexicalIndexBuilder::new();
    builder.extend([
        chunk(
            "Students must pay fees by October 31, 2023 for the BTech program.",
            "fees-2023",
            "/policies/fees.pdf",
            3,
        ),
        chunk(
            "The hostel allocation list is published every August.",
            "hostel-2023",
            "/policies/hostel.pdf",
            1,
        ),
        chunk(
            "Scholarship forms are due in September each academic year.",
            "scholarship-2023",
            "/policies/scholarship.pdf",
            2,
        ),
    ]);
    builder.build()
}

#[test]
fn tokenize_lowercases_and_drops_short_tokens() {
    let tokens = tokenize("The Fee-Deadline is October 31, 2023!");
    assert_eq!(
        tokens,
        vec!["the", "fee", "deadline", "is", "october", "31", "2023"]
    );
    assert!(!tokens.contains(&"a".to_string()));
}

#[test]
fn search_ranks_matching_document_first() {
    let index = sample_index();

    let hits = index.search("when do I pay my fees", 10, None);
    assert!(!hits.is_empty());
    assert_eq!(hits[0].chunk.url, "/policies/fees.pdf");
    assert!(hits[0].score > 0.0);
}

#[test]
fn search_excludes_zero_score_documents() {
    let index = sample_index();

    let hits = index.search("fees", 10, None);
    assert_eq!(hits.len(), 1);
}

#[test]
fn search_with_policy_filter_scopes_the_universe() {
    let index = sample_index();

    let hits = index.search("fees hostel scholarship", 10, Some("hostel-2023"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.policy_id.as_deref(), Some("hostel-2023"));
}

#[test]
fn search_unknown_policy_returns_empty() {
    let index = sample_index();
    assert!(index.search("fees", 10, Some("missing")).is_empty());
}

#[test]
fn search_empty_query_returns_empty() {
    let index = sample_index();
    assert!(index.search("?!", 10, None).is_empty());
}

#[test]
fn empty_index_returns_empty() {
    let index = LexicalIndexBuilder::new().build();
    assert!(index.is_empty());
    assert!(index.search("fees", 10, None).is_empty());
}

#[test]
fn ties_preserve_insertion_order() {
    let mut builder = LexicalIndexBuilder::new();
    // Identical texts score identically; insertion order must decide.
    builder.extend([
        chunk("exam form deadline", "p1", "/a.pdf", 1),
        chunk("exam form deadline", "p2", "/b.pdf", 1),
    ]);
    let index = builder.build();

    let hits = index.search("exam form", 10, None);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.url, "/a.pdf");
    assert_eq!(hits[1].chunk.url, "/b.pdf");
    assert!((hits[0].score - hits[1].score).abs() < 1e-6);
}

#[test]
fn common_terms_still_score_positive() {
    // "the" appears in every document; the epsilon floor keeps its idf
    // positive instead of discarding matches outright.
    let mut builder = LexicalIndexBuilder::new();
    builder.extend([
        chunk("the fee deadline", "p1", "/a.pdf", 1),
        chunk("the hostel list", "p2", "/b.pdf", 1),
        chunk("the exam timetable", "p3", "/c.pdf", 1),
    ]);
    let index = builder.build();

    let hits = index.search("the", 10, None);
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.score > 0.0));
}

#[test]
fn cache_reuses_covering_index() {
    let cache = LexicalIndexCache::new(8);
    let pool = vec![chunk("fee deadline", "p1", "/a.pdf", 1)];

    let first = cache.get_or_build(Some("p1"), &pool);
    let second = cache.get_or_build(Some("p1"), &pool);

    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn cache_rebuilds_when_pool_grows() {
    let cache = LexicalIndexCache::new(8);
    let pool = vec![chunk("fee deadline", "p1", "/a.pdf", 1)];
    let first = cache.get_or_build(Some("p1"), &pool);

    let grown = vec![
        chunk("fee deadline", "p1", "/a.pdf", 1),
        chunk("late fee waiver", "p1", "/a.pdf", 2),
    ];
    let second = cache.get_or_build(Some("p1"), &grown);

    assert!(!std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 2);
    // The old Arc stays valid for in-flight readers.
    assert_eq!(first.len(), 1);
}

#[test]
fn cache_keys_are_isolated_per_filter() {
    let cache = LexicalIndexCache::new(8);
    let pool_a = vec![chunk("fee deadline", "p1", "/a.pdf", 1)];
    let pool_b = vec![chunk("hostel list", "p2", "/b.pdf", 1)];

    let a = cache.get_or_build(Some("p1"), &pool_a);
    let b = cache.get_or_build(Some("p2"), &pool_b);

    assert!(!std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(cache.entry_count(), 2);
}
