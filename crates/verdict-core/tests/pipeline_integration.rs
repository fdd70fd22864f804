//! End-to-end pipeline tests over the public API, with an in-memory vector
//! backend and deterministic collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use verdict::{
    AnswerCandidate, AnswerMode, AskPipeline, ChunkPayload, ChunkPoint, Config,
    ConfidenceSignals, CrossEncoderReranker, Embedder, ExtractiveSynthesizer, GuardSet,
    HybridRetriever, InMemoryPolicyStore, InMemoryRulesEngine, LexicalIndexCache, LocalTicketer,
    MockVectorSearch, PolicyRecord, RetrieverConfig, RuleAnswer, RuleEntry, SourceRef,
    StubEmbedder, StubScorer, VectorSearchBackend,
};

const COLLECTION: &str = "policy_chunks";
const DIM: usize = 64;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

struct Corpus {
    chunks: Vec<ChunkPayload>,
    policies: Vec<PolicyRecord>,
    rules: Vec<RuleEntry>,
}

fn policy_chunk(text: &str, policy_id: &str, url: &str, page: u32) -> ChunkPayload {
    ChunkPayload {
        text: text.to_string(),
        policy_id: Some(policy_id.to_string()),
        url: url.to_string(),
        page: Some(page),
        section: String::new(),
        language: Some("en".to_string()),
    }
}

fn campus_corpus(policy_age_days: i64) -> Corpus {
    let effective = Some(today() - Duration::days(policy_age_days));
    Corpus {
        chunks: vec![
            policy_chunk(
                "Students must pay fees by October 31, 2023 for the BTech program.",
                "fees-2023",
                "/policies/fees.pdf",
                3,
            ),
            policy_chunk(
                "The hostel allocation list is published every August.",
                "hostel-2023",
                "/policies/hostel.pdf",
                1,
            ),
            policy_chunk(
                "Scholarship forms are due in September each academic year.",
                "scholarship-2023",
                "/policies/scholarship.pdf",
                2,
            ),
        ],
        policies: vec![
            PolicyRecord {
                id: "fees-2023".to_string(),
                effective_from: effective,
                topic_id: Some("fees".to_string()),
            },
            PolicyRecord {
                id: "hostel-2023".to_string(),
                effective_from: effective,
                topic_id: Some("hostel".to_string()),
            },
            PolicyRecord {
                id: "scholarship-2023".to_string(),
                effective_from: effective,
                topic_id: Some("scholarship".to_string()),
            },
        ],
        rules: Vec::new(),
    }
}

async fn build_pipeline(corpus: Corpus) -> AskPipeline<MockVectorSearch> {
    let embedder = Arc::new(StubEmbedder::new(DIM));
    let backend = MockVectorSearch::new();
    backend
        .ensure_collection(COLLECTION, DIM as u64)
        .await
        .unwrap();

    let mut points = Vec::new();
    for (id, chunk) in corpus.chunks.into_iter().enumerate() {
        let vector = embedder.embed(&chunk.text).await.unwrap();
        points.push(ChunkPoint {
            id: id as u64,
            vector,
            payload: chunk,
        });
    }
    backend.upsert_points(COLLECTION, points).await.unwrap();

    let config = Config::default();
    let retriever = HybridRetriever::new(
        backend,
        embedder,
        LexicalIndexCache::new(config.lexical_cache_capacity),
        RetrieverConfig::from_config(&config),
    );

    AskPipeline::new(
        retriever,
        CrossEncoderReranker::new(Arc::new(StubScorer)),
        Arc::new(ExtractiveSynthesizer),
        Arc::new(InMemoryRulesEngine::with_entries(corpus.rules)),
        Arc::new(InMemoryPolicyStore::with_records(corpus.policies)),
        Arc::new(LocalTicketer),
        &config,
    )
}

#[tokio::test]
async fn freeform_question_is_answered_from_retrieved_evidence() {
    let pipeline = build_pipeline(campus_corpus(30)).await;

    let response = pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Rag);
    assert!(response.answer_text.contains("October 31, 2023"));
    assert_eq!(response.sources[0].url, "/policies/fees.pdf");
    assert_eq!(response.sources[0].page, Some(3));
    assert!(response.reasons.is_empty());
    assert!(response.ticket_id.is_none());
    assert!(response.confidence > 0.9);
}

#[tokio::test]
async fn empty_corpus_escalates_with_citation_reason() {
    let pipeline = build_pipeline(Corpus {
        chunks: Vec::new(),
        policies: Vec::new(),
        rules: Vec::new(),
    })
    .await;

    let response = pipeline
        .ask("what is the refund policy for course withdrawals", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Fallback);
    assert!(response.sources.is_empty());
    assert!(response.reasons.iter().any(|r| r.starts_with("citation")));
    assert!(response.ticket_id.unwrap().starts_with("A2G-"));
}

#[tokio::test]
async fn stale_policies_are_rejected() {
    // Policies two years old: nothing newer exists, so the temporal guard
    // tolerates the age, but the staleness guard rejects outright.
    let pipeline = build_pipeline(campus_corpus(730)).await;

    let response = pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Fallback);
    assert!(response.reasons.iter().any(|r| r.starts_with("staleness")));
    assert!(response.ticket_id.is_some());
}

#[tokio::test]
async fn outdated_policy_with_newer_replacement_is_rejected() {
    // The cited fee policy is 200 days old, but a newer policy exists on the
    // same topic, so the temporal guard fails even though staleness passes.
    let mut corpus = campus_corpus(200);
    corpus.policies.push(PolicyRecord {
        id: "fees-2024".to_string(),
        effective_from: Some(today() - Duration::days(5)),
        topic_id: Some("fees".to_string()),
    });
    let pipeline = build_pipeline(corpus).await;

    let response = pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Fallback);
    assert!(response.reasons.iter().any(|r| r.starts_with("temporal")));
}

#[tokio::test]
async fn rule_intent_with_full_slots_skips_retrieval() {
    let mut corpus = campus_corpus(30);
    corpus.policies.push(PolicyRecord {
        id: "fees-rule-2025".to_string(),
        effective_from: Some(today() - Duration::days(10)),
        topic_id: Some("fees".to_string()),
    });
    corpus.rules.push(RuleEntry {
        intent: "fee_deadline".to_string(),
        required_slots: HashMap::from([("program".to_string(), "btech".to_string())]),
        answer: RuleAnswer {
            answer: "Fees for BTech semester 3 are due by October 31, 2025.".to_string(),
            fields: HashMap::new(),
            source: SourceRef {
                url: "/policies/fees-2025.pdf".to_string(),
                page: Some(2),
                title: Some("Fee schedule 2025".to_string()),
                policy_id: Some("fees-rule-2025".to_string()),
                section: None,
                updated_at: None,
            },
            evidence: "Fees for BTech semester 3 are due by October 31, 2025 \
                       according to the fee schedule."
                .to_string(),
        },
    });
    let pipeline = build_pipeline(corpus).await;

    let response = pipeline
        .ask("When is the fee deadline for btech semester 3?", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Rules);
    assert_eq!(response.intent.as_deref(), Some("fee_deadline"));
    assert!(response.answer_text.contains("October 31, 2025"));
    assert!(response.reasons.is_empty());
}

#[tokio::test]
async fn rule_intent_without_slots_asks_for_clarification() {
    let pipeline = build_pipeline(campus_corpus(30)).await;

    let response = pipeline
        .ask("When is the fee deadline?", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Disambiguation);
    let options = response.disambiguation_options.unwrap();
    assert!(options.iter().any(|o| o == "btech"));
}

#[tokio::test]
async fn guard_set_enforces_the_source_age_boundary() {
    let reference = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let config = Config::default();
    let store = Arc::new(InMemoryPolicyStore::with_records(vec![PolicyRecord {
        id: "p1".to_string(),
        effective_from: Some(reference - Duration::days(30)),
        topic_id: None,
    }]));
    let guard_set = GuardSet::new(store, &config);

    let answer_aged = |age_days: i64| AnswerCandidate {
        text: "The library is open on weekdays.".to_string(),
        sources: vec![SourceRef {
            url: "/policies/library.pdf".to_string(),
            page: Some(1),
            title: None,
            policy_id: Some("p1".to_string()),
            section: None,
            updated_at: Some(reference - Duration::days(age_days)),
        }],
        evidence_texts: vec!["The library is open on weekdays.".to_string()],
        signals: ConfidenceSignals::default(),
    };

    let at_limit = guard_set
        .evaluate_as_of(&answer_aged(365), "en", true, reference)
        .await;
    let over_limit = guard_set
        .evaluate_as_of(&answer_aged(366), "en", true, reference)
        .await;

    let staleness_of = |outcomes: &[verdict::GuardOutcome]| {
        outcomes
            .iter()
            .find(|o| o.guard == verdict::GuardName::Staleness)
            .map(|o| o.passed)
    };

    assert_eq!(staleness_of(&at_limit), Some(true));
    assert_eq!(staleness_of(&over_limit), Some(false));
}

#[tokio::test]
async fn retrieval_is_deterministic_across_repeated_queries() {
    let pipeline = build_pipeline(campus_corpus(30)).await;

    let first = pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();
    let second = pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();

    assert_eq!(first.answer_text, second.answer_text);
    assert_eq!(first.sources, second.sources);
    assert_eq!(first.confidence, second.confidence);
}
