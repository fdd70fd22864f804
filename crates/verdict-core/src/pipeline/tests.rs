use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};

use crate::answer::SourceRef;
use crate::config::Config;
use crate::embedding::{Embedder, StubEmbedder};
use crate::lexical::LexicalIndexCache;
use crate::policy::{InMemoryPolicyStore, PolicyRecord};
use crate::rerank::{CrossEncoderReranker, RerankedCandidate, StubScorer};
use crate::retrieval::{Candidate, HybridRetriever, RetrieverConfig};
use crate::rules::{InMemoryRulesEngine, RuleAnswer, RuleEntry};
use crate::synthesis::ExtractiveSynthesizer;
use crate::ticket::LocalTicketer;
use crate::vectordb::{ChunkPayload, ChunkPoint, MockVectorSearch, VectorSearchBackend};

use super::pipeline::AskPipeline;
use super::response::AnswerMode;
use super::signals::{evidence_coverage, retrieval_margin, validate_query};

const COLLECTION: &str = "policy_chunks";
const DIM: usize = 64;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

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

fn recent_policy(id: &str, topic: &str) -> PolicyRecord {
    PolicyRecord {
        id: id.to_string(),
        effective_from: Some(today() - ChronoDuration::days(30)),
        topic_id: Some(topic.to_string()),
    }
}

fn sample_corpus() -> Vec<(&'static str, &'static str, &'static str, u32)> {
    vec![
        (
            "Students must pay fees by October 31, 2023 for the BTech program.",
            "fees-2023",
            "/policies/fees.pdf",
            3,
        ),
        (
            "The hostel allocation list is published every August.",
            "hostel-2023",
            "/policies/hostel.pdf",
            1,
        ),
        (
            "Scholarship forms are due in September each academic year.",
            "scholarship-2023",
            "/policies/scholarship.pdf",
            2,
        ),
    ]
}

async fn seeded_pipeline(
    texts: &[(&str, &str, &str, u32)],
    policies: Vec<PolicyRecord>,
    rules: Vec<RuleEntry>,
) -> AskPipeline<MockVectorSearch> {
    let embedder = Arc::new(StubEmbedder::new(DIM));
    let backend = MockVectorSearch::new();
    backend
        .ensure_collection(COLLECTION, DIM as u64)
        .await
        .unwrap();

    let mut points = Vec::new();
    for (id, (text, policy_id, url, page)) in texts.iter().enumerate() {
        let vector = embedder.embed(text).await.unwrap();
        points.push(ChunkPoint {
            id: id as u64,
            vector,
            payload: chunk(text, policy_id, url, *page),
        });
    }
    backend.upsert_points(COLLECTION, points).await.unwrap();

    let config = Config::default();
    let retriever = HybridRetriever::new(
        backend,
        embedder,
        LexicalIndexCache::new(8),
        RetrieverConfig::from_config(&config),
    );

    AskPipeline::new(
        retriever,
        CrossEncoderReranker::new(Arc::new(StubScorer)),
        Arc::new(ExtractiveSynthesizer),
        Arc::new(InMemoryRulesEngine::with_entries(rules)),
        Arc::new(InMemoryPolicyStore::with_records(policies)),
        Arc::new(LocalTicketer),
        &config,
    )
}

fn fee_deadline_rule() -> RuleEntry {
    RuleEntry {
        intent: "fee_deadline".to_string(),
        required_slots: HashMap::from([
            ("program".to_string(), "btech".to_string()),
            ("semester".to_string(), "3".to_string()),
        ]),
        answer: RuleAnswer {
            answer: "Fees for BTech semester 3 are due by October 31, 2025.".to_string(),
            fields: HashMap::from([(
                "deadline".to_string(),
                "October 31, 2025".to_string(),
            )]),
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
    }
}

#[test]
fn validate_query_rejects_empty_and_whitespace() {
    assert!(validate_query("").is_err());
    assert!(validate_query("   \t ").is_err());
}

#[test]
fn validate_query_rejects_too_short() {
    assert!(validate_query("hi").is_err());
    assert!(validate_query("fee").is_ok());
}

#[test]
fn validate_query_rejects_injection_shapes() {
    assert!(validate_query("DROP TABLE students").is_err());
    assert!(validate_query("please eval this for me").is_err());
    assert!(validate_query("<script>alert(1)</script>").is_err());
    assert!(validate_query("javascript:void(0)").is_err());
}

#[test]
fn validate_query_accepts_normal_questions() {
    assert!(validate_query("When is the fee deadline for BTech?").is_ok());
    assert!(validate_query("How do I update my hostel details?").is_ok());
}

fn reranked(url: &str, score: f32) -> RerankedCandidate {
    RerankedCandidate {
        candidate: Candidate {
            chunk: ChunkPayload {
                url: url.to_string(),
                ..ChunkPayload::default()
            },
            vector_score: 0.0,
            lexical_score: 0.0,
            score: 0.0,
        },
        cross_encoder_score: score,
        original_score: 0.0,
    }
}

#[test]
fn retrieval_margin_is_gap_between_top_two() {
    let shortlist = vec![reranked("/a.pdf", 0.9), reranked("/b.pdf", 0.6)];
    assert!((retrieval_margin(&shortlist) - 0.3).abs() < 1e-6);
}

#[test]
fn retrieval_margin_single_candidate_keeps_own_score() {
    let shortlist = vec![reranked("/a.pdf", 0.7)];
    assert!((retrieval_margin(&shortlist) - 0.7).abs() < 1e-6);
}

#[test]
fn retrieval_margin_empty_is_zero() {
    assert_eq!(retrieval_margin(&[]), 0.0);
}

#[test]
fn evidence_coverage_full_when_answer_quotes_evidence() {
    let evidence = vec!["Students must pay fees by October 31, 2023.".to_string()];
    let coverage = evidence_coverage("Students must pay fees by October 31, 2023.", &evidence);
    assert!((coverage - 1.0).abs() < 1e-6);
}

#[test]
fn evidence_coverage_partial_for_unsupported_tokens() {
    let evidence = vec!["fees are due in october".to_string()];
    let coverage = evidence_coverage("fees are due in december", &evidence);
    assert!(coverage > 0.0 && coverage < 1.0);
}

#[test]
fn evidence_coverage_empty_answer_is_zero() {
    assert_eq!(evidence_coverage("", &["some evidence".to_string()]), 0.0);
}

#[tokio::test]
async fn rules_path_answers_confident_intent_with_slots() {
    let pipeline = seeded_pipeline(
        &sample_corpus(),
        vec![
            recent_policy("fees-rule-2025", "fees"),
            recent_policy("fees-2023", "fees"),
            recent_policy("hostel-2023", "hostel"),
            recent_policy("scholarship-2023", "scholarship"),
        ],
        vec![fee_deadline_rule()],
    )
    .await;

    let response = pipeline
        .ask("When is the fee deadline for btech semester 3?", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Rules);
    assert_eq!(response.intent.as_deref(), Some("fee_deadline"));
    assert!(response.answer_text.contains("October 31, 2025"));
    assert_eq!(response.sources.len(), 1);
    assert!(response.reasons.is_empty());
    assert!(response.ticket_id.is_none());
    assert!((response.confidence - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn confident_intent_with_missing_slots_asks_for_clarification() {
    let pipeline = seeded_pipeline(&sample_corpus(), Vec::new(), vec![fee_deadline_rule()]).await;

    let response = pipeline
        .ask("When is the fee deadline?", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Disambiguation);
    assert_eq!(response.intent.as_deref(), Some("fee_deadline"));
    assert!(response.ticket_id.is_none());

    let options = response.disambiguation_options.unwrap();
    assert!(options.iter().any(|o| o == "btech"));
    assert!(options.iter().any(|o| o == "semester 1"));
}

#[tokio::test]
async fn retrieval_path_answers_freeform_question() {
    let pipeline = seeded_pipeline(
        &sample_corpus(),
        vec![
            recent_policy("fees-2023", "fees"),
            recent_policy("hostel-2023", "hostel"),
            recent_policy("scholarship-2023", "scholarship"),
        ],
        Vec::new(),
    )
    .await;

    let response = pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Rag);
    assert!(response.answer_text.contains("October 31, 2023"));
    assert!(!response.sources.is_empty());
    assert_eq!(response.sources[0].url, "/policies/fees.pdf");
    assert!(response.reasons.is_empty());
    assert!(response.ticket_id.is_none());
}

#[tokio::test]
async fn no_evidence_falls_back_with_ticket() {
    // Empty corpus: retrieval yields nothing, the citation guard rejects the
    // empty draft, and the pipeline escalates.
    let pipeline = seeded_pipeline(&[], Vec::new(), Vec::new()).await;

    let response = pipeline
        .ask("what is the refund policy for withdrawals", None)
        .await
        .unwrap();

    assert_eq!(response.mode, AnswerMode::Fallback);
    assert!(response.answer_text.contains("couldn't find a reliable answer"));
    assert!(response.sources.is_empty());
    assert!(response.reasons.iter().any(|r| r.starts_with("citation")));

    let ticket_id = response.ticket_id.unwrap();
    assert!(ticket_id.starts_with("A2G-"));
}

#[tokio::test]
async fn invalid_query_is_rejected_before_any_lookup() {
    let pipeline = seeded_pipeline(&sample_corpus(), Vec::new(), Vec::new()).await;

    assert!(pipeline.ask("", None).await.is_err());
    assert!(pipeline.ask("DROP TABLE policies", None).await.is_err());
}

#[tokio::test]
async fn stats_count_responses_by_mode() {
    let pipeline = seeded_pipeline(&sample_corpus(), Vec::new(), vec![fee_deadline_rule()]).await;

    // Clarification (confident intent, missing slots) plus a fallback (the
    // stale corpus fails the temporal and staleness guards).
    pipeline.ask("When is the fee deadline?", None).await.unwrap();
    pipeline
        .ask("when must students pay fees", None)
        .await
        .unwrap();

    let stats = pipeline.stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.disambiguation_responses, 1);
    assert_eq!(stats.fallback_responses, 1);
}
