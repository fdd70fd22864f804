use crate::retrieval::Candidate;
use crate::rerank::RerankedCandidate;
use crate::vectordb::ChunkPayload;

use super::{AnswerSynthesizer, ExtractiveSynthesizer, SynthesisError};

fn reranked(text: &str, score: f32) -> RerankedCandidate {
    RerankedCandidate {
        candidate: Candidate {
            chunk: ChunkPayload {
                text: text.to_string(),
                url: "/policies/fees.pdf".to_string(),
                page: Some(3),
                ..ChunkPayload::default()
            },
            vector_score: score,
            lexical_score: 0.0,
            score,
        },
        cross_encoder_score: score,
        original_score: score,
    }
}

#[tokio::test]
async fn extracts_the_most_relevant_sentence() {
    let evidence = vec![reranked(
        "The hostel list is published in August. Students must pay fees by October 31, 2023. \
         Contact the registrar for details.",
        0.9,
    )];

    let draft = ExtractiveSynthesizer
        .synthesize("when must students pay fees", &evidence)
        .await
        .unwrap();

    assert!(draft.text.contains("October 31, 2023"));
    assert_eq!(draft.direct_answer.as_deref(), Some(draft.text.as_str()));
}

#[tokio::test]
async fn collects_key_points_from_runners_up() {
    let evidence = vec![
        reranked("Students must pay fees by October 31, 2023.", 0.9),
        reranked("A late fee of $500 applies to fees paid after the deadline.", 0.7),
    ];

    let draft = ExtractiveSynthesizer
        .synthesize("fees deadline", &evidence)
        .await
        .unwrap();

    assert_eq!(draft.key_points.len(), 1);
    assert!(draft.key_points[0].contains("late fee"));
}

#[tokio::test]
async fn empty_evidence_is_an_error() {
    let result = ExtractiveSynthesizer.synthesize("fees", &[]).await;
    assert!(matches!(result, Err(SynthesisError::EmptyAnswer)));
}

#[tokio::test]
async fn output_is_deterministic() {
    let evidence = vec![reranked(
        "Students must pay fees by October 31, 2023. The hostel list is published in August.",
        0.9,
    )];

    let first = ExtractiveSynthesizer
        .synthesize("fees deadline", &evidence)
        .await
        .unwrap();
    let second = ExtractiveSynthesizer
        .synthesize("fees deadline", &evidence)
        .await
        .unwrap();

    assert_eq!(first, second);
}
