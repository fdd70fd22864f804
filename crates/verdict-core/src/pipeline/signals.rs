use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexical::tokenize;
use crate::rerank::RerankedCandidate;

use super::error::PipelineError;

const MIN_QUERY_CHARS: usize = 3;

/// Injection-shaped input we refuse outright.
static HARMFUL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(exec|eval|system|subprocess)\b",
        r"(?i)\b(DROP|DELETE|INSERT|UPDATE)\s+(TABLE|FROM|INTO)\b",
        r"(?i)<script.*?>",
        r"(?i)javascript:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static harmful pattern"))
    .collect()
});

/// Rejects empty, too-short, or injection-shaped queries before any
/// downstream call is made.
pub fn validate_query(query: &str) -> Result<(), PipelineError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::InvalidQuery {
            message: "Query cannot be empty".to_string(),
        });
    }
    if trimmed.len() < MIN_QUERY_CHARS {
        return Err(PipelineError::InvalidQuery {
            message: format!("Query must be at least {MIN_QUERY_CHARS} characters long"),
        });
    }
    if HARMFUL_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return Err(PipelineError::InvalidQuery {
            message: "Query contains potentially harmful content".to_string(),
        });
    }
    Ok(())
}

/// Retrieval margin: the gap between the best and runner-up shortlist
/// scores, clamped to [0, 1]. A lone candidate keeps its own score; an empty
/// shortlist has no margin.
pub fn retrieval_margin(shortlist: &[RerankedCandidate]) -> f32 {
    match shortlist {
        [] => 0.0,
        [only] => only.cross_encoder_score.clamp(0.0, 1.0),
        [best, second, ..] => (best.cross_encoder_score - second.cross_encoder_score).clamp(0.0, 1.0),
    }
}

/// Evidence coverage: the fraction of distinct answer tokens that appear in
/// at least one evidence text.
pub fn evidence_coverage(answer_text: &str, evidence_texts: &[String]) -> f32 {
    let answer_tokens: HashSet<String> = tokenize(answer_text).into_iter().collect();
    if answer_tokens.is_empty() {
        return 0.0;
    }

    let evidence_tokens: HashSet<String> = evidence_texts
        .iter()
        .flat_map(|text| tokenize(text))
        .collect();

    let covered = answer_tokens
        .iter()
        .filter(|t| evidence_tokens.contains(*t))
        .count();
    covered as f32 / answer_tokens.len() as f32
}
