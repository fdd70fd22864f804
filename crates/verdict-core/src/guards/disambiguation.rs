use std::sync::LazyLock;

use regex::Regex;

use super::outcome::{GuardName, GuardOutcome};

/// Default confidence below which an answer is considered ambiguous.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;

/// Phrases suggesting the answer itself is hedging between interpretations.
static AMBIGUITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)there\s+are\s+(?:several|multiple|many|different)\s+(?:types|kinds|ways|interpretations)",
        r"(?i)your\s+question\s+could\s+(?:be interpreted|refer to|mean)\s+(?:in|as)",
        r"(?i)(?:did you mean|are you asking about|do you want to know about)",
        r"(?i)(?:unclear|ambiguous|vague)",
        r"(?i)(?:could you clarify|could you specify|can you provide more details)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static ambiguity pattern"))
    .collect()
});

/// Enumerated-list syntax an ambiguous answer tends to use for its options.
static OPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:1\.\s+|•\s+|Option\s+\d+:\s+|-)([^\n.]{5,100})").expect("static option pattern")
});

/// Detects whether the answer text signals ambiguity and extracts candidate
/// clarification options.
///
/// Advisory: a failing outcome does not flip the overall decision, but its
/// extracted options are surfaced to drive a clarification UI.
pub fn disambiguation_guard(answer_text: &str, min_confidence: f32) -> GuardOutcome {
    let mut confidence: f32 = 1.0;
    let mut indicators: Vec<String> = Vec::new();

    for pattern in AMBIGUITY_PATTERNS.iter() {
        let matches: Vec<String> = pattern
            .find_iter(answer_text)
            .map(|m| m.as_str().to_string())
            .collect();
        if !matches.is_empty() {
            indicators.extend(matches);
            confidence *= 0.8;
        }
    }

    // More than two question marks reads as a volley of clarification
    // questions rather than an answer.
    let question_marks = answer_text.matches('?').count();
    if question_marks > 2 {
        confidence *= 1.0 - (question_marks as f32 - 2.0) * 0.1;
    }

    let options: Vec<String> = OPTION_PATTERN
        .captures_iter(answer_text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();

    let detail = serde_json::json!({
        "confidence": confidence,
        "ambiguity_indicators": indicators,
        "question_count": question_marks,
        "disambiguation_options": options,
    });

    if confidence < min_confidence {
        GuardOutcome::fail(
            GuardName::Disambiguation,
            format!("Answer suggests ambiguity (confidence: {confidence:.2})"),
        )
        .with_detail(detail)
    } else {
        GuardOutcome::pass(
            GuardName::Disambiguation,
            format!("Answer appears unambiguous (confidence: {confidence:.2})"),
        )
        .with_detail(detail)
    }
}

/// Pulls the extracted options out of a disambiguation outcome's detail.
pub fn disambiguation_options(outcome: &GuardOutcome) -> Vec<String> {
    outcome
        .detail
        .as_ref()
        .and_then(|d| d.get("disambiguation_options"))
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
