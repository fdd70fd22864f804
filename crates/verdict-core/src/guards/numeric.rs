use std::sync::LazyLock;

use regex::Regex;

use super::outcome::{GuardName, GuardOutcome};

const MONTHS: &str = "(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?\
|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

struct ValuePattern {
    category: &'static str,
    regex: Regex,
}

/// Patterns for dates, currency amounts, percentages, and bare multi-digit
/// numbers. Matches are checked verbatim against evidence, so the patterns
/// must capture the surface form exactly as written.
static VALUE_PATTERNS: LazyLock<Vec<ValuePattern>> = LazyLock::new(|| {
    let date_patterns = [
        // January 1, 2023
        format!(r"\b{MONTHS}\s+\d{{1,2}},?\s+\d{{4}}\b"),
        // 1 January 2023
        format!(r"\b\d{{1,2}}\s+{MONTHS}\s+\d{{4}}\b"),
        // 2023-01-01
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
        // 1/1/2023
        r"\b\d{1,2}/\d{1,2}/\d{2,4}\b".to_string(),
        // 1.1.2023
        r"\b\d{1,2}\.\d{1,2}\.\d{2,4}\b".to_string(),
    ];
    let amount_patterns = [
        // $1,000.00
        r"\$\s?\d+(?:,\d{3})*(?:\.\d{2})?\b".to_string(),
        // 1,000 dollars
        r"\b\d+(?:,\d{3})*\s?(?:dollars|USD|CAD|EUR|GBP)\b".to_string(),
        // 10%
        r"\b\d+\s?%".to_string(),
        // 1.5 million
        r"\b\d+(?:,\d{3})*(?:\.\d+)?\s?(?:million|billion|trillion)\b".to_string(),
    ];
    let number_patterns = [
        // phone-style numbers
        r"\b\d{3}-\d{3}-\d{4}\b".to_string(),
        // 4-digit numbers like years or codes
        r"\b\d{4}\b".to_string(),
        // larger numbers like zip codes or ids
        r"\b\d{5,}\b".to_string(),
    ];

    let mut patterns = Vec::new();
    for (category, group) in [
        ("date", date_patterns.as_slice()),
        ("amount", amount_patterns.as_slice()),
        ("number", number_patterns.as_slice()),
    ] {
        for pattern in group {
            // Patterns are static and known-valid.
            let regex = Regex::new(pattern).expect("static value pattern");
            patterns.push(ValuePattern { category, regex });
        }
    }
    patterns
});

/// Extracts every date, currency amount, percentage, and bare multi-digit
/// number from `answer_text` and requires each to appear verbatim in at
/// least one evidence text.
///
/// Containment is literal substring matching, not semantic: "5%" and "five
/// percent" are distinct, a conservative bias toward rejecting unverified
/// claims.
pub fn numeric_consistency(answer_text: &str, evidence_texts: &[String]) -> GuardOutcome {
    let mut answer_values: Vec<(&'static str, String)> = Vec::new();
    for pattern in VALUE_PATTERNS.iter() {
        for m in pattern.regex.find_iter(answer_text) {
            answer_values.push((pattern.category, m.as_str().to_string()));
        }
    }

    if answer_values.is_empty() {
        return GuardOutcome::pass(GuardName::Numeric, "No numeric values found in answer");
    }

    let missing_values: Vec<String> = answer_values
        .iter()
        .filter(|(_, value)| !evidence_texts.iter().any(|e| e.contains(value)))
        .map(|(category, value)| format!("{category}: {value}"))
        .collect();

    if missing_values.is_empty() {
        return GuardOutcome::pass(
            GuardName::Numeric,
            format!(
                "All {} numeric values in answer are supported by evidence",
                answer_values.len()
            ),
        );
    }

    GuardOutcome::fail(
        GuardName::Numeric,
        format!(
            "Found {} numeric values in answer that don't appear in evidence",
            missing_values.len()
        ),
    )
    .with_detail(serde_json::json!({ "missing_values": missing_values }))
}
