//! Keyword-pattern intent classification and slot extraction for the
//! deterministic rules path.
//!
//! Matching is token overlap against per-intent example phrasings; anything
//! below the pattern floor is classified `freeform` and handled by the
//! retrieval path. Combined confidence weighs the pattern match at 0.7 and
//! slot completeness at 0.3.

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::lexical::tokenize;

/// Intent used when no rule intent matches with enough confidence.
pub const FREEFORM_INTENT: &str = "freeform";

/// Minimum pattern score (out of 100) to consider a rule intent at all.
const PATTERN_FLOOR: f32 = 60.0;

/// Minimum combined confidence to take the rules path.
pub const RULE_CONFIDENCE_THRESHOLD: f32 = 0.6;

/// Intents with deterministic, database-backed answers.
pub const RULE_INTENTS: [&str; 5] = [
    "fee_deadline",
    "scholarship_form_deadline",
    "timetable_release",
    "hostel_fee_due",
    "exam_form_deadline",
];

/// Example phrasings per rule intent, matched by token overlap.
static INTENT_PATTERNS: LazyLock<HashMap<&'static str, Vec<&'static str>>> =
    LazyLock::new(|| {
        HashMap::from([
            (
                "fee_deadline",
                vec![
                    "when is the fee deadline",
                    "last date to pay fees",
                    "fee payment due date",
                    "when do i pay my fees",
                    "tuition fee deadline",
                ],
            ),
            (
                "scholarship_form_deadline",
                vec![
                    "scholarship form deadline",
                    "last date for scholarship application",
                    "when is the scholarship form due",
                    "deadline for filling scholarship form",
                ],
            ),
            (
                "timetable_release",
                vec![
                    "when is the timetable released",
                    "exam timetable release date",
                    "when will the schedule be published",
                ],
            ),
            (
                "hostel_fee_due",
                vec![
                    "hostel fee due date",
                    "when is the hostel fee due",
                    "last date to pay hostel fees",
                ],
            ),
            (
                "exam_form_deadline",
                vec![
                    "exam form deadline",
                    "last date to fill exam form",
                    "when is the exam form due",
                ],
            ),
        ])
    });

/// Slots each rule intent wants filled.
static INTENT_SLOTS: LazyLock<HashMap<&'static str, Vec<&'static str>>> = LazyLock::new(|| {
    HashMap::from([
        ("fee_deadline", vec!["program", "semester"]),
        ("scholarship_form_deadline", vec!["program"]),
        ("timetable_release", vec!["program", "semester"]),
        ("hostel_fee_due", vec!["campus"]),
        ("exam_form_deadline", vec!["program", "semester"]),
    ])
});

/// Known values per slot, matched as whole tokens.
static SLOT_VALUES: LazyLock<HashMap<&'static str, Vec<&'static str>>> = LazyLock::new(|| {
    HashMap::from([
        (
            "program",
            vec!["btech", "mtech", "bba", "mba", "bsc", "msc", "bcom", "mcom"],
        ),
        ("campus", vec!["main", "city", "north", "south"]),
    ])
});

static SEMESTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:semester|sem)\s*([1-8])\b").expect("static semester pattern")
});

/// A classification result: intent, extracted slots, combined confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentMatch {
    pub intent: String,
    pub slots: HashMap<String, String>,
    pub confidence: f32,
}

impl IntentMatch {
    /// Whether the match is a rule intent confident enough for the
    /// deterministic path.
    pub fn takes_rules_path(&self) -> bool {
        self.intent != FREEFORM_INTENT && self.confidence >= RULE_CONFIDENCE_THRESHOLD
    }

    /// Fraction of the intent's wanted slots that were filled.
    pub fn slot_coverage(&self) -> f32 {
        slot_confidence(&self.intent, &self.slots)
    }

    /// Wanted slots that are still missing.
    pub fn missing_slots(&self) -> Vec<&'static str> {
        INTENT_SLOTS
            .get(self.intent.as_str())
            .map(|wanted| {
                wanted
                    .iter()
                    .filter(|slot| !self.slots.contains_key(**slot))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Example values for a slot, used as clarification chips when the slot is
/// missing from an otherwise confident rule-intent match.
pub fn slot_options(slot: &str) -> Vec<String> {
    match slot {
        "semester" => (1..=8).map(|n| format!("semester {n}")).collect(),
        other => SLOT_VALUES
            .get(other)
            .map(|values| values.iter().map(|v| v.to_string()).collect())
            .unwrap_or_default(),
    }
}

/// Extracts program, semester, and campus slots from a query.
pub fn extract_slots(text: &str) -> HashMap<String, String> {
    let tokens: HashSet<String> = tokenize(text).into_iter().collect();
    let mut slots = HashMap::new();

    for (slot, values) in SLOT_VALUES.iter() {
        if let Some(value) = values.iter().find(|v| tokens.contains(**v)) {
            slots.insert(slot.to_string(), value.to_string());
        }
    }

    if let Some(captures) = SEMESTER_PATTERN.captures(text) {
        if let Some(semester) = captures.get(1) {
            slots.insert("semester".to_string(), semester.as_str().to_string());
        }
    }

    slots
}

/// Token-overlap score between the query and one pattern, out of 100.
fn pattern_score(query_tokens: &HashSet<String>, pattern: &str) -> f32 {
    let pattern_tokens: HashSet<String> = tokenize(pattern).into_iter().collect();
    if pattern_tokens.is_empty() {
        return 0.0;
    }
    let overlap = query_tokens.intersection(&pattern_tokens).count();
    100.0 * overlap as f32 / pattern_tokens.len() as f32
}

fn slot_confidence(intent: &str, slots: &HashMap<String, String>) -> f32 {
    let Some(wanted) = INTENT_SLOTS.get(intent) else {
        return 1.0;
    };
    if wanted.is_empty() {
        return 1.0;
    }
    let filled = wanted.iter().filter(|s| slots.contains_key(**s)).count();
    filled as f32 / wanted.len() as f32
}

/// Classifies a query against the rule intents and extracts its slots.
pub fn classify(text: &str) -> IntentMatch {
    let slots = extract_slots(text);
    if text.trim().is_empty() {
        return IntentMatch {
            intent: FREEFORM_INTENT.to_string(),
            slots,
            confidence: 0.0,
        };
    }

    let query_tokens: HashSet<String> = tokenize(text).into_iter().collect();

    let mut best_intent = FREEFORM_INTENT;
    let mut best_score = 0.0f32;
    for intent in RULE_INTENTS {
        let score = INTENT_PATTERNS
            .get(intent)
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|p| pattern_score(&query_tokens, p))
                    .fold(0.0f32, f32::max)
            })
            .unwrap_or(0.0);
        if score > best_score {
            best_score = score;
            best_intent = intent;
        }
    }

    if best_score < PATTERN_FLOOR {
        return IntentMatch {
            intent: FREEFORM_INTENT.to_string(),
            slots,
            confidence: 0.0,
        };
    }

    let combined = (best_score / 100.0) * 0.7 + slot_confidence(best_intent, &slots) * 0.3;
    if combined >= RULE_CONFIDENCE_THRESHOLD {
        IntentMatch {
            intent: best_intent.to_string(),
            slots,
            confidence: combined,
        }
    } else {
        IntentMatch {
            intent: FREEFORM_INTENT.to_string(),
            slots,
            confidence: combined,
        }
    }
}
