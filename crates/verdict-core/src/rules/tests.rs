use std::collections::HashMap;

use crate::answer::SourceRef;

use super::{InMemoryRulesEngine, RuleAnswer, RuleEntry, RuleLookup, RulesEngine};

fn entry(intent: &str, required: &[(&str, &str)], answer: &str) -> RuleEntry {
    RuleEntry {
        intent: intent.to_string(),
        required_slots: required
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        answer: RuleAnswer {
            answer: answer.to_string(),
            fields: HashMap::new(),
            source: SourceRef {
                url: "/policies/fees.pdf".to_string(),
                page: Some(3),
                policy_id: Some("fees-2023".to_string()),
                ..SourceRef::default()
            },
            evidence: answer.to_string(),
        },
    }
}

fn slots(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn found_when_slots_match() {
    let engine = InMemoryRulesEngine::with_entries(vec![entry(
        "fee_deadline",
        &[("program", "btech")],
        "The fee deadline for BTech is October 31, 2023.",
    )]);

    let lookup = engine
        .answer("fee_deadline", &slots(&[("program", "btech")]))
        .await;
    match lookup {
        RuleLookup::Found(answer) => assert!(answer.answer.contains("October 31, 2023")),
        RuleLookup::NotFound { .. } => panic!("expected a rule answer"),
    }
}

#[tokio::test]
async fn slot_matching_is_case_insensitive() {
    let engine = InMemoryRulesEngine::with_entries(vec![entry(
        "fee_deadline",
        &[("program", "btech")],
        "The fee deadline for BTech is October 31, 2023.",
    )]);

    let lookup = engine
        .answer("fee_deadline", &slots(&[("program", "BTech")]))
        .await;
    assert!(matches!(lookup, RuleLookup::Found(_)));
}

#[tokio::test]
async fn not_found_when_slot_differs() {
    let engine = InMemoryRulesEngine::with_entries(vec![entry(
        "fee_deadline",
        &[("program", "btech")],
        "The fee deadline for BTech is October 31, 2023.",
    )]);

    let lookup = engine
        .answer("fee_deadline", &slots(&[("program", "mba")]))
        .await;
    assert!(matches!(lookup, RuleLookup::NotFound { .. }));
}

#[tokio::test]
async fn not_found_for_unknown_intent() {
    let engine = InMemoryRulesEngine::new();
    let lookup = engine.answer("fee_deadline", &HashMap::new()).await;
    assert!(matches!(lookup, RuleLookup::NotFound { .. }));
}

#[tokio::test]
async fn first_matching_entry_wins() {
    let engine = InMemoryRulesEngine::with_entries(vec![
        entry("fee_deadline", &[], "Generic deadline answer."),
        entry("fee_deadline", &[("program", "btech")], "BTech answer."),
    ]);

    let lookup = engine
        .answer("fee_deadline", &slots(&[("program", "btech")]))
        .await;
    match lookup {
        RuleLookup::Found(answer) => assert_eq!(answer.answer, "Generic deadline answer."),
        RuleLookup::NotFound { .. } => panic!("expected a rule answer"),
    }
}
