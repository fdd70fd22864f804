use super::{FREEFORM_INTENT, classify, extract_slots};

#[test]
fn extracts_program_and_semester() {
    let slots = extract_slots("fee deadline for BTech semester 3");
    assert_eq!(slots.get("program").map(String::as_str), Some("btech"));
    assert_eq!(slots.get("semester").map(String::as_str), Some("3"));
}

#[test]
fn extracts_campus() {
    let slots = extract_slots("hostel fee at the north campus");
    assert_eq!(slots.get("campus").map(String::as_str), Some("north"));
}

#[test]
fn classifies_fee_deadline_with_slots() {
    let result = classify("When is the fee deadline for BTech semester 3?");
    assert_eq!(result.intent, "fee_deadline");
    assert!(result.takes_rules_path());
    assert!(result.missing_slots().is_empty());
}

#[test]
fn classifies_scholarship_deadline() {
    let result = classify("What is the scholarship form deadline for BBA?");
    assert_eq!(result.intent, "scholarship_form_deadline");
    assert!(result.takes_rules_path());
}

#[test]
fn unrelated_query_is_freeform() {
    let result = classify("Tell me about the library's history");
    assert_eq!(result.intent, FREEFORM_INTENT);
    assert!(!result.takes_rules_path());
}

#[test]
fn empty_query_is_freeform_with_zero_confidence() {
    let result = classify("  ");
    assert_eq!(result.intent, FREEFORM_INTENT);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn missing_slots_lower_confidence_and_are_reported() {
    let with_slots = classify("fee deadline for BTech semester 3");
    let without_slots = classify("when is the fee deadline");

    assert!(with_slots.confidence > without_slots.confidence);
    assert!(without_slots.missing_slots().contains(&"program"));
}
