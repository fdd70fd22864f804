use super::{detect_language, is_supported, normalize_hinglish};

#[test]
fn english_text_detected() {
    assert_eq!(detect_language("When is the fee deadline?"), "en");
}

#[test]
fn devanagari_detected_as_hindi() {
    assert_eq!(detect_language("छात्रवृत्ति की अंतिम तिथि क्या है"), "hi");
}

#[test]
fn mixed_script_detected_as_hinglish() {
    assert_eq!(detect_language("scholarship form कब तक bharna hai"), "hi-en");
}

#[test]
fn empty_text_defaults_to_english() {
    assert_eq!(detect_language(""), "en");
    assert_eq!(detect_language("   "), "en");
}

#[test]
fn supported_languages() {
    assert!(is_supported("en"));
    assert!(is_supported("hi"));
    assert!(is_supported("hi-en"));
    assert!(!is_supported("fr"));
}

#[test]
fn hinglish_phrases_are_rewritten() {
    assert_eq!(
        normalize_hinglish("scholarship form kab tak bharna hai"),
        "scholarship form deadline for filling"
    );
    // Longer phrases win over their fragments.
    assert!(!normalize_hinglish("kab tak jama").contains("kab"));
}

#[test]
fn misspellings_are_corrected() {
    let normalized = normalize_hinglish("exm form dedline");
    assert!(normalized.contains("exam"));
    assert!(normalized.contains("deadline"));
}
