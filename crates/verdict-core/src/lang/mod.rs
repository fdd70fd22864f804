//! Query language detection and normalization.
//!
//! The pipeline answers English, Hindi, and romanized Hindi-English mixed
//! queries ("Hinglish"). Detection is a script heuristic, not a full
//! language model: Devanagari codepoints mark Hindi, and a Hindi query with a
//! substantial share of Latin characters is treated as Hinglish.

#[cfg(test)]
mod tests;

use std::sync::LazyLock;

use regex::Regex;

/// Languages the pipeline can answer in.
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "hi", "hi-en"];

/// Romanized-Hindi phrases and common misspellings mapped to the English
/// vocabulary the retrieval layer indexes.
const HINGLISH_REPLACEMENTS: [(&str, &str); 12] = [
    ("kab tak bharna hai", "deadline for filling"),
    ("kab tak jama", "deadline for submission"),
    ("kab tak", "deadline"),
    ("kab hai", "when is"),
    ("kitna hai", "how much is"),
    ("kaise kare", "how to do"),
    ("schlrshp", "scholarship"),
    ("skolarship", "scholarship"),
    ("exm", "exam"),
    ("fess", "fees"),
    ("dedline", "deadline"),
    ("tymtbl", "timetable"),
];

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Detects the query language: `en`, `hi`, or `hi-en`.
pub fn detect_language(text: &str) -> &'static str {
    let total = text.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return "en";
    }

    let devanagari = text.chars().filter(|c| is_devanagari(*c)).count();
    if devanagari == 0 {
        return "en";
    }

    let latin = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if latin as f32 / total as f32 > 0.25 {
        "hi-en"
    } else {
        "hi"
    }
}

/// Whether the pipeline supports answering in `lang`.
pub fn is_supported(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&lang)
}

/// Rewrites Hinglish phrases into the English vocabulary the index knows.
/// Longer phrases are replaced first so their fragments don't shadow them.
pub fn normalize_hinglish(text: &str) -> String {
    let mut normalized = text.to_lowercase();
    for (hinglish, english) in HINGLISH_REPLACEMENTS {
        normalized = normalized.replace(hinglish, english);
    }
    WHITESPACE.replace_all(normalized.trim(), " ").into_owned()
}
