use super::outcome::{GuardName, GuardOutcome};

/// Folds the upstream language check into a guard outcome. The flag is
/// computed by the language layer before retrieval; this guard just records
/// it alongside the others.
pub fn language_guard(lang: &str, lang_ok: bool) -> GuardOutcome {
    if lang_ok {
        GuardOutcome::pass(GuardName::Language, format!("Query language '{lang}' is supported"))
    } else {
        GuardOutcome::fail(
            GuardName::Language,
            format!("Query language '{lang}' is not supported"),
        )
    }
}
