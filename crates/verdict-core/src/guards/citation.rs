use crate::answer::SourceRef;

use super::outcome::{GuardName, GuardOutcome};

/// Every factual claim must be traceable to a specific page: at least one
/// source needs both a non-empty URL and a page number.
pub fn require_citation(sources: &[SourceRef]) -> GuardOutcome {
    if sources.is_empty() {
        return GuardOutcome::fail(GuardName::Citation, "Answer lacks any source citations");
    }

    let valid_sources = sources.iter().filter(|s| s.is_citable()).count();
    if valid_sources == 0 {
        return GuardOutcome::fail(
            GuardName::Citation,
            "Answer lacks valid source citations with URL and page number",
        );
    }

    GuardOutcome::pass(
        GuardName::Citation,
        format!("Answer contains {valid_sources} valid source citations"),
    )
}
