//! Confidence gating: the pre-synthesis signal gate and the post-synthesis
//! guard decision.


use serde::{Deserialize, Serialize};

use crate::answer::ConfidenceSignals;
use crate::guards::{GuardName, GuardOutcome};

/// Default acceptance threshold for the pre-synthesis gate.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.6;

const WEIGHT_MARGIN: f32 = 0.3;
const WEIGHT_COVERAGE: f32 = 0.3;
const WEIGHT_LANG: f32 = 0.1;
const WEIGHT_FACTUAL: f32 = 0.2;
const WEIGHT_SOURCE: f32 = 0.1;

/// Confidence penalty applied when a guard fails. Disambiguation is advisory
/// and carries no penalty.
fn guard_penalty(guard: GuardName) -> f32 {
    match guard {
        GuardName::Citation | GuardName::Numeric | GuardName::Temporal | GuardName::Staleness => {
            0.2
        }
        GuardName::Language => 0.1,
        GuardName::Disambiguation => 0.0,
    }
}

/// Result of the pre-synthesis confidence gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub passed: bool,
    /// Weighted score in [0, 1].
    pub score: f32,
    pub message: String,
}

/// Combines retrieval margin, evidence coverage, the language flag, and
/// optional factual/source-quality scores into one weighted score.
///
/// When an optional signal is absent its weight is split evenly between
/// margin and coverage, so the score stays on the same scale either way.
pub fn confidence_gate(signals: &ConfidenceSignals, threshold: f32) -> GateOutcome {
    let mut weight_margin = WEIGHT_MARGIN;
    let mut weight_coverage = WEIGHT_COVERAGE;

    let factual_term = match signals.factual {
        Some(factual) => factual * WEIGHT_FACTUAL,
        None => {
            weight_margin += WEIGHT_FACTUAL * 0.5;
            weight_coverage += WEIGHT_FACTUAL * 0.5;
            0.0
        }
    };
    let source_term = match signals.source_quality {
        Some(source_quality) => source_quality * WEIGHT_SOURCE,
        None => {
            weight_margin += WEIGHT_SOURCE * 0.5;
            weight_coverage += WEIGHT_SOURCE * 0.5;
            0.0
        }
    };

    let margin = signals.margin.clamp(0.0, 1.0);
    let lang = if signals.lang_ok { 1.0 } else { 0.0 };
    let score = margin * weight_margin
        + signals.coverage * weight_coverage
        + lang * WEIGHT_LANG
        + factual_term
        + source_term;

    let passed = score >= threshold;
    let message = if passed {
        format!("Confidence score {score:.2} meets threshold {threshold:.2}")
    } else {
        format!("Confidence score {score:.2} below threshold {threshold:.2}")
    };

    GateOutcome {
        passed,
        score,
        message,
    }
}

/// Aggregate of all guard outcomes for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardDecision {
    /// `true` iff every fatal guard passed.
    pub ok: bool,
    /// Reason codes for every failed guard, fatal or advisory.
    pub reasons: Vec<String>,
    /// `1.0` minus the penalties of failed guards, floored at zero.
    pub confidence: f32,
}

impl GuardDecision {
    /// Derives the overall decision from joined guard outcomes.
    pub fn from_outcomes(outcomes: &[GuardOutcome]) -> Self {
        let ok = outcomes
            .iter()
            .filter(|o| o.guard.is_fatal())
            .all(|o| o.passed);

        let reasons = outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(GuardOutcome::reason_code)
            .collect();

        let penalty: f32 = outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| guard_penalty(o.guard))
            .sum();
        let confidence = (1.0 - penalty).max(0.0);

        Self {
            ok,
            reasons,
            confidence,
        }
    }
}
