//! Data contracts flowing between synthesis, guards, and the gate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::retrieval::Candidate;

/// A citation attached to an answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
    pub page: Option<u32>,
    pub title: Option<String>,
    pub policy_id: Option<String>,
    pub section: Option<String>,
    /// Last update of the source document, used by the staleness guard.
    pub updated_at: Option<NaiveDate>,
}

impl SourceRef {
    /// Builds a citation from a retrieval candidate.
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            url: candidate.chunk.url.clone(),
            page: candidate.chunk.page,
            title: None,
            policy_id: candidate.chunk.policy_id.clone(),
            section: if candidate.chunk.section.is_empty() {
                None
            } else {
                Some(candidate.chunk.section.clone())
            },
            updated_at: None,
        }
    }

    /// A source is citable when it carries both a URL and a page number.
    pub fn is_citable(&self) -> bool {
        !self.url.is_empty() && self.page.is_some()
    }
}

/// Upstream quality signals consumed by the confidence gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSignals {
    /// Retrieval margin between the best and runner-up candidate.
    pub margin: f32,
    /// Fraction of the answer grounded in evidence.
    pub coverage: f32,
    /// Whether the detected query language is supported.
    pub lang_ok: bool,
    /// Externally supplied factual-consistency score, if any.
    pub factual: Option<f32>,
    /// Externally supplied source-quality score, if any.
    pub source_quality: Option<f32>,
}

impl Default for ConfidenceSignals {
    fn default() -> Self {
        Self {
            margin: 0.0,
            coverage: 0.0,
            lang_ok: true,
            factual: None,
            source_quality: None,
        }
    }
}

/// A synthesized answer with its evidence, ready for guard evaluation.
///
/// Created once per query by the synthesis collaborator and consumed once by
/// the guard pipeline. The only mutation after creation is prepending warning
/// banners when a guard fails non-fatally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    pub text: String,
    /// Ordered citations backing the answer.
    pub sources: Vec<SourceRef>,
    /// Raw evidence texts the answer was synthesized from.
    pub evidence_texts: Vec<String>,
    pub signals: ConfidenceSignals,
}

impl AnswerCandidate {
    pub fn new(text: impl Into<String>, sources: Vec<SourceRef>, evidence_texts: Vec<String>) -> Self {
        Self {
            text: text.into(),
            sources,
            evidence_texts,
            signals: ConfidenceSignals::default(),
        }
    }

    pub fn with_signals(mut self, signals: ConfidenceSignals) -> Self {
        self.signals = signals;
        self
    }

    /// Prepends a warning banner to the answer text.
    pub fn prepend_warning(&mut self, warning: &str) {
        self.text = format!("{warning}\n\n{}", self.text);
    }

    /// Distinct policy ids referenced by the sources, in first-seen order.
    pub fn policy_ids(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for source in &self.sources {
            if let Some(policy_id) = &source.policy_id {
                if !seen.contains(policy_id) {
                    seen.push(policy_id.clone());
                }
            }
        }
        seen
    }

    /// Most recent `updated_at` among the sources, if any carry one.
    pub fn newest_source_date(&self) -> Option<NaiveDate> {
        self.sources.iter().filter_map(|s| s.updated_at).max()
    }
}
