use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, instrument};

use crate::answer::AnswerCandidate;
use crate::config::Config;
use crate::policy::PolicyStore;

use super::citation::require_citation;
use super::disambiguation::{DEFAULT_MIN_CONFIDENCE, disambiguation_guard};
use super::language::language_guard;
use super::numeric::numeric_consistency;
use super::outcome::GuardOutcome;
use super::staleness::staleness_guard;
use super::temporal::temporal_guard;

/// Runs all evidence guards over one answer candidate.
///
/// Guards have no data dependency on each other; they run concurrently and
/// their outcomes are joined before aggregation. No guard ever propagates an
/// error upward.
pub struct GuardSet {
    policy_store: Arc<dyn PolicyStore>,
    freshness_window_days: i64,
    max_source_age_days: i64,
    min_disambiguation_confidence: f32,
}

impl std::fmt::Debug for GuardSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardSet")
            .field("freshness_window_days", &self.freshness_window_days)
            .field("max_source_age_days", &self.max_source_age_days)
            .finish_non_exhaustive()
    }
}

impl GuardSet {
    pub fn new(policy_store: Arc<dyn PolicyStore>, config: &Config) -> Self {
        Self {
            policy_store,
            freshness_window_days: config.freshness_window_days,
            max_source_age_days: config.max_source_age_days,
            min_disambiguation_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Evaluates every guard against `answer` as of today.
    pub async fn evaluate(
        &self,
        answer: &AnswerCandidate,
        lang: &str,
        lang_ok: bool,
    ) -> Vec<GuardOutcome> {
        self.evaluate_as_of(answer, lang, lang_ok, Utc::now().date_naive())
            .await
    }

    /// Evaluates every guard with an explicit reference date.
    #[instrument(skip(self, answer), fields(sources = answer.sources.len()))]
    pub async fn evaluate_as_of(
        &self,
        answer: &AnswerCandidate,
        lang: &str,
        lang_ok: bool,
        today: NaiveDate,
    ) -> Vec<GuardOutcome> {
        let temporal = temporal_guard(
            answer,
            self.policy_store.as_ref(),
            self.freshness_window_days,
            today,
        );
        let citation = async { require_citation(&answer.sources) };
        let numeric = async { numeric_consistency(&answer.text, &answer.evidence_texts) };
        let staleness = async {
            staleness_guard(answer.newest_source_date(), self.max_source_age_days, today)
        };
        let disambiguation =
            async { disambiguation_guard(&answer.text, self.min_disambiguation_confidence) };
        let language = async { language_guard(lang, lang_ok) };

        let (citation, numeric, temporal, staleness, disambiguation, language) =
            tokio::join!(citation, numeric, temporal, staleness, disambiguation, language);

        let outcomes = vec![citation, numeric, temporal, staleness, disambiguation, language];
        for outcome in &outcomes {
            debug!(guard = %outcome.guard, passed = outcome.passed, reason = %outcome.reason, "Guard evaluated");
        }
        outcomes
    }
}
