use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::answer::{AnswerCandidate, ConfidenceSignals, SourceRef};
use crate::config::Config;
use crate::gate::{GuardDecision, confidence_gate};
use crate::guards::{GuardName, GuardSet, disambiguation_options};
use crate::intent::{self, IntentMatch, classify};
use crate::lang::{detect_language, is_supported, normalize_hinglish};
use crate::policy::PolicyStore;
use crate::rerank::{CrossEncoderReranker, RerankedCandidate};
use crate::retrieval::HybridRetriever;
use crate::rules::{RuleLookup, RulesEngine};
use crate::synthesis::AnswerSynthesizer;
use crate::ticket::{Ticketer, request_ticket};
use crate::vectordb::VectorSearchBackend;

use super::error::PipelineError;
use super::response::{AnswerMode, PipelineResponse};
use super::signals::{evidence_coverage, retrieval_margin, validate_query};
use super::stats::{PipelineStats, StatsSnapshot};

const FALLBACK_TEXT: &str = "I'm sorry, I couldn't find a reliable answer to your question.";
const CLARIFY_TEXT: &str = "Could you please provide more details?";
const LANGUAGE_WARNING: &str = "⚠️ Warning: This answer may not match your query's language.";

/// The full query orchestrator.
///
/// Per query: validate, detect language, classify intent. A confident rule
/// intent takes the deterministic path; everything else goes
/// retrieve → rerank → synthesize. Either path ends in guard evaluation and
/// the confidence gate; a rejected answer becomes a fallback response with
/// an escalation ticket.
pub struct AskPipeline<B: VectorSearchBackend> {
    retriever: HybridRetriever<B>,
    reranker: CrossEncoderReranker,
    synthesizer: Arc<dyn AnswerSynthesizer>,
    guard_set: GuardSet,
    policy_store: Arc<dyn PolicyStore>,
    rules: Arc<dyn RulesEngine>,
    ticketer: Arc<dyn Ticketer>,
    stats: PipelineStats,
    rerank_top_n: usize,
    confidence_threshold: f32,
    ticket_timeout: Duration,
}

impl<B: VectorSearchBackend> std::fmt::Debug for AskPipeline<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AskPipeline")
            .field("rerank_top_n", &self.rerank_top_n)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish_non_exhaustive()
    }
}

impl<B: VectorSearchBackend> AskPipeline<B> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        retriever: HybridRetriever<B>,
        reranker: CrossEncoderReranker,
        synthesizer: Arc<dyn AnswerSynthesizer>,
        rules: Arc<dyn RulesEngine>,
        policy_store: Arc<dyn PolicyStore>,
        ticketer: Arc<dyn Ticketer>,
        config: &Config,
    ) -> Self {
        Self {
            retriever,
            reranker,
            synthesizer,
            guard_set: GuardSet::new(Arc::clone(&policy_store), config),
            policy_store,
            rules,
            ticketer,
            stats: PipelineStats::default(),
            rerank_top_n: config.rerank_top_n,
            confidence_threshold: config.confidence_threshold,
            ticket_timeout: config.ticket_timeout,
        }
    }

    /// Counters over responses served so far.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Answers one query. Queries are independent; the only shared state is
    /// the lexical index cache inside the retriever.
    #[instrument(skip(self))]
    pub async fn ask(
        &self,
        raw_query: &str,
        policy_filter: Option<&str>,
    ) -> Result<PipelineResponse, PipelineError> {
        validate_query(raw_query)?;

        let lang = detect_language(raw_query);
        let lang_ok = is_supported(lang);
        let query = if lang == "hi-en" {
            normalize_hinglish(raw_query)
        } else {
            raw_query.to_string()
        };

        let intent_match = classify(&query);
        debug!(
            intent = %intent_match.intent,
            confidence = intent_match.confidence,
            "Classified query"
        );

        if intent_match.takes_rules_path() {
            if intent_match.slot_coverage() < 0.5 {
                return Ok(self.clarify(intent_match));
            }

            match self
                .rules
                .answer(&intent_match.intent, &intent_match.slots)
                .await
            {
                RuleLookup::Found(rule) => {
                    let mut answer = AnswerCandidate::new(
                        rule.answer,
                        vec![rule.source],
                        vec![rule.evidence],
                    );
                    let coverage = evidence_coverage(&answer.text, &answer.evidence_texts);
                    answer.signals = ConfidenceSignals {
                        margin: 1.0,
                        coverage,
                        lang_ok,
                        factual: None,
                        source_quality: None,
                    };
                    return Ok(self
                        .finish(
                            AnswerMode::Rules,
                            intent_match.intent,
                            answer,
                            &query,
                            lang,
                            lang_ok,
                        )
                        .await);
                }
                RuleLookup::NotFound { reason } => {
                    debug!(reason, "No deterministic answer, using retrieval path");
                }
            }
        }

        let candidates = self.retriever.retrieve(&query, policy_filter).await;
        let shortlist = self
            .reranker
            .rerank(&query, candidates, self.rerank_top_n)
            .await;
        let margin = retrieval_margin(&shortlist);

        let mut answer = self.draft_answer(&query, &shortlist).await;
        let coverage = evidence_coverage(&answer.text, &answer.evidence_texts);
        answer.signals = ConfidenceSignals {
            margin,
            coverage,
            lang_ok,
            factual: None,
            source_quality: None,
        };

        Ok(self
            .finish(
                AnswerMode::Rag,
                intent_match.intent,
                answer,
                &query,
                lang,
                lang_ok,
            )
            .await)
    }

    /// Synthesizes an answer over the shortlist. No evidence or a failed
    /// synthesis yields an empty candidate, which the citation guard rejects.
    async fn draft_answer(
        &self,
        query: &str,
        shortlist: &[RerankedCandidate],
    ) -> AnswerCandidate {
        if shortlist.is_empty() {
            debug!("No evidence survived retrieval and reranking");
            return AnswerCandidate::new("", Vec::new(), Vec::new());
        }

        match self.synthesizer.synthesize(query, shortlist).await {
            Ok(draft) => {
                let sources = shortlist
                    .iter()
                    .map(|c| SourceRef::from_candidate(&c.candidate))
                    .collect();
                let evidence = shortlist
                    .iter()
                    .map(|c| c.candidate.chunk.text.clone())
                    .collect();
                AnswerCandidate::new(draft.text, sources, evidence)
            }
            Err(e) => {
                warn!(error = %e, "Answer synthesis failed");
                AnswerCandidate::new("", Vec::new(), Vec::new())
            }
        }
    }

    /// Fills missing `updated_at` dates from the policy table so the
    /// staleness guard judges retrieval sources by their policy's
    /// `effective_from`.
    async fn attach_source_dates(&self, answer: &mut AnswerCandidate) {
        let unresolved: Vec<String> = answer
            .sources
            .iter()
            .filter(|s| s.updated_at.is_none())
            .filter_map(|s| s.policy_id.clone())
            .collect();
        if unresolved.is_empty() {
            return;
        }

        match self.policy_store.policies_by_ids(&unresolved).await {
            Ok(records) => {
                for source in &mut answer.sources {
                    if source.updated_at.is_some() {
                        continue;
                    }
                    let Some(policy_id) = &source.policy_id else {
                        continue;
                    };
                    if let Some(record) = records.iter().find(|r| &r.id == policy_id) {
                        source.updated_at = record.effective_from;
                    }
                }
            }
            Err(e) => warn!(error = %e, "Could not resolve source dates"),
        }
    }

    /// Guard evaluation and gating shared by both answer paths.
    async fn finish(
        &self,
        mode: AnswerMode,
        intent: String,
        mut answer: AnswerCandidate,
        query: &str,
        lang: &str,
        lang_ok: bool,
    ) -> PipelineResponse {
        self.attach_source_dates(&mut answer).await;

        let gate = confidence_gate(&answer.signals, self.confidence_threshold);
        let outcomes = self.guard_set.evaluate(&answer, lang, lang_ok).await;
        let decision = GuardDecision::from_outcomes(&outcomes);

        if decision.ok && gate.passed {
            if let Some(outcome) = outcomes
                .iter()
                .find(|o| o.guard == GuardName::Disambiguation && !o.passed)
            {
                info!(intent = %intent, "Answer needs clarification");
                let response = PipelineResponse {
                    mode: AnswerMode::Disambiguation,
                    intent: Some(intent),
                    answer_text: answer.text,
                    sources: answer.sources,
                    confidence: decision.confidence,
                    reasons: decision.reasons,
                    ticket_id: None,
                    disambiguation_options: Some(disambiguation_options(outcome)),
                };
                self.stats.record(response.mode);
                return response;
            }

            if outcomes
                .iter()
                .any(|o| o.guard == GuardName::Language && !o.passed)
            {
                answer.prepend_warning(LANGUAGE_WARNING);
            }

            info!(mode = mode.as_str(), confidence = decision.confidence, "Answer accepted");
            let response = PipelineResponse {
                mode,
                intent: Some(intent),
                answer_text: answer.text,
                sources: answer.sources,
                confidence: decision.confidence,
                reasons: decision.reasons,
                ticket_id: None,
                disambiguation_options: None,
            };
            self.stats.record(response.mode);
            return response;
        }

        let mut reasons = decision.reasons;
        if !gate.passed {
            reasons.push(format!("gate: {}", gate.message));
        }
        warn!(?reasons, "Answer rejected, falling back");

        let ticket_id =
            request_ticket(Arc::clone(&self.ticketer), query, &reasons, self.ticket_timeout).await;

        let response = PipelineResponse {
            mode: AnswerMode::Fallback,
            intent: Some(intent),
            answer_text: FALLBACK_TEXT.to_string(),
            sources: Vec::new(),
            confidence: decision.confidence,
            reasons,
            ticket_id: Some(ticket_id),
            disambiguation_options: None,
        };
        self.stats.record(response.mode);
        response
    }

    /// Clarification response for a confident rule intent with too few slots.
    fn clarify(&self, intent_match: IntentMatch) -> PipelineResponse {
        let options: Vec<String> = intent_match
            .missing_slots()
            .into_iter()
            .flat_map(intent::slot_options)
            .collect();

        info!(intent = %intent_match.intent, "Asking for clarification");
        let response = PipelineResponse {
            mode: AnswerMode::Disambiguation,
            intent: Some(intent_match.intent),
            answer_text: CLARIFY_TEXT.to_string(),
            sources: Vec::new(),
            confidence: intent_match.confidence,
            reasons: Vec::new(),
            ticket_id: None,
            disambiguation_options: Some(options),
        };
        self.stats.record(response.mode);
        response
    }
}
