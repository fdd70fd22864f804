use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::response::AnswerMode;

/// Running counters over pipeline responses.
#[derive(Debug, Default)]
pub struct PipelineStats {
    total: AtomicU64,
    rules: AtomicU64,
    rag: AtomicU64,
    fallback: AtomicU64,
    disambiguation: AtomicU64,
}

/// Point-in-time view of [`PipelineStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub rules_responses: u64,
    pub rag_responses: u64,
    pub fallback_responses: u64,
    pub disambiguation_responses: u64,
}

impl PipelineStats {
    pub fn record(&self, mode: AnswerMode) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let counter = match mode {
            AnswerMode::Rules => &self.rules,
            AnswerMode::Rag => &self.rag,
            AnswerMode::Fallback => &self.fallback,
            AnswerMode::Disambiguation => &self.disambiguation,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total.load(Ordering::Relaxed),
            rules_responses: self.rules.load(Ordering::Relaxed),
            rag_responses: self.rag.load(Ordering::Relaxed),
            fallback_responses: self.fallback.load(Ordering::Relaxed),
            disambiguation_responses: self.disambiguation.load(Ordering::Relaxed),
        }
    }
}
