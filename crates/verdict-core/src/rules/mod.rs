//! Deterministic rule-based answers.
//!
//! Some intents have exact, database-backed answers that need no retrieval
//! or synthesis. A miss is an expected branch, not an error: [`RuleLookup`]
//! distinguishes "found a row" from "no matching row" so the orchestrator
//! falls through to the retrieval path explicitly.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::answer::SourceRef;

/// A deterministic answer with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAnswer {
    pub answer: String,
    /// Structured fields the answer was templated from (deadline, program).
    pub fields: HashMap<String, String>,
    pub source: SourceRef,
    /// Text from the source row backing the answer, used as guard evidence.
    pub evidence: String,
}

/// Outcome of a rules lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleLookup {
    Found(RuleAnswer),
    /// No matching row; the orchestrator falls through to retrieval.
    NotFound { reason: String },
}

#[async_trait]
/// Lookup of deterministic answers by intent and slots.
pub trait RulesEngine: Send + Sync {
    async fn answer(&self, intent: &str, slots: &HashMap<String, String>) -> RuleLookup;
}

/// One row of the in-process rules table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    pub intent: String,
    /// Slot values this entry requires; an empty map matches any slots.
    pub required_slots: HashMap<String, String>,
    pub answer: RuleAnswer,
}

impl RuleEntry {
    fn matches(&self, intent: &str, slots: &HashMap<String, String>) -> bool {
        self.intent == intent
            && self
                .required_slots
                .iter()
                .all(|(k, v)| slots.get(k).is_some_and(|s| s.eq_ignore_ascii_case(v)))
    }
}

/// Rules engine backed by an in-process table. Entries are matched in
/// insertion order; the first whose required slots are satisfied wins.
#[derive(Debug, Default)]
pub struct InMemoryRulesEngine {
    entries: RwLock<Vec<RuleEntry>>,
}

impl InMemoryRulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<RuleEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn add(&self, entry: RuleEntry) {
        self.entries.write().push(entry);
    }
}

#[async_trait]
impl RulesEngine for InMemoryRulesEngine {
    async fn answer(&self, intent: &str, slots: &HashMap<String, String>) -> RuleLookup {
        let entries = self.entries.read();
        match entries.iter().find(|e| e.matches(intent, slots)) {
            Some(entry) => RuleLookup::Found(entry.answer.clone()),
            None => RuleLookup::NotFound {
                reason: format!("No rule answer for intent '{intent}'"),
            },
        }
    }
}
