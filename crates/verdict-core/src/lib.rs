//! Verdict library crate (used by the server and integration tests).
//!
//! Answer pipeline for policy Q&A: hybrid retrieval (vector + BM25),
//! cross-encoder reranking, extractive or LLM synthesis, and a battery of
//! evidence guards feeding a confidence gate. Answers that fail validation
//! become fallback responses with an escalation ticket instead of reaching
//! the user.
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Orchestration
//! - [`AskPipeline`], [`PipelineResponse`], [`AnswerMode`] - Per-query flow
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//!
//! ## Retrieval & Ranking
//! - [`HybridRetriever`], [`RetrieverConfig`], [`Candidate`] - Fused retrieval
//! - [`LexicalIndex`], [`LexicalIndexCache`] - BM25 over chunk pools
//! - [`CrossEncoderReranker`], [`RelevanceScorer`] - Shortlist reranking
//!
//! ## Collaborators
//! - [`Embedder`], [`StubEmbedder`], [`RemoteEmbedder`] - Text embedding
//! - [`AnswerSynthesizer`], [`ExtractiveSynthesizer`], [`LlmSynthesizer`]
//! - [`PolicyStore`], [`RulesEngine`], [`Ticketer`] - External systems
//!
//! ## Validation
//! - [`GuardSet`], [`GuardOutcome`], [`GuardName`] - Evidence guards
//! - [`confidence_gate`], [`GuardDecision`] - Accept/reject decision
//!
//! ## Vector Database
//! - [`QdrantSearchClient`], [`VectorSearchBackend`] - Qdrant access
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod answer;
pub mod config;
pub mod embedding;
pub mod gate;
pub mod guards;
pub mod hashing;
pub mod intent;
pub mod lang;
pub mod lexical;
pub mod pipeline;
pub mod policy;
pub mod rerank;
pub mod retrieval;
pub mod rules;
pub mod synthesis;
pub mod ticket;
pub mod vectordb;

pub use answer::{AnswerCandidate, ConfidenceSignals, SourceRef};
pub use config::{Config, ConfigError, DEFAULT_COLLECTION_NAME, DEFAULT_QDRANT_URL};
pub use embedding::{
    Embedder, EmbeddingError, RemoteEmbedder, STUB_EMBEDDING_DIM, StubEmbedder,
};
pub use gate::{
    DEFAULT_CONFIDENCE_THRESHOLD, GateOutcome, GuardDecision, confidence_gate,
};
pub use guards::{
    DEFAULT_MIN_CONFIDENCE, GuardName, GuardOutcome, GuardSet, disambiguation_guard,
    disambiguation_options, language_guard, numeric_consistency, require_citation,
    staleness_guard, temporal_guard,
};
pub use hashing::{hash_doc_key, hash_to_u64};
pub use intent::{
    FREEFORM_INTENT, IntentMatch, RULE_CONFIDENCE_THRESHOLD, RULE_INTENTS, classify,
    extract_slots, slot_options,
};
pub use lang::{SUPPORTED_LANGUAGES, detect_language, is_supported, normalize_hinglish};
pub use lexical::{LexicalHit, LexicalIndex, LexicalIndexBuilder, LexicalIndexCache, tokenize};
pub use pipeline::{
    AnswerMode, AskPipeline, PipelineError, PipelineResponse, PipelineStats, StatsSnapshot,
    evidence_coverage, retrieval_margin, validate_query,
};
pub use policy::{InMemoryPolicyStore, PolicyRecord, PolicyStore, PolicyStoreError};
pub use rerank::{
    CrossEncoderReranker, RelevanceScorer, RemoteScorer, RerankError, RerankedCandidate,
    StubScorer,
};
pub use retrieval::{Candidate, HybridRetriever, RetrieverConfig};
pub use rules::{InMemoryRulesEngine, RuleAnswer, RuleEntry, RuleLookup, RulesEngine};
pub use synthesis::{
    AnswerDraft, AnswerSynthesizer, ExtractiveSynthesizer, LlmSynthesizer, SynthesisError,
};
pub use ticket::{
    LocalTicketer, PLACEHOLDER_TICKET_ID, TicketError, Ticketer, WebhookTicketer, request_ticket,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::{MockVectorSearch, cosine_similarity};
pub use vectordb::{
    ChunkHit, ChunkPayload, ChunkPoint, QdrantSearchClient, VectorDbError, VectorSearchBackend,
};
