use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::hashing::hash_doc_key;
use crate::vectordb::ChunkPayload;

// Okapi BM25 constants, matching the defaults of the original index.
const BM25_K1: f32 = 1.5;
const BM25_B: f32 = 0.75;
// Negative idf values (terms in most documents) are replaced by
// EPSILON * average idf rather than discarded.
const BM25_EPSILON: f32 = 0.25;

/// Tokenizes text for indexing and querying: lowercase, split on
/// non-alphanumerics, drop single-character tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_string())
        .collect()
}

/// One scored lexical search result.
#[derive(Debug, Clone)]
pub struct LexicalHit {
    /// BM25 score, always > 0.
    pub score: f32,
    /// The matched chunk (text plus provenance).
    pub chunk: ChunkPayload,
}

/// Accumulates documents and produces an immutable [`LexicalIndex`].
#[derive(Debug, Default)]
pub struct LexicalIndexBuilder {
    docs: Vec<ChunkPayload>,
}

impl LexicalIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one chunk to the corpus.
    pub fn push(&mut self, chunk: ChunkPayload) {
        self.docs.push(chunk);
    }

    /// Adds many chunks, preserving order.
    pub fn extend(&mut self, chunks: impl IntoIterator<Item = ChunkPayload>) {
        self.docs.extend(chunks);
    }

    /// Tokenizes the corpus and derives BM25 statistics.
    pub fn build(self) -> LexicalIndex {
        let doc_count = self.docs.len();
        debug!(docs = doc_count, "Building lexical index");

        let mut term_freqs: Vec<HashMap<String, u32>> = Vec::with_capacity(doc_count);
        let mut doc_freqs: HashMap<String, u32> = HashMap::new();
        let mut doc_len: Vec<f32> = Vec::with_capacity(doc_count);
        let mut policy_docs: HashMap<String, Vec<usize>> = HashMap::new();
        let mut doc_keys: HashSet<u64> = HashSet::with_capacity(doc_count);

        for (idx, doc) in self.docs.iter().enumerate() {
            let tokens = tokenize(&doc.text);
            doc_len.push(tokens.len() as f32);

            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(freqs);

            if let Some(policy_id) = &doc.policy_id {
                policy_docs.entry(policy_id.clone()).or_default().push(idx);
            }
            doc_keys.insert(hash_doc_key(&doc.url, doc.page));
        }

        let avgdl = if doc_count > 0 {
            doc_len.iter().sum::<f32>() / doc_count as f32
        } else {
            0.0
        };

        // Standard Okapi idf with the epsilon floor for very common terms.
        let n = doc_count as f32;
        let mut idf: HashMap<String, f32> = HashMap::with_capacity(doc_freqs.len());
        let mut idf_sum = 0.0f32;
        let mut negative_terms: Vec<String> = Vec::new();

        for (term, df) in &doc_freqs {
            let value = ((n - *df as f32 + 0.5) / (*df as f32 + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative_terms.push(term.clone());
            }
            idf.insert(term.clone(), value);
        }

        if !idf.is_empty() {
            let average_idf = idf_sum / idf.len() as f32;
            let floor = BM25_EPSILON * average_idf;
            for term in negative_terms {
                idf.insert(term, floor);
            }
        }

        LexicalIndex {
            docs: self.docs,
            term_freqs,
            doc_len,
            idf,
            avgdl,
            policy_docs,
            doc_keys,
        }
    }
}

/// Immutable BM25 index over a chunk pool.
pub struct LexicalIndex {
    docs: Vec<ChunkPayload>,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_len: Vec<f32>,
    idf: HashMap<String, f32>,
    avgdl: f32,
    policy_docs: HashMap<String, Vec<usize>>,
    doc_keys: HashSet<u64>,
}

impl std::fmt::Debug for LexicalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalIndex")
            .field("docs", &self.docs.len())
            .field("terms", &self.idf.len())
            .field("avgdl", &self.avgdl)
            .finish()
    }
}

impl LexicalIndex {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Returns `true` if every `(url, page)` key in `chunks` is indexed.
    ///
    /// Used by the cache to detect a stale index whose corpus no longer
    /// covers the current candidate pool.
    pub fn covers<'a>(&self, chunks: impl IntoIterator<Item = &'a ChunkPayload>) -> bool {
        chunks
            .into_iter()
            .all(|c| self.doc_keys.contains(&hash_doc_key(&c.url, c.page)))
    }

    fn score_doc(&self, idx: usize, query_tokens: &[String]) -> f32 {
        let freqs = &self.term_freqs[idx];
        let dl = self.doc_len[idx];
        let norm = BM25_K1 * (1.0 - BM25_B + BM25_B * dl / self.avgdl.max(f32::EPSILON));

        query_tokens
            .iter()
            .filter_map(|token| {
                let idf = *self.idf.get(token)?;
                let tf = *freqs.get(token)? as f32;
                Some(idf * tf * (BM25_K1 + 1.0) / (tf + norm))
            })
            .sum()
    }

    /// Scores the corpus against `query`, returning up to `top_k` hits with a
    /// positive score, best first. Ties preserve insertion order.
    ///
    /// When `policy_filter` is set, documents outside the policy score zero
    /// and are excluded; the index itself is shared across filters.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        policy_filter: Option<&str>,
    ) -> Vec<LexicalHit> {
        if self.docs.is_empty() {
            return Vec::new();
        }

        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let indices: Vec<usize> = match policy_filter {
            Some(policy_id) => match self.policy_docs.get(policy_id) {
                Some(indices) => indices.clone(),
                None => {
                    debug!(policy_id, "No documents indexed for policy");
                    return Vec::new();
                }
            },
            None => (0..self.docs.len()).collect(),
        };

        let mut scored: Vec<(usize, f32)> = indices
            .into_iter()
            .map(|idx| (idx, self.score_doc(idx, &query_tokens)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // sort_by is stable, so equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(idx, score)| LexicalHit {
                score,
                chunk: self.docs[idx].clone(),
            })
            .collect()
    }
}
