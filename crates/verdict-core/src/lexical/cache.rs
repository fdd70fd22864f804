use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use crate::vectordb::ChunkPayload;

use super::index::{LexicalIndex, LexicalIndexBuilder};

/// Cache key used when no scoping filter applies.
const GLOBAL_KEY: &str = "global";

/// Per-filter cache of lexical indices.
///
/// Keys are scoping filters (a policy id, or `global`), so unrelated query
/// topics never share an index. Rebuilds are copy-and-swap: a stale entry is
/// replaced by a freshly built `Arc<LexicalIndex>` while in-flight readers
/// keep the old one.
pub struct LexicalIndexCache {
    cache: Cache<String, Arc<LexicalIndex>>,
}

impl std::fmt::Debug for LexicalIndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalIndexCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl LexicalIndexCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::new(capacity),
        }
    }

    fn cache_key(policy_filter: Option<&str>) -> String {
        policy_filter.unwrap_or(GLOBAL_KEY).to_string()
    }

    /// Returns the cached index for `policy_filter` if it covers `pool`,
    /// otherwise builds a fresh index over `pool` and swaps it in.
    pub fn get_or_build(
        &self,
        policy_filter: Option<&str>,
        pool: &[ChunkPayload],
    ) -> Arc<LexicalIndex> {
        let key = Self::cache_key(policy_filter);

        if let Some(index) = self.cache.get(&key) {
            if index.covers(pool.iter()) {
                debug!(key, docs = index.len(), "Reusing cached lexical index");
                return index;
            }
            debug!(key, "Cached lexical index is stale, rebuilding");
        } else {
            debug!(key, "No cached lexical index, building");
        }

        let mut builder = LexicalIndexBuilder::new();
        builder.extend(pool.iter().cloned());
        let index = Arc::new(builder.build());

        self.cache.insert(key, Arc::clone(&index));
        index
    }

    /// Drops the cached index for `policy_filter` (e.g. after re-ingestion).
    pub fn invalidate(&self, policy_filter: Option<&str>) {
        self.cache.invalidate(&Self::cache_key(policy_filter));
    }

    /// Number of cached indices.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
