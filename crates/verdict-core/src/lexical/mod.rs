//! In-memory lexical (BM25) ranking over a candidate chunk pool.
//!
//! An index is immutable once built: adding documents means building a fresh
//! index and swapping it into the cache, so concurrent readers never observe
//! a partially built corpus.

pub mod cache;
pub mod index;

#[cfg(test)]
mod tests;

pub use cache::LexicalIndexCache;
pub use index::{LexicalHit, LexicalIndex, LexicalIndexBuilder, tokenize};
