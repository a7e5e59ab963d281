// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two external collaborators (normalizer and index) and the
// two input sources are reached only through these traits, so
// the harness can be tested against a stub index and the loaders
// against in-memory text.

use anyhow::Result;

use crate::domain::clue::Clue;
use crate::domain::page::RawPage;
use crate::domain::run_result::RankedHit;

// ─── PageSource ───────────────────────────────────────────────────────────────
/// Any component that can produce raw corpus pages.
///
/// Implementations:
///   - WikiCorpusLoader → a directory of wiki dump files
pub trait PageSource {
    fn load_all(&self) -> Result<Vec<RawPage>>;
}

// ─── ClueSource ───────────────────────────────────────────────────────────────
/// Any component that can produce quiz clues (raw, not lemmatized).
///
/// Implementations:
///   - ClueFileLoader → a 4-line-stanza text file
pub trait ClueSource {
    fn load_all(&self) -> Result<Vec<Clue>>;
}

// ─── TextNormalizer ───────────────────────────────────────────────────────────
/// Which tokens survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosFilter {
    /// Nouns, verbs and adjectives only
    ContentWords,
    /// Every token
    All,
}

/// Turns raw text into an ordered sequence of lemma tokens.
///
/// Implementations:
///   - SnowballNormalizer → rust-stemmers English + function-word filter
pub trait TextNormalizer {
    fn lemmatize(&self, text: &str, filter: PosFilter) -> Vec<String>;
}

// ─── DocumentIndex ────────────────────────────────────────────────────────────
/// A built, read-only full-text index.
///
/// `search` returns at most `top_k` hits ordered by descending score,
/// with 1-based ranks. Tie order among equal scores is defined by the
/// implementation. A query the index cannot parse is an `Err`.
///
/// Implementations:
///   - TantivyIndex → BM25 over the `content` field
pub trait DocumentIndex {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<RankedHit>>;

    /// Number of indexed documents.
    fn num_docs(&self) -> u64;
}

