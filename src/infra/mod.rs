// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence and reporting:
//
//   lemma_cache.rs — Lemmatized-corpus snapshot
//                    Loads the cache file if present, otherwise
//                    lemmatizes, writes it, and reads it back.
//                    Never invalidated automatically.
//
//   index_store.rs — On-disk index directory
//                    Builds or reopens the tantivy index and
//                    keeps a JSON build manifest beside it.
//
//   report.rs      — Run summary
//                    Accuracy, MRR and per-stage timings,
//                    rendered for the console.

/// Lemmatized-corpus cache file
pub mod lemma_cache;

/// Index directory and build manifest
pub mod index_store;

/// Stage timings and the printable run report
pub mod report;
