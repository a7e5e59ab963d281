// ============================================================
// Layer 5 — Search Layer (tantivy)
// ============================================================
// All tantivy-specific code lives here. Other layers only see
// the DocumentIndex trait and RankedHit values.
//
//   tantivy_index.rs — schema, index build, BM25 top-K search

pub mod tantivy_index;
