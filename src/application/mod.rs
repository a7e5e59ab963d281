// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal.
//
// Rules for this layer:
//   - No tantivy code here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and the scoring harness

/// Retrieval & scoring harness: one query per clue, rank of the
/// first correct hit, fold into a RunResult
pub mod evaluate_use_case;

/// The full lemmatize → cache → index → search → score workflow
pub mod pipeline_use_case;
