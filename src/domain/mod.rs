// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the evaluation pipeline.
//
// Rules for this layer:
//   - NO tantivy types allowed here
//   - NO stemmer or tokenizer code
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Think of this layer as the "dictionary" of the system:
// it defines what things ARE, not how they work.

/// A corpus page (title, category, lemmatized content)
pub mod page;

/// A quiz clue with its expected answer
pub mod clue;

/// Ranked hits, per-clue outcomes, and run-level metrics
pub mod run_result;

/// Core abstractions (traits) that other layers implement
pub mod traits;

/// Placeholder substituted for any missing text field.
pub const NULL_SENTINEL: &str = "NULL";

/// Returns the trimmed value, or the sentinel when nothing is left.
pub fn or_sentinel(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NULL_SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}
