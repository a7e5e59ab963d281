// ============================================================
// Layer 5 — NLP Layer
// ============================================================
// All stemming/tokenizing code lives here; no other layer
// imports rust-stemmers.
//
//   normalizer.rs — SnowballNormalizer: alphanumeric tokenizer,
//                   function-word filter, English stemmer

pub mod normalizer;
