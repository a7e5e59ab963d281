// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw input files and the lemmatized
// records the index and the harness consume.
//
//   wiki dump files             quiz file
//       │                           │
//       ▼                           ▼
//   WikiCorpusLoader          ClueFileLoader
//       │                           │
//       ▼                           ▼
//   TextNormalizer (nlp layer) ─────┘
//       │
//       ▼
//   Preprocessor      → single-line lemma stream
//       │
//       ▼
//   LemmaCache (infra layer)

/// Splits wiki dump files into raw pages
pub mod corpus_loader;

/// Parses the 4-line-stanza clue file
pub mod clue_loader;

/// Cleans lemma streams for caching and indexing
pub mod preprocessor;
