// ============================================================
// Layer 2 — PipelineUseCase
// ============================================================
// Orchestrates a full evaluation run in order:
//
//   Step 1: Load and lemmatize clues      (Layer 4 + 5)
//   Step 2: Lemmatized corpus via cache   (Layer 4 + 5 + 6)
//   Step 3: Build or reopen the index     (Layer 5 + 6)
//   Step 4: Search and score every clue   (Layer 2 - evaluate)
//   Step 5: Accuracy, MRR, stage timings  (Layer 3 + 6)
//
// Each stage returns its own result and timing; nothing is kept
// in shared state between stages.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::application::evaluate_use_case::{EvaluateUseCase, DEFAULT_TOP_K};
use crate::data::{clue_loader::ClueFileLoader, corpus_loader::WikiCorpusLoader};
use crate::domain::clue::Clue;
use crate::domain::page::{Page, RawPage};
use crate::domain::run_result::{compute_accuracy, compute_mrr};
use crate::domain::traits::{ClueSource, DocumentIndex, PageSource, PosFilter, TextNormalizer};
use crate::infra::{
    index_store::IndexStore,
    lemma_cache::{CacheLoad, LemmaCache},
    report::{PipelineReport, StageTimings},
};
use crate::nlp::normalizer::{lemmatize_text, SnowballNormalizer};

/// Size of the quiz the accuracy denominator is fixed to.
pub const DEFAULT_EXPECTED_QUESTIONS: usize = 100;

// ─── Pipeline Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub corpus_dir:         String,
    pub clues_path:         String,
    pub cache_path:         String,
    /// None keeps the index in memory
    pub index_dir:          Option<String>,
    pub top_k:              usize,
    pub expected_questions: usize,
    pub refresh_cache:      bool,
    pub reuse_index:        bool,
    pub with_category:      bool,
    pub jobs:               usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus_dir:         "data/wiki-pages".to_string(),
            clues_path:         "data/questions.txt".to_string(),
            cache_path:         "data/lemmatized-pages.txt".to_string(),
            index_dir:          Some("wiki-index-dir".to_string()),
            top_k:              DEFAULT_TOP_K,
            expected_questions: DEFAULT_EXPECTED_QUESTIONS,
            refresh_cache:      false,
            reuse_index:        false,
            with_category:      false,
            jobs:               1,
        }
    }
}

// ─── PipelineUseCase ─────────────────────────────────────────────────────────
pub struct PipelineUseCase {
    config:     PipelineConfig,
    normalizer: SnowballNormalizer,
}

impl PipelineUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, normalizer: SnowballNormalizer::new() }
    }

    /// Run the whole pipeline and return the report.
    pub fn execute(&self) -> Result<PipelineReport> {
        let cfg = &self.config;
        ensure!(cfg.top_k > 0, "top_k must be positive");
        ensure!(cfg.jobs > 0, "jobs must be positive");
        let config_json = serde_json::to_string(cfg)?;
        tracing::debug!("Pipeline config: {}", config_json);

        // ── Step 1: Clues ─────────────────────────────────────────────────────
        let raw_clues = ClueFileLoader::new(&cfg.clues_path).load_all()?;
        ensure!(!raw_clues.is_empty(), "clue file '{}' contains no clues", cfg.clues_path);
        if raw_clues.len() != cfg.expected_questions {
            tracing::warn!(
                "Loaded {} clues but accuracy is computed against {} expected questions",
                raw_clues.len(),
                cfg.expected_questions
            );
        }
        let clues = self.lemmatize_clues(&raw_clues);

        // ── Step 2: Lemmatized corpus ─────────────────────────────────────────
        let cache = self.lemma_cache();
        let CacheLoad { pages, cache_hit, lemmatize, reload } = if cfg.refresh_cache {
            cache.refresh(|| self.lemmatize_corpus())?
        } else {
            cache.load_or_build(|| self.lemmatize_corpus())?
        };
        if pages.is_empty() {
            tracing::warn!("Lemma cache '{}' holds no pages", cache.path().display());
        }

        // ── Step 3: Index ─────────────────────────────────────────────────────
        let started = Instant::now();
        let store = match &cfg.index_dir {
            Some(dir) => IndexStore::on_disk(dir),
            None      => IndexStore::in_memory(),
        };
        let opened = store.open_or_build(&pages, cache.path(), cfg.reuse_index)?;
        let index_build = started.elapsed();
        let indexed_docs = opened.index.num_docs();
        tracing::info!("Index holds {} documents", indexed_docs);
        drop(pages);

        // ── Step 4: Search ────────────────────────────────────────────────────
        let started = Instant::now();
        let run = EvaluateUseCase::new(cfg.top_k, cfg.jobs).execute(&opened.index, &clues)?;
        let search = started.elapsed();

        // ── Step 5: Metrics ───────────────────────────────────────────────────
        let accuracy = compute_accuracy(&run, cfg.expected_questions);
        let mrr      = compute_mrr(&run.positions);

        Ok(PipelineReport {
            run,
            accuracy,
            mrr,
            top_k:              cfg.top_k,
            expected_questions: cfg.expected_questions,
            cache_hit,
            index_reused:       opened.reused,
            indexed_docs,
            timings:            StageTimings { lemmatize, reload, index_build, search },
        })
    }

    /// Re-lemmatize the corpus and overwrite the cache. Returns the
    /// number of cached pages.
    pub fn refresh_cache(&self) -> Result<usize> {
        let load = self.lemma_cache().refresh(|| self.lemmatize_corpus())?;
        Ok(load.pages.len())
    }

    fn lemma_cache(&self) -> LemmaCache {
        LemmaCache::new(PathBuf::from(&self.config.cache_path))
    }

    /// Load raw pages and reduce each body to content-word lemmas.
    fn lemmatize_corpus(&self) -> Result<Vec<Page>> {
        let raw_pages = WikiCorpusLoader::new(Path::new(&self.config.corpus_dir)).load_all()?;
        tracing::info!("Lemmatizing {} pages", raw_pages.len());
        Ok(lemmatize_pages(&self.normalizer, raw_pages))
    }

    /// Clue text keeps every token; the category is appended when
    /// category expansion is on.
    fn lemmatize_clues(&self, clues: &[Clue]) -> Vec<Clue> {
        clues
            .iter()
            .map(|clue| {
                let mut text = lemmatize_text(&self.normalizer, &clue.text, PosFilter::All);
                if self.config.with_category {
                    let category = lemmatize_text(&self.normalizer, &clue.category, PosFilter::All);
                    if !category.is_empty() {
                        text.push(' ');
                        text.push_str(&category);
                    }
                }
                clue.with_text(text)
            })
            .collect()
    }
}

fn lemmatize_pages<N>(normalizer: &N, raw_pages: Vec<RawPage>) -> Vec<Page>
where
    N: TextNormalizer + ?Sized,
{
    let total = raw_pages.len();
    raw_pages
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            tracing::debug!("Lemmatizing page '{}' ({} / {})", raw.title, i + 1, total);
            let content = lemmatize_text(normalizer, &raw.text, PosFilter::ContentWords);
            raw.into_page(content)
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CORPUS_A: &str = "\
[[Paris]]
CATEGORIES: Capitals in Europe
Paris is the capital of France and home of the Louvre museum.
The Seine river flows through the city.

[[Rome]]
CATEGORIES: Capitals in Europe
Rome is the capital of Italy. The Tiber river crosses the ancient city.
";

    const CORPUS_B: &str = "\
[[Oslo]]
Oslo is the capital of Norway, at the head of a fjord.
";

    const CLUES: &str = "\
MUSEUMS
This city on the Seine holds the Louvre
Paris

RIVERS
The Tiber runs through this ancient capital
Rome

FJORDS
A Norwegian capital at the head of a fjord
Oslo

DESERTS
Sand dunes and camels
Cairo

";

    struct Fixture {
        _dir:   tempfile::TempDir,
        config: PipelineConfig,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("wiki-pages");
        fs::create_dir_all(&corpus).unwrap();
        fs::write(corpus.join("a.txt"), CORPUS_A).unwrap();
        fs::write(corpus.join("b.txt"), CORPUS_B).unwrap();
        fs::write(dir.path().join("questions.txt"), CLUES).unwrap();

        let path = |name: &str| dir.path().join(name).display().to_string();
        let config = PipelineConfig {
            corpus_dir:         path("wiki-pages"),
            clues_path:         path("questions.txt"),
            cache_path:         path("lemmas.txt"),
            index_dir:          Some(path("index")),
            expected_questions: 4,
            ..PipelineConfig::default()
        };
        Fixture { _dir: dir, config }
    }

    #[test]
    fn test_full_run_scores_clues() {
        let f = fixture();
        let report = PipelineUseCase::new(f.config.clone()).execute().unwrap();

        assert_eq!(report.run.total_clues, 4);
        assert_eq!(report.run.correct_count, 3);
        assert_eq!(report.run.positions["Paris"], 1);
        assert_eq!(report.run.positions["Rome"], 1);
        assert_eq!(report.run.positions["Oslo"], 1);
        assert!((report.accuracy - 75.0).abs() < 1e-9);
        assert!((report.mrr - 1.0).abs() < 1e-9);
        assert!(!report.cache_hit);
        assert!(!report.index_reused);
        assert_eq!(report.indexed_docs, 3);
    }

    #[test]
    fn test_second_run_hits_cache_and_reuses_index() {
        let f = fixture();
        let first = PipelineUseCase::new(f.config.clone()).execute().unwrap();

        let config = PipelineConfig { reuse_index: true, ..f.config.clone() };
        let second = PipelineUseCase::new(config).execute().unwrap();

        assert!(second.cache_hit);
        assert!(second.index_reused);
        assert_eq!(second.indexed_docs, first.indexed_docs);
        assert_eq!(first.run, second.run);
    }

    #[test]
    fn test_stale_cache_is_used_until_refreshed() {
        let f = fixture();
        PipelineUseCase::new(f.config.clone()).execute().unwrap();

        // Drop Oslo from the corpus; the cache still has it
        fs::remove_file(Path::new(&f.config.corpus_dir).join("b.txt")).unwrap();
        let stale = PipelineUseCase::new(f.config.clone()).execute().unwrap();
        assert_eq!(stale.run.positions.get("Oslo"), Some(&1));

        let use_case = PipelineUseCase::new(f.config.clone());
        assert_eq!(use_case.refresh_cache().unwrap(), 2);
        let fresh = use_case.execute().unwrap();
        assert_eq!(fresh.run.positions.get("Oslo"), None);
    }

    #[test]
    fn test_accuracy_uses_expected_questions() {
        let f = fixture();
        let config = PipelineConfig { expected_questions: 100, index_dir: None, ..f.config.clone() };
        let report = PipelineUseCase::new(config).execute().unwrap();
        assert!((report.accuracy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let f = fixture();
        let sequential = PipelineUseCase::new(f.config.clone()).execute().unwrap();
        let config = PipelineConfig { jobs: 3, ..f.config.clone() };
        let parallel = PipelineUseCase::new(config).execute().unwrap();
        assert_eq!(sequential.run, parallel.run);
    }

    #[test]
    fn test_category_expansion_appends_category() {
        let f = fixture();
        let config = PipelineConfig { with_category: true, ..f.config.clone() };
        let use_case = PipelineUseCase::new(config);
        let clues = use_case.lemmatize_clues(&[Clue::new("RIVERS", "The Tiber", "Rome")]);
        assert_eq!(clues[0].text, "the tiber river");
    }

    #[test]
    fn test_missing_clue_file_is_fatal() {
        let f = fixture();
        let config = PipelineConfig { clues_path: "does/not/exist.txt".to_string(), ..f.config.clone() };
        assert!(PipelineUseCase::new(config).execute().is_err());
    }

    #[test]
    fn test_missing_corpus_is_fatal_without_cache() {
        let f = fixture();
        let config = PipelineConfig { corpus_dir: "does/not/exist".to_string(), ..f.config.clone() };
        assert!(PipelineUseCase::new(config).execute().is_err());
    }
}
