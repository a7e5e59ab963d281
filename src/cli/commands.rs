// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `run` and `refresh-cache`, and
// their flags. Every flag has a default, so a bare `trivia-qa run`
// runs the whole pipeline on the standard data layout.

use clap::{Args, Subcommand};

use crate::application::evaluate_use_case::DEFAULT_TOP_K;
use crate::application::pipeline_use_case::{PipelineConfig, DEFAULT_EXPECTED_QUESTIONS};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lemmatize (or load cached lemmas), index, search every clue and print the scores
    Run(RunArgs),

    /// Re-lemmatize the corpus and overwrite the lemma cache
    RefreshCache(RefreshArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory of wiki dump files
    #[arg(long, default_value = "data/wiki-pages")]
    pub corpus_dir: String,

    /// Clue file (category, clue, answer, blank line)
    #[arg(long, default_value = "data/questions.txt")]
    pub clues: String,

    /// Lemmatized-corpus cache file; created on first run
    #[arg(long, default_value = "data/lemmatized-pages.txt")]
    pub cache: String,

    /// Directory the index is written to
    #[arg(long, default_value = "wiki-index-dir", conflicts_with = "in_memory")]
    pub index_dir: String,

    /// Keep the index in memory instead of on disk
    #[arg(long)]
    pub in_memory: bool,

    /// Number of ranked hits inspected per clue
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Accuracy denominator; stays fixed even if the clue file
    /// holds a different number of clues
    #[arg(long, default_value_t = DEFAULT_EXPECTED_QUESTIONS)]
    pub expected_questions: usize,

    /// Rebuild the lemma cache even if it exists
    #[arg(long)]
    pub refresh_cache: bool,

    /// Open the existing index instead of rebuilding it
    #[arg(long)]
    pub reuse_index: bool,

    /// Append the clue category to each query
    #[arg(long)]
    pub with_category: bool,

    /// Worker threads for the search stage (1 = sequential)
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,
}

/// Convert CLI RunArgs into the application-layer PipelineConfig.
impl From<RunArgs> for PipelineConfig {
    fn from(a: RunArgs) -> Self {
        PipelineConfig {
            corpus_dir:         a.corpus_dir,
            clues_path:         a.clues,
            cache_path:         a.cache,
            index_dir:          (!a.in_memory).then_some(a.index_dir),
            top_k:              a.top_k,
            expected_questions: a.expected_questions,
            refresh_cache:      a.refresh_cache,
            reuse_index:        a.reuse_index,
            with_category:      a.with_category,
            jobs:               a.jobs,
        }
    }
}

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Directory of wiki dump files
    #[arg(long, default_value = "data/wiki-pages")]
    pub corpus_dir: String,

    /// Lemmatized-corpus cache file to overwrite
    #[arg(long, default_value = "data/lemmatized-pages.txt")]
    pub cache: String,
}

impl From<RefreshArgs> for PipelineConfig {
    fn from(a: RefreshArgs) -> Self {
        PipelineConfig {
            corpus_dir: a.corpus_dir,
            cache_path: a.cache,
            ..PipelineConfig::default()
        }
    }
}
