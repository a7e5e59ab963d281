// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. `clap` turns the
// command line into typed argument structs; each subcommand is
// converted into a PipelineConfig and handed to Layer 2
// (application). This is the only layer that writes to stdout;
// everything else reports through `tracing`.
//
// Two commands are supported:
//   1. `run`           — lemmatize (or load the cache), index the
//                        corpus, search every clue, print the report
//   2. `refresh-cache` — re-lemmatize the corpus and overwrite the
//                        lemma cache, without searching
//
// Typical use:
//   trivia-qa refresh-cache --corpus-dir data/wiki-pages
//   trivia-qa run --reuse-index --jobs 4

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, RefreshArgs, RunArgs};

use crate::application::pipeline_use_case::PipelineUseCase;

/// Top-level parser; clap derives the argument handling from
/// the fields.
#[derive(Parser, Debug)]
#[command(
    name = "trivia-qa",
    version,
    about = "Index a wiki corpus and score how well it answers trivia clues (accuracy@K, MRR)."
)]
pub struct Cli {
    /// The subcommand to run (run or refresh-cache)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to its handler.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args)          => Self::run_pipeline(args),
            Commands::RefreshCache(args) => Self::run_refresh(args),
        }
    }

    /// Full evaluation run; prints the measurements and stage timings.
    fn run_pipeline(args: RunArgs) -> Result<()> {
        tracing::info!("Evaluating clues from '{}' against '{}'", args.clues, args.corpus_dir);

        let report = PipelineUseCase::new(args.into()).execute()?;
        println!("{report}");
        Ok(())
    }

    /// Rebuild the lemma cache only.
    fn run_refresh(args: RefreshArgs) -> Result<()> {
        let cache = args.cache.clone();
        tracing::info!("Refreshing lemma cache '{}' from '{}'", cache, args.corpus_dir);

        let pages = PipelineUseCase::new(args.into()).refresh_cache()?;
        println!("Lemma cache '{cache}' rebuilt with {pages} pages.");
        Ok(())
    }
}
