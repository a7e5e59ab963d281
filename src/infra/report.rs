// ============================================================
// Layer 6 — Run Report
// ============================================================
// Summary of one evaluation run, printed by the CLI layer.
//
// Example output:
//   =======================================================
//   Measurements:
//   Correct:  42 / 100 clues (top 10)
//   Accuracy: 42.00%
//   MRR:      0.61
//   Indexed:  5400 pages
//   =======================================================
//   Processing time:
//   Lemmatizing:    cache hit
//   Cache reload:   1.84 s
//   Index build:    12.07 s
//   Searching:      215 ms
//   =======================================================
//
// Console text only; nothing here is meant to be parsed.

use std::fmt;
use std::time::Duration;

use crate::domain::run_result::RunResult;

const RULE: &str = "=======================================================";

/// Elapsed wall time of each pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Zero when the lemma cache was hit
    pub lemmatize:   Duration,
    pub reload:      Duration,
    /// Index build, or open when an existing index was reused
    pub index_build: Duration,
    pub search:      Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run:                RunResult,
    pub accuracy:           f64,
    pub mrr:                f64,
    pub top_k:              usize,
    pub expected_questions: usize,
    pub cache_hit:          bool,
    pub index_reused:       bool,
    /// Documents in the index that was searched
    pub indexed_docs:       u64,
    pub timings:            StageTimings,
}

fn secs(d: Duration) -> String {
    format!("{:.2} s", d.as_secs_f64())
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Measurements:")?;
        writeln!(
            f,
            "Correct:  {} / {} clues (top {})",
            self.run.correct_count, self.run.total_clues, self.top_k
        )?;
        writeln!(
            f,
            "Accuracy: {:.2}% (of {} expected questions)",
            self.accuracy, self.expected_questions
        )?;
        writeln!(f, "MRR:      {:.2}", self.mrr)?;
        writeln!(f, "Indexed:  {} pages", self.indexed_docs)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Processing time:")?;
        if self.cache_hit {
            writeln!(f, "Lemmatizing:    cache hit")?;
        } else {
            writeln!(f, "Lemmatizing:    {}", secs(self.timings.lemmatize))?;
        }
        writeln!(f, "Cache reload:   {}", secs(self.timings.reload))?;
        let index_label = if self.index_reused { "Index open:" } else { "Index build:" };
        writeln!(f, "{:<16}{}", index_label, secs(self.timings.index_build))?;
        writeln!(f, "Searching:      {} ms", self.timings.search.as_millis())?;
        write!(f, "{RULE}")
    }
}
