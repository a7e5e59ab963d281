// ============================================================
// Layer 3 — Run Result and Retrieval Metrics
// ============================================================
// The evaluation harness maps each clue to a ClueOutcome and then
// folds the outcomes, in input order, into one RunResult.
//
// Metrics:
//   accuracy = correct_count / total_questions * 100
//              (total_questions is the configured constant, not
//               the number of clues actually loaded)
//   MRR      = mean of 1/rank over clues that matched at all
//              (unmatched clues are in neither numerator nor
//               denominator)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub document_title: String,
    pub score:          f32,
    /// 1-based position within the result list for one query
    pub rank:           usize,
}

/// Trimmed expected answer → rank of its first correct hit.
pub type PositionRecord = BTreeMap<String, usize>;

/// Result of scoring a single clue: the answer key and the rank of
/// the first matching hit, or None when nothing in the top-K matched.
pub type ClueOutcome = Option<(String, usize)>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub total_clues:   usize,
    pub correct_count: usize,
    pub positions:     PositionRecord,
}

impl RunResult {
    /// Fold per-clue outcomes into a RunResult.
    ///
    /// Every outcome counts toward total_clues; matched outcomes bump
    /// correct_count and write their rank. Clues sharing an answer
    /// share a key, so the later clue's rank replaces the earlier one.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ClueOutcome>,
    {
        outcomes.into_iter().fold(Self::default(), |mut acc, outcome| {
            acc.total_clues += 1;
            if let Some((answer, rank)) = outcome {
                acc.correct_count += 1;
                acc.positions.insert(answer, rank);
            }
            acc
        })
    }
}

/// Percentage of correctly answered clues against a fixed denominator.
/// Returns 0.0 when `total_questions` is zero.
pub fn compute_accuracy(result: &RunResult, total_questions: usize) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    result.correct_count as f64 / total_questions as f64 * 100.0
}

/// Mean reciprocal rank over the clues present in `positions`.
/// An empty mapping has no defined mean; it is reported as 0.0.
pub fn compute_mrr(positions: &PositionRecord) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }
    let sum: f64 = positions.values().map(|&rank| 1.0 / rank as f64).sum();
    sum / positions.len() as f64
}
