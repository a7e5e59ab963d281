// ============================================================
// Layer 2 — Evaluate Use Case (retrieval & scoring harness)
// ============================================================
// Runs one query per clue against a built index and scores the
// ranked results:
//
//   clue ──sanitize──▶ query ──search──▶ top-K hits
//                                           │
//        first hit whose trimmed title == trimmed answer
//                                           │
//                                           ▼
//                        ClueOutcome = Some((answer, rank)) | None
//
// All outcomes are then folded, in clue order, into a RunResult.
// The map step has no shared state, so it can run on a rayon
// pool; the fold stays sequential, which keeps parallel and
// sequential runs identical.

use anyhow::{ensure, Result};
use rayon::prelude::*;

use crate::domain::clue::Clue;
use crate::domain::NULL_SENTINEL;
use crate::domain::run_result::{ClueOutcome, RankedHit, RunResult};
use crate::domain::traits::DocumentIndex;

pub const DEFAULT_TOP_K: usize = 10;

/// Words the query parser treats as operators when upper-case.
const QUERY_OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "IN"];

/// Make clue text safe for the index's query language.
///
/// Only letters, digits and whitespace survive; operator keywords
/// are lower-cased so they are searched as plain terms.
pub fn sanitize_query(text: &str) -> String {
    let stripped: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    stripped
        .split_whitespace()
        .map(|word| {
            if QUERY_OPERATORS.contains(&word) {
                word.to_lowercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rank of the first hit whose trimmed title equals `answer`.
///
/// Every hit is compared; when the answer appears more than once
/// the lowest rank wins.
pub fn first_match(hits: &[RankedHit], answer: &str) -> Option<usize> {
    let mut first: Option<usize> = None;
    let mut matches = 0usize;

    for hit in hits {
        if hit.document_title.trim() == answer {
            matches += 1;
            first.get_or_insert(hit.rank);
        }
    }

    if matches > 1 {
        tracing::debug!("'{}' matched {} hits; keeping rank {:?}", answer, matches, first);
    }
    first
}

/// Search one clue and report where its answer landed, if anywhere.
/// Search failures are logged and count as no hits. A clue without
/// an expected answer never scores.
pub fn score_clue<I>(index: &I, clue: &Clue, top_k: usize) -> ClueOutcome
where
    I: DocumentIndex + ?Sized,
{
    if clue.answer_key() == NULL_SENTINEL {
        tracing::warn!("Clue '{}' has no expected answer; not scored", clue.text);
        return None;
    }

    let query = sanitize_query(&clue.text);
    if query.is_empty() {
        tracing::warn!("Clue for '{}' has no searchable text", clue.answer_key());
        return None;
    }

    let hits = match index.search(&query, top_k) {
        Ok(hits) => hits,
        Err(e) => {
            tracing::warn!("Search failed for clue '{}': {:#}", clue.text, e);
            return None;
        }
    };

    let answer = clue.answer_key();
    let rank = first_match(&hits, answer)?;
    tracing::debug!(
        "Question: {} | Expected: {} | Found at rank {}",
        clue.text,
        answer,
        rank
    );
    Some((answer.to_string(), rank))
}

fn validate(clues: &[Clue], top_k: usize) -> Result<()> {
    ensure!(top_k > 0, "top_k must be positive");
    ensure!(!clues.is_empty(), "no clues to evaluate");
    Ok(())
}

/// Evaluate every clue in order on the current thread.
pub fn evaluate<I>(index: &I, clues: &[Clue], top_k: usize) -> Result<RunResult>
where
    I: DocumentIndex + ?Sized,
{
    validate(clues, top_k)?;
    Ok(RunResult::from_outcomes(
        clues.iter().map(|clue| score_clue(index, clue, top_k)),
    ))
}

/// Same result as `evaluate`, with the per-clue searches spread
/// over `jobs` worker threads.
pub fn evaluate_parallel<I>(index: &I, clues: &[Clue], top_k: usize, jobs: usize) -> Result<RunResult>
where
    I: DocumentIndex + Sync + ?Sized,
{
    validate(clues, top_k)?;
    ensure!(jobs > 0, "jobs must be positive");

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let outcomes: Vec<ClueOutcome> = pool.install(|| {
        clues
            .par_iter()
            .map(|clue| score_clue(index, clue, top_k))
            .collect()
    });
    Ok(RunResult::from_outcomes(outcomes))
}

// ─── EvaluateUseCase ──────────────────────────────────────────────────────────
// Picks the sequential or parallel path from the configured job count.
pub struct EvaluateUseCase {
    top_k: usize,
    jobs:  usize,
}

impl EvaluateUseCase {
    pub fn new(top_k: usize, jobs: usize) -> Self {
        Self { top_k, jobs }
    }

    pub fn execute<I>(&self, index: &I, clues: &[Clue]) -> Result<RunResult>
    where
        I: DocumentIndex + Sync + ?Sized,
    {
        tracing::info!("Searching {} clues (top {})", clues.len(), self.top_k);
        let result = if self.jobs > 1 {
            evaluate_parallel(index, clues, self.top_k, self.jobs)?
        } else {
            evaluate(index, clues, self.top_k)?
        };
        tracing::info!(
            "Search finished: {} of {} clues answered",
            result.correct_count,
            result.total_clues
        );
        Ok(result)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::run_result::{compute_accuracy, compute_mrr};
    use crate::search::tantivy_index::{IndexLocation, TantivyIndex};
    use crate::domain::page::Page;

    /// Canned hit lists keyed by query; unknown queries return nothing.
    struct StubIndex {
        results:  HashMap<String, Vec<&'static str>>,
        failing:  Vec<String>,
        searches: AtomicUsize,
    }

    impl StubIndex {
        fn new(entries: &[(&str, Vec<&'static str>)]) -> Self {
            Self {
                results:  entries.iter().map(|(q, t)| (q.to_string(), t.clone())).collect(),
                failing:  Vec::new(),
                searches: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }
    }

    impl DocumentIndex for StubIndex {
        fn search(&self, query: &str, top_k: usize) -> Result<Vec<RankedHit>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|q| q == query) {
                anyhow::bail!("cannot parse query '{query}'");
            }
            let titles = self.results.get(query).cloned().unwrap_or_default();
            Ok(titles
                .into_iter()
                .take(top_k)
                .enumerate()
                .map(|(i, title)| RankedHit {
                    document_title: title.to_string(),
                    score:          10.0 - i as f32,
                    rank:           i + 1,
                })
                .collect())
        }

        fn num_docs(&self) -> u64 {
            0
        }
    }

    fn clue(text: &str, answer: &str) -> Clue {
        Clue::new("CATEGORY", text, answer)
    }

    #[test]
    fn test_sanitize_strips_query_syntax() {
        assert_eq!(sanitize_query("title:(paris) +franc -rome \"sein\""), "title paris franc rome sein");
        assert_eq!(sanitize_query("rock AND roll OR NOT jazz IN"), "rock and roll or not jazz in");
        assert_eq!(sanitize_query("  a\t\tb \n"), "a b");
        assert_eq!(sanitize_query("?!*"), "");
    }

    #[test]
    fn test_trailing_space_in_answer_still_matches() {
        let index  = StubIndex::new(&[("citi light", vec!["London", "Paris"])]);
        let result = evaluate(&index, &[clue("citi light", "Paris ")], 10).unwrap();
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.positions["Paris"], 2);
    }

    #[test]
    fn test_first_match_wins_over_later_duplicate() {
        let hits = vec!["A", "B", "Paris", "C", "D", "E", "Paris", "F"];
        let index  = StubIndex::new(&[("q", hits)]);
        let result = evaluate(&index, &[clue("q", "Paris")], 10).unwrap();
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.positions["Paris"], 3);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let index  = StubIndex::new(&[("q", vec!["paris"])]);
        let result = evaluate(&index, &[clue("q", "Paris")], 10).unwrap();
        assert_eq!(result.correct_count, 0);
        assert!(result.positions.is_empty());
    }

    #[test]
    fn test_answer_outside_top_k_is_missed() {
        let index  = StubIndex::new(&[("q", vec!["A", "B", "Paris"])]);
        let result = evaluate(&index, &[clue("q", "Paris")], 2).unwrap();
        assert_eq!(result.correct_count, 0);
    }

    #[test]
    fn test_search_error_counts_as_no_hits() {
        let index = StubIndex::new(&[("good", vec!["Rome"])]).failing_on("bad");
        let clues = vec![clue("bad", "Paris"), clue("good", "Rome")];
        let result = evaluate(&index, &clues, 10).unwrap();
        assert_eq!(result.total_clues, 2);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.positions.get("Paris"), None);
    }

    #[test]
    fn test_clue_without_answer_never_scores() {
        let index  = StubIndex::new(&[("foo", vec!["NULL"])]);
        let result = evaluate(&index, &[clue("foo", "")], 10).unwrap();
        assert_eq!(result.correct_count, 0);
        assert!(result.positions.is_empty());
        assert_eq!(index.searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_untitled_page_does_not_match_missing_answer() {
        let pages  = vec![Page::new("", "C", "foo bar"), Page::new("Paris", "C", "foo pari")];
        let index  = TantivyIndex::build(&pages, &IndexLocation::InMemory).unwrap();
        let clues  = [clue("foo", "  "), clue("foo pari", "Paris")];
        let result = evaluate(&index, &clues, 10).unwrap();
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.positions.len(), 1);
        assert_eq!(result.positions["Paris"], 1);
    }

    #[test]
    fn test_unsearchable_clue_skips_index() {
        let index  = StubIndex::new(&[]);
        let result = evaluate(&index, &[clue("?!", "Paris")], 10).unwrap();
        assert_eq!(result.correct_count, 0);
        assert_eq!(index.searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_counts_stay_within_bounds() {
        let index = StubIndex::new(&[
            ("a", vec!["Paris"]),
            ("b", vec!["Oslo", "Rome"]),
            ("c", vec!["Oslo"]),
        ]);
        let clues = vec![clue("a", "Paris"), clue("b", "Rome"), clue("c", "Berlin"), clue("d", "Bern")];
        let result = evaluate(&index, &clues, 10).unwrap();
        assert_eq!(result.total_clues, 4);
        assert_eq!(result.correct_count, 2);
        assert!(result.correct_count <= result.total_clues);
        assert!((compute_mrr(&result.positions) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_against_configured_denominator() {
        let mut entries = Vec::new();
        let mut clues   = Vec::new();
        let queries: Vec<String> = (0..100).map(|i| format!("q{i}")).collect();
        for (i, q) in queries.iter().enumerate() {
            if i < 42 {
                entries.push((q.as_str(), vec!["Answer"]));
            }
            clues.push(clue(q, "Answer"));
        }
        let index  = StubIndex::new(&entries);
        let result = evaluate(&index, &clues, 10).unwrap();
        assert_eq!(result.correct_count, 42);
        assert!((compute_accuracy(&result, 100) - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let index = StubIndex::new(&[("a", vec!["Paris", "Rome"]), ("b", vec!["Rome"])]);
        let clues = vec![clue("a", "Rome"), clue("b", "Rome"), clue("c", "Oslo")];
        let first  = evaluate(&index, &clues, 10).unwrap();
        let second = evaluate(&index, &clues, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let index = StubIndex::new(&[
            ("a", vec!["Paris", "Rome"]),
            ("b", vec!["Rome"]),
            ("d", vec!["X", "Y", "Oslo"]),
        ]);
        let clues: Vec<Clue> = ["a", "b", "c", "d"]
            .iter()
            .cycle()
            .take(40)
            .zip(["Rome", "Rome", "Bern", "Oslo"].iter().cycle())
            .map(|(q, a)| clue(q, a))
            .collect();

        let sequential = evaluate(&index, &clues, 10).unwrap();
        let parallel   = evaluate_parallel(&index, &clues, 10, 4).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        let index = StubIndex::new(&[]);
        assert!(evaluate(&index, &[], 10).is_err());
        assert!(evaluate(&index, &[clue("q", "Paris")], 0).is_err());
        assert!(evaluate_parallel(&index, &[clue("q", "Paris")], 10, 0).is_err());
    }

    #[test]
    fn test_against_tantivy_index() {
        let pages = vec![
            Page::new("Rome", "Capitals", "rome capit itali empir tiber"),
            Page::new("Paris", "Capitals", "pari capit franc sein louvr"),
        ];
        let index = TantivyIndex::build(&pages, &IndexLocation::InMemory).unwrap();
        let clues = vec![
            clue("this citi on the sein hold the louvr", "Paris"),
            clue("AND (tiber) empir:", "Rome"),
        ];
        let result = EvaluateUseCase::new(10, 1).execute(&index, &clues).unwrap();
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.positions["Paris"], 1);
        assert_eq!(result.positions["Rome"], 1);
    }
}
