// ============================================================
// Layer 4 — Clue File Loader
// ============================================================
// Reads the quiz file: repeating stanzas of exactly four lines.
//
//   NEWSPAPERS                         ← category
//   The dominant paper in our ...      ← clue text
//   The Washington Post                ← expected answer
//                                      ← blank separator
//
// A partial stanza at end of file is kept with "NULL" in its
// missing fields.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::clue::Clue;
use crate::domain::traits::ClueSource;

pub struct ClueFileLoader {
    path: PathBuf,
}

impl ClueFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClueSource for ClueFileLoader {
    fn load_all(&self) -> Result<Vec<Clue>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read clue file '{}'", self.path.display()))?;
        let clues = parse_clues(&text);
        tracing::info!("Loaded {} clues from '{}'", clues.len(), self.path.display());
        Ok(clues)
    }
}

/// Parse 4-line stanzas into clues, in file order.
pub fn parse_clues(raw_text: &str) -> Vec<Clue> {
    let mut clues  = Vec::new();
    let mut fields: Vec<&str> = Vec::with_capacity(3);

    for (line_no, line) in raw_text.lines().enumerate() {
        if fields.len() < 3 {
            fields.push(line);
            continue;
        }

        // Fourth line of the stanza: the separator
        if !line.trim().is_empty() {
            tracing::warn!(
                "Line {}: expected a blank separator after clue '{}', found '{}'",
                line_no + 1,
                fields[1],
                line
            );
        }
        clues.push(Clue::new(fields[0], fields[1], fields[2]));
        fields.clear();
    }

    if !fields.is_empty() {
        if fields.len() < 3 || fields.iter().any(|f| f.trim().is_empty()) {
            tracing::warn!(
                "Incomplete final clue stanza ({} of 3 fields); missing fields set to NULL",
                fields.len()
            );
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or("");
        clues.push(Clue::new(field(0), field(1), field(2)));
    }

    clues
}
