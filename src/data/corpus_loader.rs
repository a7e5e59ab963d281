// ============================================================
// Layer 4 — Wiki Corpus Loader
// ============================================================
// Loads wiki dump files from a directory and splits them into
// pages.
//
// Dump layout:
//   [[Paris]]                          ← title line starts a page
//
//   CATEGORIES: Capitals in Europe     ← category line (optional)
//
//   Paris is the capital and most...   ← everything else is body
//   ==History==
//   ...
//   [[Rome]]                           ← next page
//
// Blank lines are skipped. Body lines are joined with single
// spaces. The last page of every file is kept.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::fs;

use anyhow::{Context, Result};
use regex::Regex;

use crate::domain::page::RawPage;
use crate::domain::traits::PageSource;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[(.+?)\]\]").expect("title pattern is valid"));

/// Marker token that identifies a category line.
pub const CATEGORY_MARKER: &str = "CATEGORIES";

/// Loads every regular file in a corpus directory.
pub struct WikiCorpusLoader {
    dir: PathBuf,
}

impl WikiCorpusLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Corpus files in lexical file-name order.
    fn corpus_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read corpus directory '{}'", self.dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl PageSource for WikiCorpusLoader {
    fn load_all(&self) -> Result<Vec<RawPage>> {
        let files = self.corpus_files()?;
        let mut pages = Vec::new();

        for (file_num, path) in files.iter().enumerate() {
            let text = read_corpus_file(path)?;
            let parsed = parse_pages(&text);
            tracing::debug!(
                "Parsed {} pages from '{}' (file {}/{})",
                parsed.len(),
                path.display(),
                file_num + 1,
                files.len()
            );
            pages.extend(parsed);
        }

        tracing::info!("Loaded {} pages from {} corpus files", pages.len(), files.len());
        Ok(pages)
    }
}

fn read_corpus_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;
    // Wiki dumps occasionally carry stray bytes; keep going with U+FFFD.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Split one dump file's text into raw pages.
pub fn parse_pages(raw_text: &str) -> Vec<RawPage> {
    let mut pages: Vec<RawPage> = Vec::new();
    let mut current: Option<RawPage> = None;
    let mut orphan_lines = 0usize;

    for line in raw_text.lines() {
        if let Some(caps) = TITLE_RE.captures(line) {
            pages.extend(current.take());
            current = Some(RawPage {
                title: caps[1].trim().to_string(),
                ..RawPage::default()
            });
            continue;
        }

        let Some(page) = current.as_mut() else {
            if !line.trim().is_empty() {
                orphan_lines += 1;
            }
            continue;
        };

        if line.contains(CATEGORY_MARKER) {
            page.category = Some(category_text(line));
        } else if !line.trim().is_empty() {
            if !page.text.is_empty() {
                page.text.push(' ');
            }
            page.text.push_str(line.trim());
        }
    }
    pages.extend(current);

    if orphan_lines > 0 {
        tracing::debug!("Ignored {} lines before the first page title", orphan_lines);
    }
    pages
}

/// Text after the `CATEGORIES:` marker, or the whole line if the
/// colon is missing.
fn category_text(line: &str) -> String {
    let after_marker = line
        .split_once(CATEGORY_MARKER)
        .map(|(_, rest)| rest)
        .unwrap_or(line);
    after_marker.trim_start_matches(':').trim().to_string()
}
