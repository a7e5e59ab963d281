// ============================================================
// Layer 6 — Lemma Cache
// ============================================================
// Persists the lemmatized corpus so later runs skip the slow
// lemmatization pass.
//
// File format, one stanza per page:
//   __NEWPAGE__
//   TITLE: Paris
//   CATEGORIES: Capitals in Europe
//   CONTENT: pari capit franc sein
//
// Workflow (two passes):
//   cache file present → reload it
//   cache file absent  → lemmatize, write the file, then reload
//                        it from disk
//
// The cache is never checked against the source corpus. After
// the corpus changes, the operator must refresh it
// (`trivia-qa refresh-cache` or `run --refresh-cache`).

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::domain::page::Page;
use crate::domain::NULL_SENTINEL;

const PAGE_MARKER:     &str = "__NEWPAGE__";
const TITLE_PREFIX:    &str = "TITLE:";
const CATEGORY_PREFIX: &str = "CATEGORIES:";
const CONTENT_PREFIX:  &str = "CONTENT:";

/// Pages plus how they were obtained.
#[derive(Debug)]
pub struct CacheLoad {
    pub pages:      Vec<Page>,
    /// True when the file already existed and nothing was lemmatized
    pub cache_hit:  bool,
    /// Zero on a cache hit
    pub lemmatize:  Duration,
    pub reload:     Duration,
}

pub struct LemmaCache {
    path: PathBuf,
}

impl LemmaCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reload the cache if present, otherwise build, store and reload.
    pub fn load_or_build<F>(&self, build: F) -> Result<CacheLoad>
    where
        F: FnOnce() -> Result<Vec<Page>>,
    {
        if self.exists() {
            tracing::info!("Loading lemmatized pages from '{}'", self.path.display());
            let started = Instant::now();
            let pages = self.read()?;
            Ok(CacheLoad {
                pages,
                cache_hit: true,
                lemmatize: Duration::ZERO,
                reload:    started.elapsed(),
            })
        } else {
            tracing::info!("No lemma cache at '{}', lemmatizing corpus", self.path.display());
            self.refresh(build)
        }
    }

    /// Always rebuild and overwrite the cache, then reload it.
    pub fn refresh<F>(&self, build: F) -> Result<CacheLoad>
    where
        F: FnOnce() -> Result<Vec<Page>>,
    {
        let started = Instant::now();
        let built = build()?;
        let lemmatize = started.elapsed();
        self.write(&built)?;

        let started = Instant::now();
        let pages = self.read()?;
        Ok(CacheLoad { pages, cache_hit: false, lemmatize, reload: started.elapsed() })
    }

    /// Write every page as one stanza, replacing the file.
    pub fn write(&self, pages: &[Page]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let file = fs::File::create(&self.path)
            .with_context(|| format!("Cannot write lemma cache '{}'", self.path.display()))?;
        let mut out = BufWriter::new(file);

        for page in pages {
            writeln!(out, "{PAGE_MARKER}")?;
            writeln!(out, "{TITLE_PREFIX} {}", page.title)?;
            writeln!(out, "{CATEGORY_PREFIX} {}", page.category)?;
            writeln!(out, "{CONTENT_PREFIX} {}", page.content)?;
        }
        out.flush()?;

        tracing::info!("Wrote {} lemmatized pages to '{}'", pages.len(), self.path.display());
        Ok(())
    }

    /// Read every stanza back into pages.
    pub fn read(&self) -> Result<Vec<Page>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read lemma cache '{}'", self.path.display()))?;
        let pages = parse_cache(&text);
        tracing::info!("Reloaded {} lemmatized pages", pages.len());
        Ok(pages)
    }
}

#[derive(Default)]
struct Stanza {
    title:    Option<String>,
    category: Option<String>,
    content:  Option<String>,
}

impl Stanza {
    fn into_page(self, line_no: usize) -> Page {
        if self.title.is_none() || self.content.is_none() {
            tracing::warn!(
                "Cache stanza ending at line {} is missing {}; using {}",
                line_no,
                if self.title.is_none() { "its title" } else { "its content" },
                NULL_SENTINEL
            );
        }
        Page::new(
            self.title.unwrap_or_default(),
            self.category.unwrap_or_default(),
            self.content.unwrap_or_default(),
        )
    }
}

/// Parse the cache text. Field lines are matched by prefix.
pub fn parse_cache(text: &str) -> Vec<Page> {
    let mut pages   = Vec::new();
    let mut current: Option<Stanza> = None;
    let mut line_no = 0usize;

    for line in text.lines() {
        line_no += 1;
        if line == PAGE_MARKER {
            if let Some(stanza) = current.take() {
                pages.push(stanza.into_page(line_no - 1));
            }
            current = Some(Stanza::default());
            continue;
        }

        let Some(stanza) = current.as_mut() else {
            tracing::debug!("Line {} outside any page stanza, skipped", line_no);
            continue;
        };

        if let Some(rest) = line.strip_prefix(TITLE_PREFIX) {
            stanza.title = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(CATEGORY_PREFIX) {
            stanza.category = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(CONTENT_PREFIX) {
            stanza.content = Some(rest.trim().to_string());
        } else {
            tracing::debug!("Line {}: unrecognised cache line skipped", line_no);
        }
    }
    if let Some(stanza) = current {
        pages.push(stanza.into_page(line_no));
    }
    pages
}
