// ============================================================
// Layer 5 — Tantivy Index
// ============================================================
// Builds a BM25 full-text index over the lemmatized pages and
// answers top-K queries against the `content` field.
//
// Schema (all fields tokenized and stored):
//   title       — page title, returned with every hit
//   categories  — category line
//   content     — lemma stream, the only field queries run against
//
// Hits come back ordered by descending BM25 score; equal scores
// keep tantivy's collector order (by document address).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};

use crate::domain::page::Page;
use crate::domain::run_result::RankedHit;
use crate::domain::traits::DocumentIndex;

pub const TITLE_FIELD:      &str = "title";
pub const CATEGORIES_FIELD: &str = "categories";
pub const CONTENT_FIELD:    &str = "content";

/// Memory budget for the index writer.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Where the index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexLocation {
    InMemory,
    Directory(PathBuf),
}

pub struct TantivyIndex {
    reader:       IndexReader,
    query_parser: QueryParser,
    title:        Field,
}

fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();
    schema_builder.add_text_field(TITLE_FIELD, TEXT | STORED);
    schema_builder.add_text_field(CATEGORIES_FIELD, TEXT | STORED);
    schema_builder.add_text_field(CONTENT_FIELD, TEXT | STORED);
    schema_builder.build()
}

impl TantivyIndex {
    /// Index `pages`, replacing whatever the location already held.
    pub fn build(pages: &[Page], location: &IndexLocation) -> Result<Self> {
        let schema = build_schema();
        let index = match location {
            IndexLocation::InMemory => Index::create_in_ram(schema.clone()),
            IndexLocation::Directory(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Cannot create index directory '{}'", dir.display()))?;
                let mmap = MmapDirectory::open(dir)
                    .with_context(|| format!("Cannot open index directory '{}'", dir.display()))?;
                Index::open_or_create(mmap, schema.clone()).with_context(|| {
                    format!("Index in '{}' has an incompatible schema", dir.display())
                })?
            }
        };

        let title      = schema.get_field(TITLE_FIELD)?;
        let categories = schema.get_field(CATEGORIES_FIELD)?;
        let content    = schema.get_field(CONTENT_FIELD)?;

        let mut writer: IndexWriter = index
            .writer(WRITER_HEAP_BYTES)
            .context("Cannot create index writer")?;
        writer.delete_all_documents()?;

        let total = pages.len();
        for (i, page) in pages.iter().enumerate() {
            writer.add_document(doc!(
                title      => page.title.clone(),
                categories => page.category.clone(),
                content    => page.content.clone(),
            ))?;
            tracing::debug!("Indexed '{}' ({} / {})", page.title, i + 1, total);
        }

        tracing::info!("Committing {} documents", total);
        writer.commit().context("Cannot commit index")?;
        writer.wait_merging_threads()?;

        Self::from_index(index)
    }

    /// Reopen an index previously written by `build`.
    pub fn open(dir: &Path) -> Result<Self> {
        let index = Index::open_in_dir(dir)
            .with_context(|| format!("Cannot open index in '{}'", dir.display()))?;
        Self::from_index(index)
    }

    fn from_index(index: Index) -> Result<Self> {
        let schema  = index.schema();
        let title   = schema.get_field(TITLE_FIELD)?;
        let content = schema.get_field(CONTENT_FIELD)?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .context("Cannot open index reader")?;
        let query_parser = QueryParser::for_index(&index, vec![content]);

        Ok(Self { reader, query_parser, title })
    }
}

impl DocumentIndex for TantivyIndex {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<RankedHit>> {
        ensure!(top_k > 0, "top_k must be positive");

        let parsed = self
            .query_parser
            .parse_query(query)
            .with_context(|| format!("Cannot parse query '{query}'"))?;

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(top_k))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (position, (score, address)) in top_docs.into_iter().enumerate() {
            let document: TantivyDocument = searcher.doc(address)?;
            let document_title = document
                .get_first(self.title)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            hits.push(RankedHit { document_title, score, rank: position + 1 });
        }
        Ok(hits)
    }

    fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}
