// ============================================================
// Layer 6 — Index Store
// ============================================================
// Owns the on-disk index directory and a small JSON manifest
// written after every successful build.
//
// Layout:
//   wiki-index-dir/
//     build_manifest.json   ← page count, cache path, schema fields
//     meta.json, *.idx ...  ← tantivy segment files
//
// With `reuse_index` the pipeline opens the existing index
// instead of rebuilding it, provided the manifest is present.
// Like the lemma cache, the stored index is not checked against
// its inputs; a rebuild is the operator's call.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::page::Page;
use crate::search::tantivy_index::{
    IndexLocation, TantivyIndex, CATEGORIES_FIELD, CONTENT_FIELD, TITLE_FIELD,
};

const MANIFEST_FILE: &str = "build_manifest.json";

/// What went into the stored index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    pub page_count: usize,
    pub cache_path: String,
    pub fields:     Vec<String>,
}

/// Either a fresh build or a reopened index.
pub struct OpenedIndex {
    pub index:  TantivyIndex,
    pub reused: bool,
}

pub struct IndexStore {
    /// None keeps the index in memory only
    dir: Option<PathBuf>,
}

impl IndexStore {
    pub fn on_disk(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()) }
    }

    pub fn in_memory() -> Self {
        Self { dir: None }
    }

    fn location(&self) -> IndexLocation {
        match &self.dir {
            Some(dir) => IndexLocation::Directory(dir.clone()),
            None      => IndexLocation::InMemory,
        }
    }

    /// Reopen the stored index when asked and possible, otherwise
    /// build a new one from `pages`.
    pub fn open_or_build(
        &self,
        pages:       &[Page],
        cache_path:  &Path,
        reuse_index: bool,
    ) -> Result<OpenedIndex> {
        if reuse_index {
            match &self.dir {
                Some(dir) => match self.load_manifest()? {
                    Some(manifest) => {
                        tracing::info!(
                            "Reusing index in '{}' ({} pages from '{}')",
                            dir.display(),
                            manifest.page_count,
                            manifest.cache_path
                        );
                        if manifest.page_count != pages.len() {
                            tracing::warn!(
                                "Index holds {} pages but the cache has {}; rerun without reuse to rebuild",
                                manifest.page_count,
                                pages.len()
                            );
                        }
                        let index = TantivyIndex::open(dir)?;
                        return Ok(OpenedIndex { index, reused: true });
                    }
                    None => tracing::warn!(
                        "No build manifest in '{}'; rebuilding index",
                        dir.display()
                    ),
                },
                None => tracing::warn!("Cannot reuse an in-memory index; building a new one"),
            }
        }

        tracing::info!("Indexing {} pages", pages.len());
        let index = TantivyIndex::build(pages, &self.location())?;
        self.save_manifest(&BuildManifest {
            page_count: pages.len(),
            cache_path: cache_path.display().to_string(),
            fields:     [TITLE_FIELD, CATEGORIES_FIELD, CONTENT_FIELD]
                .iter()
                .map(|f| f.to_string())
                .collect(),
        })?;
        Ok(OpenedIndex { index, reused: false })
    }

    /// Write the manifest next to the index. No-op in memory.
    pub fn save_manifest(&self, manifest: &BuildManifest) -> Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;
        tracing::debug!("Saved build manifest to '{}'", path.display());
        Ok(())
    }

    /// Read the manifest, or None if there is none.
    pub fn load_manifest(&self) -> Result<Option<BuildManifest>> {
        let Some(dir) = &self.dir else {
            return Ok(None);
        };
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest '{}'", path.display()))?;
        let manifest = serde_json::from_str(&json)
            .with_context(|| format!("Malformed manifest '{}'", path.display()))?;
        Ok(Some(manifest))
    }
}
