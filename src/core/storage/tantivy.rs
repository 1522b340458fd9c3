//! Tantivy implementation of the index lifecycle.
//!
//! An index "exists" when its directory holds tantivy metadata. A missing
//! path, or an existing directory without metadata, takes the create
//! branch; anything else that fails to open is reported, never repaired.

use std::fs;
use std::path::{Path, PathBuf};

use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexWriter, TantivyDocument, Term};

use super::mapping::{DocumentFields, FieldMapping};
use super::{IndexHandle, IndexLifecycle};
use crate::core::config::Config;
use crate::core::error::{Result, SiteidxError};
use crate::core::types::{Document, OpenMode};

/// Files tantivy writes when an index is created
const META_FILES: &[&str] = &["meta.json", ".managed.json"];

/// Writer heap used when no configuration is supplied (50MB)
const DEFAULT_WRITER_MEMORY: usize = 50_000_000;

/// Opens or creates tantivy indexes on disk
#[derive(Debug, Clone)]
pub struct TantivyLifecycle {
    writer_memory_bytes: usize,
}

impl Default for TantivyLifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_WRITER_MEMORY)
    }
}

impl TantivyLifecycle {
    pub fn new(writer_memory_bytes: usize) -> Self {
        Self {
            writer_memory_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.writer_memory_bytes())
    }
}

impl IndexLifecycle for TantivyLifecycle {
    type Handle = TantivyIndex;

    fn open_or_create(&self, path: &Path, mapping: &FieldMapping) -> Result<TantivyIndex> {
        match existing_directory(path)? {
            Some(directory) => {
                tracing::info!("Opening index: {:?}", path);
                TantivyIndex::open(path, directory, self.writer_memory_bytes)
            }
            None => {
                tracing::info!("Creating index: {:?}", path);
                TantivyIndex::create(path, mapping, self.writer_memory_bytes)
            }
        }
    }
}

/// Directory of an existing index, or `None` when there is no index at `path`
fn existing_directory(path: &Path) -> Result<Option<MmapDirectory>> {
    let present = path.try_exists().map_err(|e| SiteidxError::open(path, e))?;
    if !present {
        return Ok(None);
    }

    let directory = MmapDirectory::open(path).map_err(|e| SiteidxError::open(path, e))?;
    let has_index = Index::exists(&directory).map_err(|e| SiteidxError::open(path, e))?;

    Ok(has_index.then_some(directory))
}

/// Remove what a failed create left at `path`
///
/// A directory the create made is removed whole; in a directory that was
/// already there only the tantivy metadata goes.
fn discard_partial_index(path: &Path, fresh: bool) {
    let removed = if fresh {
        fs::remove_dir_all(path)
    } else {
        META_FILES
            .iter()
            .map(|name| path.join(name))
            .filter(|file| file.exists())
            .try_for_each(fs::remove_file)
    };

    if let Err(e) = removed {
        tracing::warn!("Failed to remove partial index at {:?}: {}", path, e);
    }
}

fn to_tantivy_date(date: chrono::DateTime<chrono::Utc>) -> tantivy::DateTime {
    tantivy::DateTime::from_timestamp_micros(date.timestamp_micros())
}

/// Open tantivy index with a single-threaded writer
pub struct TantivyIndex {
    path: PathBuf,

    index: Index,

    fields: DocumentFields,

    writer: IndexWriter<TantivyDocument>,

    mode: OpenMode,

    /// Documents written since the handle was opened
    written: usize,
}

impl std::fmt::Debug for TantivyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyIndex")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("written", &self.written)
            .finish()
    }
}

impl TantivyIndex {
    /// Create a new index at `path` using `mapping`
    ///
    /// On failure nothing that looks like an index is left at `path`, so
    /// the next run takes the create branch again.
    fn create(path: &Path, mapping: &FieldMapping, writer_memory: usize) -> Result<Self> {
        let fresh = !path.exists();
        fs::create_dir_all(path).map_err(|e| SiteidxError::create(path, e))?;

        Index::create_in_dir(path, mapping.build_schema())
            .map_err(|e| e.to_string())
            .and_then(|index| Self::from_index(path, index, OpenMode::Created, writer_memory))
            .map_err(|e| {
                discard_partial_index(path, fresh);
                SiteidxError::create(path, e)
            })
    }

    /// Open the existing index held in `directory`
    fn open(path: &Path, directory: MmapDirectory, writer_memory: usize) -> Result<Self> {
        let index = Index::open(directory).map_err(|e| SiteidxError::open(path, e))?;

        Self::from_index(path, index, OpenMode::Opened, writer_memory)
            .map_err(|e| SiteidxError::open(path, e))
    }

    fn from_index(
        path: &Path,
        index: Index,
        mode: OpenMode,
        writer_memory: usize,
    ) -> std::result::Result<Self, String> {
        let fields = DocumentFields::from_schema(&index.schema())?;
        let writer = index
            .writer_with_num_threads(1, writer_memory)
            .map_err(|e| format!("Failed to create writer: {e}"))?;

        Ok(Self {
            path: path.to_path_buf(),
            index,
            fields,
            writer,
            mode,
            written: 0,
        })
    }

    fn to_tantivy(
        &self,
        key: &str,
        document: &Document,
    ) -> std::result::Result<TantivyDocument, String> {
        let fields = &self.fields;
        let mut doc = TantivyDocument::new();
        doc.add_text(fields.key, key);

        if let Some(field) = fields.title {
            doc.add_text(field, &document.title);
        }
        if let Some(field) = fields.kind {
            doc.add_text(field, &document.kind);
        }
        if let Some(field) = fields.section {
            doc.add_text(field, &document.section);
        }
        if let Some(field) = fields.content {
            doc.add_text(field, &document.content);
        }
        if let Some(field) = fields.word_count {
            doc.add_f64(field, document.word_count);
        }
        if let Some(field) = fields.reading_time {
            doc.add_f64(field, document.reading_time);
        }
        if let Some(field) = fields.keywords {
            for keyword in &document.keywords {
                doc.add_text(field, keyword);
            }
        }
        if let (Some(field), Some(date)) = (fields.date, document.date) {
            doc.add_date(field, to_tantivy_date(date));
        }
        if let (Some(field), Some(date)) = (fields.last_modified, document.last_modified) {
            doc.add_date(field, to_tantivy_date(date));
        }
        if let Some(field) = fields.author {
            doc.add_text(field, &document.author);
        }
        if let Some(field) = fields.document {
            let json = serde_json::to_string(document).map_err(|e| e.to_string())?;
            doc.add_text(field, json);
        }

        Ok(doc)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a reference to the underlying tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }
}

impl IndexHandle for TantivyIndex {
    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn put(&mut self, key: &str, document: &Document) -> Result<()> {
        if key.is_empty() {
            return Err(SiteidxError::write(key, "empty document key"));
        }

        let doc = self
            .to_tantivy(key, document)
            .map_err(|e| SiteidxError::write(key, e))?;

        // Deletes only apply to documents added before them
        self.writer
            .delete_term(Term::from_field_text(self.fields.key, key));
        self.writer
            .add_document(doc)
            .map_err(|e| SiteidxError::write(key, e))?;

        self.written += 1;
        tracing::debug!("Indexed {} ({})", key, document.title);
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        self.writer
            .commit()
            .map_err(|e| SiteidxError::close(&self.path, e))?;
        self.writer
            .wait_merging_threads()
            .map_err(|e| SiteidxError::close(&self.path, e))?;

        tracing::info!(
            "Closed index {:?} ({} documents written)",
            self.path,
            self.written
        );
        Ok(())
    }
}
