//! Read-only views of an index on disk.
//!
//! Used by the CLI summary and by tests to check what a run actually
//! committed. Nothing here takes the writer lock.

use std::path::Path;

use serde::Serialize;
use tantivy::collector::DocSetCollector;
use tantivy::query::AllQuery;
use tantivy::schema::Value;
use tantivy::{Index, Searcher, TantivyDocument};
use walkdir::WalkDir;

use super::mapping::KEY_FIELD;
use crate::core::error::{Result, SiteidxError};

/// Committed state of an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    /// Live documents (deleted ones excluded)
    pub documents: u64,

    pub segments: usize,

    /// Total size of the index directory in bytes
    pub size_bytes: u64,
}

impl IndexSummary {
    pub fn load(path: &Path) -> Result<Self> {
        let searcher = open_searcher(path)?;

        Ok(Self {
            documents: searcher.num_docs(),
            segments: searcher.segment_readers().len(),
            size_bytes: directory_size(path),
        })
    }
}

/// All committed document keys, sorted
pub fn stored_keys(path: &Path) -> Result<Vec<String>> {
    let searcher = open_searcher(path)?;
    let key_field = searcher
        .schema()
        .get_field(KEY_FIELD)
        .map_err(|e| SiteidxError::open(path, e))?;

    let addresses = searcher
        .search(&AllQuery, &DocSetCollector)
        .map_err(|e| SiteidxError::open(path, e))?;

    let mut keys = Vec::with_capacity(addresses.len());
    for address in addresses {
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| SiteidxError::open(path, e))?;
        if let Some(key) = doc.get_first(key_field).and_then(|v| v.as_str()) {
            keys.push(key.to_string());
        }
    }

    keys.sort();
    Ok(keys)
}

fn open_searcher(path: &Path) -> Result<Searcher> {
    let index = Index::open_in_dir(path).map_err(|e| SiteidxError::open(path, e))?;
    let reader = index
        .reader()
        .map_err(|e| SiteidxError::open(path, format!("Failed to open reader: {e}")))?;
    Ok(reader.searcher())
}

fn directory_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}
