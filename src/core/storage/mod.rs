//! Storage layer for the persistent tantivy index.
//!
//! # Architecture
//!
//! - **IndexLifecycle**: opens an existing index or creates a new one
//! - **IndexHandle**: put-by-key and close on an open index
//! - **TantivyLifecycle / TantivyIndex**: the tantivy implementation
//! - **FieldMapping**: schema applied at creation time only
//! - **inspect**: read-only views of an index on disk
//!
//! # Index Directory Structure
//!
//! ```text
//! {index_dir}/
//! ├── .managed.json
//! ├── .tantivy-writer.lock    # held while a handle is open
//! ├── meta.json
//! └── [segment files]
//! ```

pub mod inspect;
mod mapping;
mod tantivy;

use std::path::Path;

use crate::core::error::Result;
use crate::core::types::{Document, OpenMode};

pub use mapping::{DocumentFields, FieldMapping, DOCUMENT_FIELD, KEY_FIELD};
pub use self::tantivy::{TantivyIndex, TantivyLifecycle};

/// An open, writable index
pub trait IndexHandle {
    /// Which lifecycle branch produced this handle
    fn mode(&self) -> OpenMode;

    /// Write `document` under `key`, replacing any entry with the same key
    fn put(&mut self, key: &str, document: &Document) -> Result<()>;

    /// Flush pending writes and release the index
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Opens or creates the index at a path
pub trait IndexLifecycle {
    type Handle: IndexHandle;

    /// Open the index at `path`, creating it with `mapping` if none exists
    ///
    /// The mapping is never applied to an index that already exists.
    fn open_or_create(&self, path: &Path, mapping: &FieldMapping) -> Result<Self::Handle>;
}
