//! Indexing pipeline orchestration.
//!
//! Coordinates one indexing run:
//! 1. Build the content corpus
//! 2. Open or create the index
//! 3. Map each page of the first site and write it by key
//! 4. Close the index, whatever happened in step 3

use std::time::Instant;

use crate::core::config::Config;
use crate::core::corpus::{CorpusPage, CorpusProvider};
use crate::core::error::{Result, SiteidxError};
use crate::core::mapper::{DocumentMapper, Mapped};
use crate::core::storage::{FieldMapping, IndexHandle, IndexLifecycle};
use crate::core::types::IndexStats;

/// Orchestrates the indexing pipeline
#[derive(Debug, Clone)]
pub struct IndexingPipeline {
    config: Config,
    mapper: DocumentMapper,
    mapping: FieldMapping,
}

/// Page counters accumulated by the write loop
#[derive(Debug, Default)]
struct Progress {
    indexed: usize,
    skipped: usize,
}

impl IndexingPipeline {
    /// Create a pipeline writing to `config.index_dir` with the document mapping
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mapper: DocumentMapper::new(),
            mapping: FieldMapping::default(),
        }
    }

    /// Use `mapping` when the index has to be created
    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one full pass over the corpus
    ///
    /// The corpus is built before the index is touched, so a broken site
    /// never creates or locks an index. Once a handle is open it is closed
    /// exactly once; a write failure stops the loop but the documents
    /// written before it are still committed.
    pub fn run<C, L>(&self, corpus: &C, lifecycle: &L) -> Result<IndexStats>
    where
        C: CorpusProvider,
        L: IndexLifecycle,
    {
        let start = Instant::now();
        let index_dir = &self.config.index_dir;

        tracing::info!("Building content from {:?}", self.config.source_dir);
        let sites = corpus.build()?;
        let site = sites.into_iter().next().ok_or_else(|| {
            SiteidxError::corpus(&self.config.source_dir, "build produced no sites")
        })?;
        tracing::info!(
            "Found {} pages for language '{}'",
            site.pages.len(),
            site.language
        );

        let mut handle = lifecycle.open_or_create(index_dir, &self.mapping)?;
        let mode = handle.mode();

        let mut progress = Progress::default();
        let written = self.write_pages(&mut handle, &site.pages, &mut progress);
        let closed = handle.close();

        match (written, closed) {
            (Err(write_err), Err(close_err)) => {
                tracing::error!("Failed to close index after write error: {}", close_err);
                return Err(write_err);
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => return Err(e),
            (Ok(()), Ok(())) => {}
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Indexing complete: {} documents indexed, {} skipped in {}ms",
            progress.indexed,
            progress.skipped,
            duration_ms
        );

        Ok(IndexStats {
            pages_seen: site.pages.len(),
            documents_indexed: progress.indexed,
            pages_skipped: progress.skipped,
            mode,
            duration_ms,
        })
    }

    /// Map and write pages in order, stopping at the first write error
    fn write_pages<H, P>(&self, handle: &mut H, pages: &[P], progress: &mut Progress) -> Result<()>
    where
        H: IndexHandle,
        P: CorpusPage,
    {
        for (idx, page) in pages.iter().enumerate() {
            if idx % 100 == 0 && idx > 0 {
                tracing::info!("Progress: {}/{} pages processed", idx, pages.len());
            }

            match self.mapper.map_to_document(page) {
                Mapped::Document { key, document } => {
                    handle.put(&key, &document)?;
                    progress.indexed += 1;
                }
                Mapped::Skip => {
                    tracing::debug!("Skipping page without title: {}", page.rel_permalink());
                    progress.skipped += 1;
                }
            }
        }

        Ok(())
    }
}
