//! Indexing: drives a corpus through the mapper into the index.
//!
//! The pipeline is generic over the corpus provider and the index
//! lifecycle, so the same run logic serves the content site on disk and
//! the in-memory fakes used in tests.

pub mod pipeline;

pub use pipeline::IndexingPipeline;
