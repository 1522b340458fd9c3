//! siteidx - full-text search index for static content sites
//!
//! Builds a tantivy index from the rendered pages of a Hugo-style site.
//! Each page becomes one document keyed by its relative permalink, so
//! re-running over the same site replaces documents instead of
//! duplicating them.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types
//!   - corpus (content site build)
//!   - mapper (page to document)
//!   - storage (tantivy lifecycle, inspection)
//!   - indexer (pipeline)
//!
//! - **cli**: Command-line adapter (depends on core)

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{Result, SiteidxError};
pub use crate::core::indexer::IndexingPipeline;
pub use crate::core::types::*;
