//! Core domain logic
//!
//! Everything needed to turn a content site into index documents and
//! keep the index on disk up to date. The CLI is a thin layer on top.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (defaults, TOML, environment, flags)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **corpus**: Content site build (front matter, permalinks, plain text)
//! - **mapper**: Page to document mapping
//! - **storage**: Tantivy index lifecycle and inspection
//! - **indexer**: Pipeline tying corpus, mapper and storage together

pub mod config;
pub mod corpus;
pub mod error;
pub mod indexer;
pub mod mapper;
pub mod storage;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, SiteidxError};
