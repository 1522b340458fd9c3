//! Indexer layer tests
//!
//! Full pipeline runs over sites on disk into real tantivy indexes.
