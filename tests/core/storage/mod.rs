//! Storage layer tests
//!
//! Tantivy lifecycle branches and what ends up committed on disk.

mod test_lifecycle;
