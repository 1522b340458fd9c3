//! Corpus layer tests
//!
//! Content site builds: page kinds, permalinks and front matter handling.

mod test_permalinks;
mod test_site;
