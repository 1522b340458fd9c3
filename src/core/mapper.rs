//! Page to document mapping.
//!
//! Pure transformation from a [`CorpusPage`] into the [`Document`] that
//! gets indexed. Missing or oddly shaped data degrades to empty fields;
//! a blank title excludes the page.

use crate::core::corpus::{CorpusPage, ParamValue};
use crate::core::types::Document;

/// Outcome of mapping one page
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    /// Index `document` under `key`
    Document { key: String, document: Document },
    /// Page excluded (blank title)
    Skip,
}

/// Maps corpus pages to index documents
#[derive(Debug, Clone, Default)]
pub struct DocumentMapper;

impl DocumentMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_to_document<P: CorpusPage + ?Sized>(&self, page: &P) -> Mapped {
        if page.title().trim().is_empty() {
            return Mapped::Skip;
        }

        let document = Document {
            title: page.link_title().to_string(),
            kind: page.kind().to_string(),
            section: page.section().to_string(),
            content: page.plain().to_string(),
            word_count: page.word_count() as f64,
            reading_time: page.reading_time() as f64,
            keywords: page.keywords().to_vec(),
            date: page.date(),
            last_modified: page.lastmod(),
            author: normalize_author(page.param("author")),
        };

        Mapped::Document {
            key: page.rel_permalink().to_string(),
            document,
        }
    }
}

/// Single string verbatim, string list joined with ", ", anything else empty
pub fn normalize_author(param: Option<ParamValue>) -> String {
    match param {
        Some(ParamValue::Single(author)) => author,
        Some(ParamValue::Sequence(authors)) => authors.join(", "),
        Some(ParamValue::Other) | None => String::new(),
    }
}
