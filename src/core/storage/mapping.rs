//! Field mapping: the tantivy schema documents are written with.
//!
//! The mapping is only consulted when an index is created. An opened
//! index keeps whatever schema it was created with; [`DocumentFields`]
//! resolves the fields that schema actually has.

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED,
    STRING,
};

pub const KEY_FIELD: &str = "permalink";
pub const DOCUMENT_FIELD: &str = "document";

/// Schema description used when creating an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMapping {
    /// One typed field per document attribute
    #[default]
    Document,
    /// Only the key plus the serialized document as a catch-all text field
    Schemaless,
}

impl FieldMapping {
    pub fn schemaless() -> Self {
        FieldMapping::Schemaless
    }

    /// Build the tantivy schema for this mapping
    ///
    /// Fields (document mapping):
    /// - permalink: document key (STRING | STORED)
    /// - title, author: full text, stored
    /// - content: full text with positions, not stored
    /// - type, section: exact match (STRING | STORED)
    /// - keywords: full text, stored, multi-valued
    /// - word_count, reading_time: f64 (STORED | FAST)
    /// - date, last_modified: date (INDEXED | STORED | FAST)
    pub fn build_schema(&self) -> Schema {
        let mut builder = Schema::builder();
        builder.add_text_field(KEY_FIELD, STRING | STORED);

        match self {
            FieldMapping::Document => {
                let stored_text = text_options(IndexRecordOption::WithFreqsAndPositions).set_stored();
                let body = text_options(IndexRecordOption::WithFreqsAndPositions);
                let keywords = text_options(IndexRecordOption::WithFreqs).set_stored();

                builder.add_text_field("title", stored_text.clone());
                builder.add_text_field("type", STRING | STORED);
                builder.add_text_field("section", STRING | STORED);
                builder.add_text_field("content", body);
                builder.add_f64_field("word_count", STORED | FAST);
                builder.add_f64_field("reading_time", STORED | FAST);
                builder.add_text_field("keywords", keywords);
                builder.add_date_field("date", INDEXED | STORED | FAST);
                builder.add_date_field("last_modified", INDEXED | STORED | FAST);
                builder.add_text_field("author", stored_text);
            }
            FieldMapping::Schemaless => {
                let catch_all = text_options(IndexRecordOption::WithFreqsAndPositions).set_stored();
                builder.add_text_field(DOCUMENT_FIELD, catch_all);
            }
        }

        builder.build()
    }
}

fn text_options(record: IndexRecordOption) -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer("default")
            .set_index_option(record),
    )
}

/// Document fields present in an index schema
#[derive(Debug, Clone)]
pub struct DocumentFields {
    pub key: Field,
    pub title: Option<Field>,
    pub kind: Option<Field>,
    pub section: Option<Field>,
    pub content: Option<Field>,
    pub word_count: Option<Field>,
    pub reading_time: Option<Field>,
    pub keywords: Option<Field>,
    pub date: Option<Field>,
    pub last_modified: Option<Field>,
    pub author: Option<Field>,
    pub document: Option<Field>,
}

impl DocumentFields {
    /// Resolve fields by name; only the key field is mandatory
    pub fn from_schema(schema: &Schema) -> Result<Self, String> {
        let key = schema
            .get_field(KEY_FIELD)
            .map_err(|e| format!("schema has no '{KEY_FIELD}' key field: {e}"))?;
        let field = |name: &str| schema.get_field(name).ok();

        Ok(Self {
            key,
            title: field("title"),
            kind: field("type"),
            section: field("section"),
            content: field("content"),
            word_count: field("word_count"),
            reading_time: field("reading_time"),
            keywords: field("keywords"),
            date: field("date"),
            last_modified: field("last_modified"),
            author: field("author"),
            document: field(DOCUMENT_FIELD),
        })
    }
}
