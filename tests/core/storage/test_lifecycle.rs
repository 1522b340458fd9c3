// Integration tests for the tantivy index lifecycle

use chrono::{TimeZone, Utc};
use siteidx::core::storage::inspect::{stored_keys, IndexSummary};
use siteidx::core::storage::{FieldMapping, IndexHandle, IndexLifecycle, TantivyLifecycle};
use siteidx::core::types::{Document, OpenMode};
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{Index, TantivyDocument};
use tempfile::TempDir;

fn document(title: &str, content: &str) -> Document {
    Document {
        title: title.to_string(),
        kind: "posts".to_string(),
        section: "posts".to_string(),
        content: content.to_string(),
        word_count: 3.0,
        reading_time: 1.0,
        keywords: vec!["rust".to_string(), "search".to_string()],
        date: Utc.with_ymd_and_hms(2024, 1, 14, 10, 0, 0).single(),
        last_modified: None,
        author: "Jane, Jo".to_string(),
    }
}

#[test]
fn test_fresh_path_created_then_reopened() {
    let temp_dir = TempDir::new().unwrap();
    let index_dir = temp_dir.path().join("nested").join("search.tantivy");
    let lifecycle = TantivyLifecycle::default();

    let handle = lifecycle
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap();
    assert_eq!(handle.mode(), OpenMode::Created);
    handle.close().unwrap();
    assert!(index_dir.is_dir());

    let handle = lifecycle
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap();
    assert_eq!(handle.mode(), OpenMode::Opened);
    handle.close().unwrap();
}

#[test]
fn test_documents_are_searchable_after_close() {
    let temp_dir = TempDir::new().unwrap();
    let index_dir = temp_dir.path().join("idx");

    let mut handle = TantivyLifecycle::default()
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap();
    handle
        .put("/posts/hello/", &document("Hello", "tantivy powered search"))
        .unwrap();
    handle
        .put("/posts/other/", &document("Other", "nothing relevant"))
        .unwrap();
    handle.close().unwrap();

    let index = Index::open_in_dir(&index_dir).unwrap();
    let schema = index.schema();
    let content = schema.get_field("content").unwrap();
    let permalink = schema.get_field("permalink").unwrap();
    let author = schema.get_field("author").unwrap();

    let searcher = index.reader().unwrap().searcher();
    let query = QueryParser::for_index(&index, vec![content])
        .parse_query("tantivy")
        .unwrap();
    let hits = searcher.search(&query, &TopDocs::with_limit(10)).unwrap();
    assert_eq!(hits.len(), 1);

    let doc: TantivyDocument = searcher.doc(hits[0].1).unwrap();
    assert_eq!(
        doc.get_first(permalink).and_then(|v| v.as_str()),
        Some("/posts/hello/")
    );
    assert_eq!(doc.get_first(author).and_then(|v| v.as_str()), Some("Jane, Jo"));
}

#[test]
fn test_absent_dates_not_written() {
    let temp_dir = TempDir::new().unwrap();
    let index_dir = temp_dir.path().join("idx");

    let mut handle = TantivyLifecycle::default()
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap();
    handle.put("/a/", &document("A", "body")).unwrap();
    handle.close().unwrap();

    let index = Index::open_in_dir(&index_dir).unwrap();
    let last_modified = index.schema().get_field("last_modified").unwrap();
    let date = index.schema().get_field("date").unwrap();
    let searcher = index.reader().unwrap().searcher();
    let hits = searcher
        .search(&tantivy::query::AllQuery, &TopDocs::with_limit(1))
        .unwrap();
    let doc: TantivyDocument = searcher.doc(hits[0].1).unwrap();

    assert!(doc.get_first(date).is_some());
    assert!(doc.get_first(last_modified).is_none());
}

#[test]
fn test_unclosed_writes_are_not_committed() {
    let temp_dir = TempDir::new().unwrap();
    let index_dir = temp_dir.path().join("idx");
    let lifecycle = TantivyLifecycle::default();

    {
        let mut handle = lifecycle
            .open_or_create(&index_dir, &FieldMapping::default())
            .unwrap();
        handle.put("/a/", &document("A", "body")).unwrap();
        // Dropped without close
    }

    assert_eq!(IndexSummary::load(&index_dir).unwrap().documents, 0);

    // The lock is released on drop, so the index can be reopened
    let mut handle = lifecycle
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap();
    assert_eq!(handle.mode(), OpenMode::Opened);
    handle.put("/a/", &document("A", "body")).unwrap();
    handle.close().unwrap();

    assert_eq!(stored_keys(&index_dir).unwrap(), vec!["/a/"]);
}

#[test]
fn test_writer_budget_below_minimum_is_open_error() {
    let temp_dir = TempDir::new().unwrap();
    let index_dir = temp_dir.path().join("idx");

    TantivyLifecycle::default()
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap()
        .close()
        .unwrap();

    let err = TantivyLifecycle::new(1_000)
        .open_or_create(&index_dir, &FieldMapping::default())
        .unwrap_err();
    assert_eq!(err.operation(), "open");
    assert!(err.is_index_error());
}
