//! Tests for the indexing command
//!
//! - Summary of a first run and of a re-run
//! - Errors surface with the failing stage

use crate::common::{test_config, TestSite};
use siteidx::cli::execute;
use siteidx::core::types::OpenMode;

#[test]
fn test_first_run_report() {
    let site = TestSite::three_pages();
    let config = test_config(&site);

    let report = execute(&config).unwrap();

    assert_eq!(report.stats.mode, OpenMode::Created);
    assert_eq!(report.stats.documents_indexed, 2);
    assert_eq!(report.summary.documents, 2);
    assert!(report
        .headline()
        .starts_with("Indexed 2 documents (1 skipped) into "));
    assert!(report.headline().contains("search.tantivy"));
}

#[test]
fn test_rerun_report_counts_index_total() {
    let site = TestSite::three_pages();
    let config = test_config(&site);
    execute(&config).unwrap();

    site.write("d.md", "---\ntitle: Fourth\n---\nNew page.");
    let report = execute(&config).unwrap();

    assert_eq!(report.stats.mode, OpenMode::Opened);
    assert_eq!(report.stats.documents_indexed, 3);
    assert_eq!(report.summary.documents, 3);
}

#[test]
fn test_missing_site_config_fails_before_indexing() {
    let site = TestSite::three_pages();
    std::fs::remove_file(site.path().join("config.toml")).unwrap();
    let config = test_config(&site);

    let err = execute(&config).unwrap_err();

    assert_eq!(err.operation(), "build");
    assert!(!site.index_dir().exists());
}

#[test]
fn test_index_path_is_a_file() {
    let site = TestSite::three_pages();
    let mut config = test_config(&site);
    config.index_dir = site.path().join("not-an-index");
    std::fs::write(&config.index_dir, "occupied").unwrap();

    let err = execute(&config).unwrap_err();

    assert_eq!(err.operation(), "open");
    assert!(err.to_string().contains("not-an-index"));
}
