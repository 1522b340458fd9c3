// Integration tests for building a content site from disk

use crate::common::TestSite;
use siteidx::core::corpus::{ContentSite, CorpusPage, CorpusProvider, PageKind, ParamValue};

#[test]
fn test_blog_pages_and_order() {
    let site = TestSite::blog();
    let sites = ContentSite::new(site.path(), None).build().unwrap();

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].language, "en");

    let permalinks: Vec<&str> = sites[0].pages.iter().map(|p| p.rel_permalink()).collect();
    // Dated pages newest first, then undated pages by title
    assert_eq!(
        permalinks,
        vec!["/posts/second/", "/posts/hello/", "/about/", "/", "/posts/"]
    );
}

#[test]
fn test_blog_page_fields() {
    let site = TestSite::blog();
    let sites = ContentSite::new(site.path(), None).build().unwrap();
    let pages = &sites[0].pages;

    let hello = pages
        .iter()
        .find(|p| p.rel_permalink() == "/posts/hello/")
        .unwrap();
    assert_eq!(hello.title(), "Hello World");
    assert_eq!(hello.kind(), "posts");
    assert_eq!(hello.section(), "posts");
    assert_eq!(hello.plain(), "Hello world, this is the first post.");
    assert_eq!(hello.word_count(), 7);
    assert_eq!(hello.keywords(), ["intro".to_string(), "rust".to_string()]);
    assert_eq!(
        hello.param("author"),
        Some(ParamValue::Sequence(vec!["Jane".into(), "Jo".into()]))
    );

    let bundle = pages
        .iter()
        .find(|p| p.rel_permalink() == "/posts/second/")
        .unwrap();
    assert_eq!(bundle.link_title(), "Two");
    assert_eq!(bundle.kind, PageKind::Page);

    let home = pages.iter().find(|p| p.kind == PageKind::Home).unwrap();
    assert_eq!(home.title(), "Blog");
    assert_eq!(home.kind(), "page");
    assert_eq!(
        home.param("author"),
        Some(ParamValue::Single("Site Author".into()))
    );
}

#[test]
fn test_json_front_matter() {
    let site = TestSite::blog();
    let sites = ContentSite::new(site.path(), None).build().unwrap();
    let about = sites[0]
        .pages
        .iter()
        .find(|p| p.rel_permalink() == "/about/")
        .unwrap();

    assert_eq!(about.title(), "About");
    assert_eq!(about.plain(), "About this site.");
    assert_eq!(
        about.param("author"),
        Some(ParamValue::Single("Jane Doe".into()))
    );
}

#[test]
fn test_drafts_excluded() {
    let site = TestSite::blog();
    let sites = ContentSite::new(site.path(), None).build().unwrap();
    assert!(sites[0].pages.iter().all(|p| p.title() != "Draft"));
}

#[test]
fn test_explicit_site_config_path() {
    let site = TestSite::new("", &[("a.md", "---\ntitle: A\n---\n")]);
    std::fs::rename(
        site.path().join("config.toml"),
        site.path().join("site.toml"),
    )
    .unwrap();

    let err = ContentSite::new(site.path(), None).build().unwrap_err();
    assert_eq!(err.operation(), "build");

    let sites = ContentSite::new(site.path(), Some("site.toml".into()))
        .build()
        .unwrap();
    assert!(sites[0].pages.iter().any(|p| p.title() == "A"));
}

#[test]
fn test_section_without_index_file_is_a_page() {
    let site = TestSite::new(
        "title = \"Notes\"",
        &[("posts/a.md", "---\ntitle: A\n---\nBody.")],
    );
    let sites = ContentSite::new(site.path(), None).build().unwrap();

    let section = sites[0]
        .pages
        .iter()
        .find(|p| p.kind == PageKind::Section)
        .unwrap();
    assert_eq!(section.rel_permalink(), "/posts/");
    assert_eq!(section.title(), "Posts");

    let home = sites[0]
        .pages
        .iter()
        .find(|p| p.kind == PageKind::Home)
        .unwrap();
    assert_eq!(home.rel_permalink(), "/");
    assert_eq!(home.title(), "Notes");
}

#[test]
fn test_missing_content_dir_is_error() {
    let site = TestSite::new("contentDir = \"missing\"", &[]);
    let err = ContentSite::new(site.path(), None).build().unwrap_err();
    assert_eq!(err.operation(), "build");
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_reading_time_rounds_up() {
    let body = "word ".repeat(214);
    let site = TestSite::new("", &[("long.md", &format!("---\ntitle: Long\n---\n{body}"))]);
    let sites = ContentSite::new(site.path(), None).build().unwrap();
    let long = sites[0]
        .pages
        .iter()
        .find(|p| p.title() == "Long")
        .unwrap();

    assert_eq!(long.word_count(), 214);
    assert_eq!(long.reading_time(), 2);
}
