// Integration tests for permalink construction through a full site build

use crate::common::TestSite;
use siteidx::core::corpus::{ContentSite, CorpusPage, CorpusProvider, PageKind};

fn permalinks(site: &TestSite) -> Vec<String> {
    let sites = ContentSite::new(site.path(), None).build().unwrap();
    let mut links: Vec<String> = sites[0]
        .pages
        .iter()
        .map(|p| p.rel_permalink().to_string())
        .collect();
    links.sort();
    links
}

#[test]
fn test_base_url_path_prefix() {
    let site = TestSite::new(
        "baseURL = \"https://example.org/docs/\"",
        &[("guide/setup.md", "---\ntitle: Setup\n---\n")],
    );
    assert_eq!(permalinks(&site), vec!["/docs/", "/docs/guide/", "/docs/guide/setup/"]);
}

#[test]
fn test_slug_and_url_overrides() {
    let site = TestSite::new(
        "",
        &[
            ("posts/a.md", "---\ntitle: A\nslug: custom-slug\n---\n"),
            ("posts/b.md", "---\ntitle: B\nurl: /elsewhere/b/\n---\n"),
        ],
    );
    assert_eq!(
        permalinks(&site),
        vec!["/", "/elsewhere/b/", "/posts/", "/posts/custom-slug/"]
    );
}

#[test]
fn test_section_permalink_pattern() {
    let site = TestSite::new(
        "[permalinks]\nposts = \"/:year/:month/:title/\"",
        &[(
            "posts/hello.md",
            "---\ntitle: Hello World\ndate: 2024-03-05\n---\n",
        )],
    );
    assert_eq!(permalinks(&site), vec!["/", "/2024/03/hello-world/", "/posts/"]);
}

#[test]
fn test_ugly_urls() {
    let site = TestSite::new(
        "uglyURLs = true",
        &[
            ("_index.md", "---\ntitle: Home\n---\n"),
            ("posts/hello.md", "---\ntitle: Hello\n---\n"),
        ],
    );
    assert_eq!(permalinks(&site), vec!["/", "/posts/", "/posts/hello.html"]);
}

#[test]
fn test_generated_paths_are_urlized() {
    let site = TestSite::new("", &[("My Notes/First Note.md", "---\ntitle: N\n---\n")]);
    assert_eq!(permalinks(&site), vec!["/", "/my-notes/", "/my-notes/first-note/"]);
}

#[test]
fn test_non_default_language_prefix() {
    let site = TestSite::new(
        "[languages.en]\nweight = 1\n[languages.de]\nweight = 2",
        &[
            ("about.md", "---\ntitle: About\n---\n"),
            ("about.de.md", "---\ntitle: Über\n---\n"),
        ],
    );
    let sites = ContentSite::new(site.path(), None).build().unwrap();
    let about = |i: usize| {
        sites[i]
            .pages
            .iter()
            .find(|p| p.kind == PageKind::Page)
            .map(|p| p.rel_permalink().to_string())
    };

    assert_eq!(about(0).as_deref(), Some("/about/"));
    assert_eq!(sites[1].language, "de");
    assert_eq!(about(1).as_deref(), Some("/de/about/"));
    assert!(sites[1].pages.iter().any(|p| p.rel_permalink() == "/de/"));
}
