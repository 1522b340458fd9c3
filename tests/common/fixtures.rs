// Test fixtures: throwaway content sites on disk

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A site root holding `config.toml` and a `content/` tree
#[allow(dead_code)] // Not every test binary uses every constructor
pub struct TestSite {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestSite {
    /// Create a site with the given config and content files
    ///
    /// Content paths are relative to `content/`.
    pub fn new(config: &str, files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), config).unwrap();
        std::fs::create_dir_all(dir.path().join("content")).unwrap();

        let site = Self { dir };
        for (path, content) in files {
            site.write(path, content);
        }
        site
    }

    /// Three pages in order; the second one has no title
    ///
    /// The home page is disabled so the site holds exactly these pages.
    pub fn three_pages() -> Self {
        Self::new(
            "title = \"Test Site\"\ndisableKinds = [\"home\"]",
            &[
                (
                    "a.md",
                    "---\ntitle: First\nweight: 1\n---\nThe first page.",
                ),
                ("b.md", "---\nweight: 2\n---\nA page without a title."),
                (
                    "c.md",
                    "---\ntitle: Third\nweight: 3\n---\nThe third page.",
                ),
            ],
        )
    }

    /// A small blog: home, a posts section and posts with front matter variety
    pub fn blog() -> Self {
        Self::new(
            "baseURL = \"https://example.org/\"\ntitle = \"Blog\"\n[params]\nauthor = \"Site Author\"",
            &[
                ("_index.md", "Welcome to the blog."),
                ("posts/_index.md", "---\ntitle: Posts\n---\nAll posts."),
                (
                    "posts/hello.md",
                    "+++\ntitle = \"Hello World\"\ndate = 2024-01-14T10:00:00Z\nkeywords = [\"intro\", \"rust\"]\nauthor = [\"Jane\", \"Jo\"]\n+++\nHello **world**, this is the first post.",
                ),
                (
                    "posts/second/index.md",
                    "---\ntitle: Second\ndate: 2024-02-01\nlinkTitle: Two\n---\nA leaf bundle.",
                ),
                (
                    "about.md",
                    "{\n  \"title\": \"About\",\n  \"author\": \"Jane Doe\"\n}\nAbout this site.",
                ),
                ("posts/draft.md", "---\ntitle: Draft\ndraft: true\n---\nNot yet."),
            ],
        )
    }

    /// Write (or overwrite) a content file
    pub fn write(&self, path: &str, content: &str) {
        let full_path = self.content_dir().join(path);
        std::fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        std::fs::write(full_path, content).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn content_dir(&self) -> PathBuf {
        self.dir.path().join("content")
    }

    /// Default index location inside the site root
    pub fn index_dir(&self) -> PathBuf {
        self.dir.path().join("search.tantivy")
    }
}
