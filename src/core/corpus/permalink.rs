//! Content path classification and permalink construction.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};

use super::frontmatter::FrontMatter;
use super::site_config::SiteConfig;

/// Kind of page a content file produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `content/_index.md`
    Home,
    /// `content/<section>/_index.md`
    Section,
    /// Any other content file, including `index.md` leaf bundles
    Page,
}

impl PageKind {
    /// Kind name as used by `disableKinds`
    pub fn name(&self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Section => "section",
            PageKind::Page => "page",
        }
    }
}

/// Source markup of a content file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Markdown,
    Html,
}

impl ContentFormat {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// A content file path broken into the parts permalinks are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Path relative to the content directory
    pub source: PathBuf,
    pub format: ContentFormat,
    pub language: String,
    pub kind: PageKind,
    /// First directory level; empty for root pages and home
    pub section: String,
    /// Directories leading to the page (bundle directory excluded)
    pub dirs: Vec<String>,
    /// File stem, or the bundle directory name for `index.md`
    pub name: String,
}

impl ContentPath {
    /// Classify a path relative to the content directory.
    ///
    /// Returns `None` for files that are not content (images, data...).
    pub fn parse(relative: &Path, site: &SiteConfig) -> Option<Self> {
        let format = ContentFormat::from_extension(relative.extension()?.to_str()?)?;
        let stem = relative.file_stem()?.to_str()?;

        let (base_stem, language) = match stem.rsplit_once('.') {
            Some((base, lang)) if site.is_language(&lang.to_lowercase()) => {
                (base, lang.to_lowercase())
            }
            _ => (stem, site.default_language.to_lowercase()),
        };

        let mut dirs: Vec<String> = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let (kind, name) = match base_stem {
            "_index" if dirs.is_empty() => (PageKind::Home, String::new()),
            "_index" => {
                let name = dirs.pop().unwrap_or_default();
                (PageKind::Section, name)
            }
            "index" if !dirs.is_empty() => {
                let name = dirs.pop().unwrap_or_default();
                (PageKind::Page, name)
            }
            other => (PageKind::Page, other.to_string()),
        };

        let section = match kind {
            PageKind::Home => String::new(),
            PageKind::Section => dirs.first().cloned().unwrap_or_else(|| name.clone()),
            PageKind::Page => dirs.first().cloned().unwrap_or_default(),
        };

        Some(Self {
            source: relative.to_path_buf(),
            format,
            language,
            kind,
            section,
            dirs,
            name,
        })
    }

    /// Build the site-relative permalink for this content.
    pub fn rel_permalink(
        &self,
        front: &FrontMatter,
        date: Option<DateTime<Utc>>,
        site: &SiteConfig,
    ) -> String {
        let path = if let Some(url) = front.url.as_deref().filter(|u| !u.trim().is_empty()) {
            ensure_leading_slash(url.trim())
        } else {
            let pattern = match self.kind {
                PageKind::Page => site.permalink_pattern(&self.section),
                _ => None,
            };
            let generated = match pattern {
                Some(pattern) => self.expand_pattern(pattern, front, date),
                None => self.default_path(front),
            };
            let generated = urlize(&generated);
            if site.ugly_urls && self.kind == PageKind::Page && generated != "/" {
                format!("{}.html", generated.trim_end_matches('/'))
            } else {
                generated
            }
        };

        let language_prefix = if self.language == site.default_language.to_lowercase() {
            String::new()
        } else {
            format!("/{}", self.language)
        };

        format!("{}{}{}", site.base_path(), language_prefix, path)
    }

    fn default_path(&self, front: &FrontMatter) -> String {
        let mut segments = self.dirs.clone();
        match self.kind {
            PageKind::Home => {}
            PageKind::Section => segments.push(self.name.clone()),
            PageKind::Page => segments.push(
                front
                    .slug
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(&self.name)
                    .to_string(),
            ),
        }

        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", segments.join("/"))
        }
    }

    fn expand_pattern(
        &self,
        pattern: &str,
        front: &FrontMatter,
        date: Option<DateTime<Utc>>,
    ) -> String {
        let (year, month, day) = date.map_or((1, 1, 1), |d| (d.year(), d.month(), d.day()));
        let slug = front.slug.as_deref().filter(|s| !s.trim().is_empty());

        let expanded = pattern
            .split('/')
            .map(|segment| match segment {
                ":year" => format!("{year:04}"),
                ":month" => format!("{month:02}"),
                ":day" => format!("{day:02}"),
                ":section" => self.section.clone(),
                ":filename" => self.name.clone(),
                ":title" => front.title.clone(),
                ":slug" => slug.map_or_else(|| front.title.clone(), str::to_string),
                ":slugorfilename" => slug.map_or_else(|| self.name.clone(), str::to_string),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/");

        ensure_leading_slash(&expanded)
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Turn a string into a URL path fragment.
///
/// Lowercases, turns whitespace into `-` and drops characters that are
/// not letters, digits or one of `-_./~+%#`.
pub fn urlize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || "-_./~+%#".contains(c) {
                Some(c)
            } else {
                None
            }
        })
        .flat_map(char::to_lowercase)
        .collect()
}
