//! Content corpus: the rendered pages of a site.
//!
//! The indexer consumes pages through the [`CorpusPage`] accessors and
//! obtains them from a [`CorpusProvider`]. [`ContentSite`] is the
//! filesystem implementation for Hugo-style sites:
//!
//! ```text
//! site/
//! ├── config.toml          # baseURL, languages, permalinks, params...
//! └── content/
//!     ├── _index.md        # home
//!     ├── about.md         # /about/
//!     └── posts/
//!         ├── _index.md    # /posts/
//!         ├── hello.md     # /posts/hello/
//!         ├── hello.fr.md  # /fr/posts/hello/
//!         └── bundle/
//!             └── index.md # /posts/bundle/
//! ```

mod frontmatter;
mod permalink;
mod plain;
mod site;
mod site_config;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::error::Result;

pub use frontmatter::{parse_date, split_frontmatter, FrontMatter, FrontmatterFormat};
pub use permalink::{urlize, ContentPath, PageKind};
pub use plain::{count_words, has_cjk, markdown_to_plain, reading_time, strip_html};
pub use site::{ContentPage, ContentSite};
pub use site_config::{LanguageConfig, SiteConfig};

/// Shape of a page parameter, resolved once at the corpus boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single string
    Single(String),
    /// A sequence whose elements are all strings
    Sequence(Vec<String>),
    /// Anything else (numbers, maps, mixed lists...)
    Other,
}

impl ParamValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => ParamValue::Single(s.clone()),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map_or(ParamValue::Other, ParamValue::Sequence),
            _ => ParamValue::Other,
        }
    }
}

/// Read-only view of one rendered page
pub trait CorpusPage {
    fn title(&self) -> &str;

    /// Title used in links; falls back to [`CorpusPage::title`]
    fn link_title(&self) -> &str;

    /// Content type (front matter `type`, else the section)
    fn kind(&self) -> &str;

    fn section(&self) -> &str;

    /// Rendered body with all markup removed
    fn plain(&self) -> &str;

    fn word_count(&self) -> usize;

    /// Estimated reading time in minutes
    fn reading_time(&self) -> usize;

    fn keywords(&self) -> &[String];

    fn date(&self) -> Option<DateTime<Utc>>;

    fn lastmod(&self) -> Option<DateTime<Utc>>;

    /// Site-relative canonical URL, unique per site
    fn rel_permalink(&self) -> &str;

    /// Page parameter by case-insensitive name
    fn param(&self, name: &str) -> Option<ParamValue>;
}

/// One language's ordered page list
#[derive(Debug, Clone)]
pub struct Site<P> {
    pub language: String,
    pub pages: Vec<P>,
}

/// Produces the sites of a content build
///
/// The first site returned is the one that gets indexed.
pub trait CorpusProvider {
    type Page: CorpusPage;

    fn build(&self) -> Result<Vec<Site<Self::Page>>>;
}
