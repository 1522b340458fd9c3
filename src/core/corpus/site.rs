//! Filesystem content site: walks the content directory and builds pages.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use walkdir::{DirEntry, WalkDir};

use super::frontmatter::{parse_date, parse_params, split_frontmatter, FrontMatter};
use super::permalink::{ContentFormat, ContentPath, PageKind};
use super::plain::{count_words, has_cjk, markdown_to_plain, reading_time, strip_html};
use super::site_config::SiteConfig;
use super::{CorpusPage, CorpusProvider, ParamValue, Site};
use crate::core::config::Config;
use crate::core::error::{Result, SiteidxError};

/// A page built from one content file
#[derive(Debug, Clone)]
pub struct ContentPage {
    pub title: String,
    pub link_title: String,
    pub kind: PageKind,
    /// Front matter `type`, else the section, else `page`
    pub page_type: String,
    pub section: String,
    pub plain: String,
    pub word_count: usize,
    pub reading_time: usize,
    pub keywords: Vec<String>,
    pub date: Option<DateTime<Utc>>,
    pub lastmod: Option<DateTime<Utc>>,
    pub rel_permalink: String,
    pub language: String,
    pub weight: i64,
    /// Path relative to the content directory
    pub source: PathBuf,
    /// Front matter with lowercased keys
    pub params: Map<String, Value>,
    /// Language and site params consulted when the page has no value
    pub site_params: Arc<Map<String, Value>>,
}

impl CorpusPage for ContentPage {
    fn title(&self) -> &str {
        &self.title
    }

    fn link_title(&self) -> &str {
        if self.link_title.is_empty() {
            &self.title
        } else {
            &self.link_title
        }
    }

    fn kind(&self) -> &str {
        &self.page_type
    }

    fn section(&self) -> &str {
        &self.section
    }

    fn plain(&self) -> &str {
        &self.plain
    }

    fn word_count(&self) -> usize {
        self.word_count
    }

    fn reading_time(&self) -> usize {
        self.reading_time
    }

    fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    fn lastmod(&self) -> Option<DateTime<Utc>> {
        self.lastmod
    }

    fn rel_permalink(&self) -> &str {
        &self.rel_permalink
    }

    fn param(&self, name: &str) -> Option<ParamValue> {
        let name = name.to_lowercase();
        self.params
            .get(&name)
            .or_else(|| self.site_params.get(&name))
            .map(ParamValue::from_json)
    }
}

/// Hugo-style content site rooted at a source directory
#[derive(Debug, Clone)]
pub struct ContentSite {
    source_dir: PathBuf,
    site_config: Option<PathBuf>,
}

impl ContentSite {
    /// Create a content site
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Site root containing the config file and content dir
    /// * `site_config` - Explicit config file; autodetected when `None`
    pub fn new(source_dir: impl Into<PathBuf>, site_config: Option<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            site_config,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.source_dir.clone(), config.site_config.clone())
    }

    fn load_site_config(&self) -> Result<SiteConfig> {
        let path = match &self.site_config {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.source_dir.join(path),
            None => SiteConfig::locate(&self.source_dir).ok_or_else(|| {
                SiteidxError::corpus(
                    &self.source_dir,
                    "no site config found (expected hugo.toml or config.toml)",
                )
            })?,
        };

        tracing::debug!("Loading site config {:?}", path);
        SiteConfig::load(&path)
    }
}

impl CorpusProvider for ContentSite {
    type Page = ContentPage;

    fn build(&self) -> Result<Vec<Site<ContentPage>>> {
        let site = self.load_site_config()?;
        let content_dir = self.source_dir.join(&site.content_dir);
        if !content_dir.is_dir() {
            return Err(SiteidxError::corpus(
                &content_dir,
                "content directory does not exist",
            ));
        }

        let ignore = site
            .ignore_files
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    SiteidxError::corpus(&self.source_dir, format!("ignoreFiles '{pattern}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let languages = site.languages_in_order();
        let mut pages: HashMap<String, Vec<ContentPage>> = HashMap::new();
        let params: HashMap<String, Arc<Map<String, Value>>> = languages
            .iter()
            .map(|lang| (lang.clone(), Arc::new(site.params_for(lang))))
            .collect();

        let builder = PageBuilder {
            site: &site,
            now: Utc::now(),
        };

        tracing::debug!("Walking content directory {:?}", content_dir);
        let walker = WalkDir::new(&content_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e, &content_dir));

        for entry in walker {
            let entry = entry.map_err(|e| SiteidxError::corpus(&content_dir, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&content_dir) else {
                continue;
            };
            let relative_str = relative.to_string_lossy().replace('\\', "/");
            if ignore.iter().any(|re| re.is_match(&relative_str)) {
                tracing::debug!("Ignoring {:?}", relative);
                continue;
            }

            let Some(content_path) = ContentPath::parse(relative, &site) else {
                continue;
            };

            let site_params = params
                .get(&content_path.language)
                .cloned()
                .unwrap_or_default();

            if let Some(page) = builder.build_page(path, content_path, site_params)? {
                pages.entry(page.language.clone()).or_default().push(page);
            }
        }

        let sites = languages
            .into_iter()
            .map(|language| {
                let mut pages = pages.remove(&language).unwrap_or_default();
                let site_params = params.get(&language).cloned().unwrap_or_default();
                builder.add_implicit_pages(&language, &mut pages, &site_params);
                sort_pages(&mut pages);
                tracing::info!("Built {} pages for language '{}'", pages.len(), language);
                Site { language, pages }
            })
            .collect();

        Ok(sites)
    }
}

struct PageBuilder<'a> {
    site: &'a SiteConfig,
    now: DateTime<Utc>,
}

impl PageBuilder<'_> {
    /// Build a page, or `None` when it is excluded from the build
    fn build_page(
        &self,
        path: &Path,
        content_path: ContentPath,
        site_params: Arc<Map<String, Value>>,
    ) -> Result<Option<ContentPage>> {
        if self.site.is_kind_disabled(content_path.kind) {
            tracing::debug!("Skipping disabled kind {:?}", content_path.source);
            return Ok(None);
        }

        let source = fs::read_to_string(path).map_err(|e| SiteidxError::corpus(path, e))?;

        let (params, body) = match split_frontmatter(&source) {
            Some((format, raw, body)) => {
                let params = parse_params(format, raw).map_err(|e| SiteidxError::corpus(path, e))?;
                (params, body)
            }
            None => (Map::new(), source.as_str()),
        };
        let front = FrontMatter::from_params(&params).map_err(|e| SiteidxError::corpus(path, e))?;

        if front.headless {
            tracing::debug!("Skipping headless bundle {:?}", content_path.source);
            return Ok(None);
        }
        if front.draft && !self.site.build_drafts {
            tracing::debug!("Skipping draft {:?}", content_path.source);
            return Ok(None);
        }

        let date_field = |name: &str, raw: &Option<String>| -> Result<Option<DateTime<Utc>>> {
            match raw.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
                Some(raw) => parse_date(raw).map(Some).ok_or_else(|| {
                    SiteidxError::corpus(path, format!("invalid {name} '{raw}'"))
                }),
                None => Ok(None),
            }
        };
        let date = date_field("date", &front.date)?;
        let publish_date = date_field("publishDate", &front.publishdate)?;
        let lastmod = date_field("lastmod", &front.lastmod)?;
        let expiry = date_field("expiryDate", &front.expirydate)?;

        if !self.site.build_future && publish_date.or(date).is_some_and(|d| d > self.now) {
            tracing::debug!("Skipping future page {:?}", content_path.source);
            return Ok(None);
        }
        if !self.site.build_expired && expiry.is_some_and(|d| d <= self.now) {
            tracing::debug!("Skipping expired page {:?}", content_path.source);
            return Ok(None);
        }

        let plain = match content_path.format {
            ContentFormat::Markdown => markdown_to_plain(body),
            ContentFormat::Html => strip_html(body),
        };
        let cjk = front
            .is_cjk_language
            .unwrap_or_else(|| self.site.has_cjk_language && has_cjk(&plain));
        let word_count = count_words(&plain, cjk);

        let page_date = date.or(publish_date).or(lastmod);
        let page_lastmod = lastmod.or(date).or(publish_date);
        let rel_permalink = content_path.rel_permalink(&front, page_date, self.site);

        let title = match content_path.kind {
            _ if !front.title.trim().is_empty() => front.title.clone(),
            PageKind::Home => self.home_title(&content_path.language),
            PageKind::Section => capitalize(&content_path.name),
            PageKind::Page => String::new(),
        };

        let page_type = front
            .kind
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| {
                if content_path.section.is_empty() {
                    "page".to_string()
                } else {
                    content_path.section.clone()
                }
            });

        Ok(Some(ContentPage {
            link_title: front.linktitle.clone().unwrap_or_default(),
            title,
            kind: content_path.kind,
            page_type,
            section: content_path.section,
            word_count,
            reading_time: reading_time(word_count, cjk),
            plain,
            keywords: front.keywords,
            date: page_date,
            lastmod: page_lastmod,
            rel_permalink,
            language: content_path.language,
            weight: front.weight,
            source: content_path.source,
            params,
            site_params,
        }))
    }

    /// Add the home page and top-level section pages that have no `_index` file
    fn add_implicit_pages(
        &self,
        language: &str,
        pages: &mut Vec<ContentPage>,
        site_params: &Arc<Map<String, Value>>,
    ) {
        let mut sections: BTreeSet<String> = pages
            .iter()
            .filter(|p| p.kind == PageKind::Page && !p.section.is_empty())
            .map(|p| p.section.clone())
            .collect();
        for page in pages.iter().filter(|p| is_top_level_section(p)) {
            sections.remove(&page.section);
        }

        let mut implicit = Vec::new();
        if !pages.iter().any(|p| p.kind == PageKind::Home)
            && !self.site.is_kind_disabled(PageKind::Home)
        {
            let path = ContentPath {
                source: PathBuf::new(),
                format: ContentFormat::Markdown,
                language: language.to_string(),
                kind: PageKind::Home,
                section: String::new(),
                dirs: Vec::new(),
                name: String::new(),
            };
            implicit.push(self.implicit_page(path, self.home_title(language), site_params));
        }
        if !self.site.is_kind_disabled(PageKind::Section) {
            for section in sections {
                let path = ContentPath {
                    source: PathBuf::from(&section),
                    format: ContentFormat::Markdown,
                    language: language.to_string(),
                    kind: PageKind::Section,
                    section: section.clone(),
                    dirs: Vec::new(),
                    name: section.clone(),
                };
                implicit.push(self.implicit_page(path, capitalize(&section), site_params));
            }
        }

        for page in &implicit {
            tracing::debug!("Adding implicit {} page {}", page.kind.name(), page.rel_permalink);
        }
        pages.extend(implicit);
    }

    fn implicit_page(
        &self,
        content_path: ContentPath,
        title: String,
        site_params: &Arc<Map<String, Value>>,
    ) -> ContentPage {
        let rel_permalink = content_path.rel_permalink(&FrontMatter::default(), None, self.site);
        let page_type = if content_path.section.is_empty() {
            "page".to_string()
        } else {
            content_path.section.clone()
        };

        ContentPage {
            title,
            link_title: String::new(),
            kind: content_path.kind,
            page_type,
            section: content_path.section,
            plain: String::new(),
            word_count: 0,
            reading_time: 0,
            keywords: Vec::new(),
            date: None,
            lastmod: None,
            rel_permalink,
            language: content_path.language,
            weight: 0,
            source: content_path.source,
            params: Map::new(),
            site_params: Arc::clone(site_params),
        }
    }

    fn home_title(&self, language: &str) -> String {
        self.site
            .languages
            .get(language)
            .and_then(|lang| lang.title.clone())
            .unwrap_or_else(|| self.site.title.clone())
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `content/<section>/_index.*`, as opposed to a nested branch bundle
fn is_top_level_section(page: &ContentPage) -> bool {
    page.kind == PageKind::Section
        && page
            .source
            .parent()
            .is_some_and(|dir| dir.components().count() == 1)
}

/// Skip hidden files and directories, never the root
fn is_hidden(entry: &DirEntry, root: &Path) -> bool {
    entry.path() != root
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Default page order: weight (unweighted last), newest first, title, path
fn sort_pages(pages: &mut [ContentPage]) {
    pages.sort_by(|a, b| {
        (a.weight == 0, a.weight, Reverse(a.date), a.link_title(), &a.source).cmp(&(
            b.weight == 0,
            b.weight,
            Reverse(b.date),
            b.link_title(),
            &b.source,
        ))
    });
}
