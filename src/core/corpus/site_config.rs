//! Site-level configuration (`hugo.toml` / `config.toml`).
//!
//! Keys are case-insensitive, so `baseURL` and `baseurl` are equivalent.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::frontmatter::{lowercase_keys, toml_to_json, yaml_to_json};
use super::permalink::PageKind;
use crate::core::error::{Result, SiteidxError};

/// Config file names looked up in a site root, in priority order
const CONFIG_FILE_NAMES: &[&str] = &[
    "hugo.toml",
    "hugo.yaml",
    "hugo.json",
    "config.toml",
    "config.yaml",
    "config.json",
];

/// Per-language settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageConfig {
    #[serde(default)]
    pub weight: i64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(default, rename = "baseurl")]
    pub base_url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default = "default_content_dir", rename = "contentdir")]
    pub content_dir: PathBuf,

    #[serde(default = "default_language", rename = "defaultcontentlanguage")]
    pub default_language: String,

    #[serde(default)]
    pub languages: BTreeMap<String, LanguageConfig>,

    #[serde(default, rename = "builddrafts")]
    pub build_drafts: bool,

    #[serde(default, rename = "buildfuture")]
    pub build_future: bool,

    #[serde(default, rename = "buildexpired")]
    pub build_expired: bool,

    #[serde(default, rename = "uglyurls")]
    pub ugly_urls: bool,

    #[serde(default, rename = "hascjklanguage")]
    pub has_cjk_language: bool,

    /// Page kinds (`home`, `section`, `page`) left out of the build
    #[serde(default, rename = "disablekinds")]
    pub disable_kinds: Vec<String>,

    /// Regexes matched against content paths
    #[serde(default, rename = "ignorefiles")]
    pub ignore_files: Vec<String>,

    /// Section name to URL pattern
    #[serde(default)]
    permalinks: Map<String, Value>,

    #[serde(default)]
    pub params: Map<String, Value>,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            title: String::new(),
            content_dir: default_content_dir(),
            default_language: default_language(),
            languages: BTreeMap::new(),
            build_drafts: false,
            build_future: false,
            build_expired: false,
            ugly_urls: false,
            has_cjk_language: false,
            disable_kinds: Vec::new(),
            ignore_files: Vec::new(),
            permalinks: Map::new(),
            params: Map::new(),
        }
    }
}

impl SiteConfig {
    /// Find the site config file inside a site root
    pub fn locate(source_dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| source_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load a site config file; the format follows the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SiteidxError::corpus(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("toml")
            .to_ascii_lowercase();

        let value = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str::<serde_yaml::Value>(&contents)
                .map_err(|e| e.to_string())
                .and_then(yaml_to_json),
            "json" => serde_json::from_str::<Value>(&contents).map_err(|e| e.to_string()),
            _ => toml::from_str::<toml::Table>(&contents)
                .map(|table| toml_to_json(toml::Value::Table(table)))
                .map_err(|e| e.to_string()),
        }
        .map_err(|e| SiteidxError::corpus(path, e))?;

        Self::from_value(value).map_err(|e| SiteidxError::corpus(path, e))
    }

    /// Build from an already parsed config tree
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        let value = match lowercase_keys(value) {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        serde_json::from_value(value).map_err(|e| e.to_string())
    }

    /// Path component of `baseURL` without a trailing slash
    ///
    /// `https://example.org/docs/` yields `/docs`; a root URL yields "".
    pub fn base_path(&self) -> String {
        let url = self.base_url.trim();
        let path = match url.find("://") {
            Some(scheme_end) => {
                let rest = &url[scheme_end + 3..];
                rest.find('/').map_or("", |slash| &rest[slash..])
            }
            None if url.starts_with('/') => url,
            None => "",
        };
        path.trim_end_matches('/').to_string()
    }

    /// Permalink pattern configured for a section
    ///
    /// Accepts both `[permalinks] posts = ...` and
    /// `[permalinks.page] posts = ...`.
    pub fn permalink_pattern(&self, section: &str) -> Option<&str> {
        let section = section.to_lowercase();
        self.permalinks
            .get(&section)
            .and_then(Value::as_str)
            .or_else(|| {
                self.permalinks
                    .get("page")
                    .and_then(|page| page.get(&section))
                    .and_then(Value::as_str)
            })
    }

    /// Configured languages, default language first, the rest by weight
    pub fn languages_in_order(&self) -> Vec<String> {
        let default = self.default_language.to_lowercase();
        let mut others: Vec<(&String, &LanguageConfig)> = self
            .languages
            .iter()
            .filter(|(code, _)| **code != default)
            .collect();
        others.sort_by(|(a_code, a), (b_code, b)| {
            a.weight.cmp(&b.weight).then_with(|| a_code.cmp(b_code))
        });

        std::iter::once(default)
            .chain(others.into_iter().map(|(code, _)| code.clone()))
            .collect()
    }

    pub fn is_language(&self, code: &str) -> bool {
        code == self.default_language.to_lowercase() || self.languages.contains_key(code)
    }

    pub fn is_kind_disabled(&self, kind: PageKind) -> bool {
        self.disable_kinds
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(kind.name()))
    }

    /// Site params overlaid with the params of `language`
    pub fn params_for(&self, language: &str) -> Map<String, Value> {
        let mut params = self.params.clone();
        if let Some(lang) = self.languages.get(language) {
            params.extend(lang.params.clone());
        }
        params
    }
}
