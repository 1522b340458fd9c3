//! Configuration management for the site indexer.
//!
//! A [`Config`] is resolved once per run from defaults plus explicit
//! overrides and then passed by reference to whoever needs it. Overrides
//! are layered: TOML file, then `SITEIDX_*` environment variables, then
//! command-line flags.

use crate::core::error::{Result, SiteidxError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest writer heap tantivy accepts for a single indexing thread
pub const MIN_WRITER_MEMORY_MB: usize = 15;

/// Resolved run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Directory holding the persistent search index
    pub index_dir: PathBuf,

    /// Verbose logging
    pub verbose: bool,

    /// Emit logs as JSON lines instead of the compact text format
    pub log_json: bool,

    /// Root of the content site
    pub source_dir: PathBuf,

    /// Explicit site config file; autodetected inside `source_dir` when unset
    pub site_config: Option<PathBuf>,

    /// Heap budget for the index writer in megabytes
    pub writer_memory_mb: usize,

    /// Config file the overrides were read from, if any
    pub config_file: Option<PathBuf>,
}

/// Explicitly set configuration values
///
/// Every field is optional: `None` means "not set by this layer".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub index_dir: Option<PathBuf>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub log_json: Option<bool>,
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub site_config: Option<PathBuf>,
    #[serde(default)]
    pub writer_memory_mb: Option<usize>,
}

// Default value functions
fn default_index_dir() -> PathBuf {
    PathBuf::from("search.tantivy")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_writer_memory_mb() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            verbose: false,
            log_json: false,
            source_dir: default_source_dir(),
            site_config: None,
            writer_memory_mb: default_writer_memory_mb(),
            config_file: None,
        }
    }
}

impl ConfigOverrides {
    /// Load overrides from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            SiteidxError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let overrides: ConfigOverrides = toml::from_str(&contents)?;
        Ok(overrides)
    }

    /// Collect overrides from `SITEIDX_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut overrides = Self::default();

        if let Ok(dir) = env::var("SITEIDX_INDEX_DIR") {
            overrides.index_dir = Some(PathBuf::from(dir));
        }
        if let Ok(verbose) = env::var("SITEIDX_VERBOSE") {
            overrides.verbose = Some(parse_bool("SITEIDX_VERBOSE", &verbose)?);
        }
        if let Ok(json) = env::var("SITEIDX_LOG_JSON") {
            overrides.log_json = Some(parse_bool("SITEIDX_LOG_JSON", &json)?);
        }
        if let Ok(dir) = env::var("SITEIDX_SOURCE_DIR") {
            overrides.source_dir = Some(PathBuf::from(dir));
        }
        if let Ok(file) = env::var("SITEIDX_SITE_CONFIG") {
            overrides.site_config = Some(PathBuf::from(file));
        }
        if let Ok(mb) = env::var("SITEIDX_WRITER_MEMORY_MB") {
            let mb = mb.trim().parse().map_err(|e| {
                SiteidxError::ConfigError(format!("SITEIDX_WRITER_MEMORY_MB '{mb}': {e}"))
            })?;
            overrides.writer_memory_mb = Some(mb);
        }

        Ok(overrides)
    }

    /// Layer `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            index_dir: other.index_dir.or(self.index_dir),
            verbose: other.verbose.or(self.verbose),
            log_json: other.log_json.or(self.log_json),
            source_dir: other.source_dir.or(self.source_dir),
            site_config: other.site_config.or(self.site_config),
            writer_memory_mb: other.writer_memory_mb.or(self.writer_memory_mb),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(SiteidxError::ConfigError(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

impl Config {
    /// Apply explicit overrides to the defaults
    ///
    /// Never fails: anything not overridden keeps its default.
    pub fn resolve(overrides: &ConfigOverrides) -> Self {
        let defaults = Self::default();
        Self {
            index_dir: overrides
                .index_dir
                .clone()
                .unwrap_or(defaults.index_dir),
            verbose: overrides.verbose.unwrap_or(defaults.verbose),
            log_json: overrides.log_json.unwrap_or(defaults.log_json),
            source_dir: overrides
                .source_dir
                .clone()
                .unwrap_or(defaults.source_dir),
            site_config: overrides.site_config.clone().or(defaults.site_config),
            writer_memory_mb: overrides
                .writer_memory_mb
                .unwrap_or(defaults.writer_memory_mb),
            config_file: None,
        }
    }

    /// Load config with priority: flags > env vars > TOML > defaults
    ///
    /// Config file lookup order:
    /// 1. SITEIDX_CONFIG env var
    /// 2. ./siteidx.toml
    /// 3. <user config dir>/siteidx/config.toml
    pub fn load(flags: ConfigOverrides) -> Result<Self> {
        let config_file = config_file_path();
        let file = match &config_file {
            Some(path) => ConfigOverrides::from_file(path)?,
            None => ConfigOverrides::default(),
        };

        let overrides = file.merge(ConfigOverrides::from_env()?).merge(flags);
        let config = Self {
            config_file,
            ..Self::resolve(&overrides)
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.index_dir.as_os_str().is_empty() {
            return Err(SiteidxError::ConfigError(
                "Index directory must not be empty".to_string(),
            ));
        }

        if self.writer_memory_mb < MIN_WRITER_MEMORY_MB {
            return Err(SiteidxError::ConfigError(format!(
                "Writer memory must be at least {MIN_WRITER_MEMORY_MB} MB, got {}",
                self.writer_memory_mb
            )));
        }

        Ok(())
    }

    /// Writer heap in bytes
    pub fn writer_memory_bytes(&self) -> usize {
        self.writer_memory_mb * 1024 * 1024
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        match &self.config_file {
            Some(path) => tracing::info!("  Config file: {:?}", path),
            None => tracing::info!("  Config file: none"),
        }
        tracing::info!("  Index dir: {:?}", self.index_dir);
        tracing::info!("  Source dir: {:?}", self.source_dir);
        match &self.site_config {
            Some(path) => tracing::info!("  Site config: {:?}", path),
            None => tracing::info!("  Site config: autodetect"),
        }
        tracing::info!("  Writer memory: {} MB", self.writer_memory_mb);
        tracing::info!("  Verbose: {}", self.verbose);
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("SITEIDX_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from("siteidx.toml");
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("siteidx").join("config.toml"))
        .filter(|path| path.exists())
}
