//! CLI adapter for siteidx
//!
//! Parses the command line, resolves configuration, initialises logging
//! and runs one indexing pass over the site.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::config::{Config, ConfigOverrides};
use crate::core::corpus::ContentSite;
use crate::core::error::Result;
use crate::core::indexer::IndexingPipeline;
use crate::core::storage::inspect::{stored_keys, IndexSummary};
use crate::core::storage::TantivyLifecycle;

use output::RunReport;

/// siteidx - full-text index builder for static content sites
///
/// Reads the site in the current directory and writes its pages into a
/// tantivy index. Re-running replaces documents by permalink.
#[derive(Parser, Debug)]
#[command(name = "siteidx")]
#[command(version)]
#[command(about = "Build a full-text index over a content site", long_about = None)]
pub struct Cli {
    /// Log progress (info level) to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Overrides carried by the command line; unset flags stay `None`
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            verbose: self.verbose.then_some(true),
            ..Default::default()
        }
    }
}

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence over the verbose setting.
pub fn init_logging(config: &Config) {
    let default_level = if config.verbose {
        "siteidx=info"
    } else {
        "siteidx=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests); keep it
    let _ = if config.log_json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.overrides())?;

    init_logging(&config);
    tracing::info!("siteidx {}", env!("CARGO_PKG_VERSION"));
    config.log_config();

    let report = execute(&config)?;
    report.print();

    if tracing::enabled!(tracing::Level::INFO) {
        for key in stored_keys(&config.index_dir)? {
            tracing::info!("Stored: {}", key);
        }
    }

    Ok(())
}

/// Index the site described by `config` and summarise the result
pub fn execute(config: &Config) -> Result<RunReport> {
    let corpus = ContentSite::from_config(config);
    let lifecycle = TantivyLifecycle::from_config(config);

    let stats = IndexingPipeline::new(config.clone()).run(&corpus, &lifecycle)?;
    let summary = IndexSummary::load(&config.index_dir)?;

    Ok(RunReport::new(&config.index_dir, stats, summary))
}
