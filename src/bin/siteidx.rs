//! siteidx - build a full-text index over a content site
//!
//! # Examples
//!
//! ```bash
//! # Index the site in the current directory into ./search.tantivy
//! siteidx
//!
//! # Same, logging progress to stderr
//! siteidx --verbose
//! ```

use clap::Parser;
use siteidx::cli::output::print_error;
use siteidx::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(operation = e.operation(), "{}", e);
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
