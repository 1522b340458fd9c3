//! Tests for layered configuration loading
//!
//! File < environment < command-line flags. These mutate the process
//! environment, so they run serially.

use clap::Parser;
use serial_test::serial;
use siteidx::cli::Cli;
use siteidx::core::config::Config;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

const VARS: &[&str] = &[
    "SITEIDX_CONFIG",
    "SITEIDX_INDEX_DIR",
    "SITEIDX_VERBOSE",
    "SITEIDX_LOG_JSON",
    "SITEIDX_SOURCE_DIR",
    "SITEIDX_SITE_CONFIG",
    "SITEIDX_WRITER_MEMORY_MB",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("siteidx.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
#[serial]
fn test_file_then_env_then_flags() {
    clear_env();
    let (_dir, path) = write_config(
        "index_dir = \"from-file\"\nsource_dir = \"site\"\nverbose = false\nwriter_memory_mb = 32",
    );
    env::set_var("SITEIDX_CONFIG", &path);
    env::set_var("SITEIDX_INDEX_DIR", "from-env");

    let cli = Cli::try_parse_from(["siteidx", "--verbose"]).unwrap();
    let config = Config::load(cli.overrides());
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.index_dir, PathBuf::from("from-env"));
    assert_eq!(config.source_dir, PathBuf::from("site"));
    assert_eq!(config.writer_memory_mb, 32);
    assert!(config.verbose);
    assert_eq!(config.config_file, Some(path));
}

#[test]
#[serial]
fn test_unset_flag_keeps_env_value() {
    clear_env();
    let (_dir, path) = write_config("");
    env::set_var("SITEIDX_CONFIG", &path);
    env::set_var("SITEIDX_VERBOSE", "true");

    let cli = Cli::try_parse_from(["siteidx"]).unwrap();
    let config = Config::load(cli.overrides());
    clear_env();

    assert!(config.unwrap().verbose);
}

#[test]
#[serial]
fn test_malformed_config_file() {
    clear_env();
    let (_dir, path) = write_config("index_dir = [");
    env::set_var("SITEIDX_CONFIG", &path);

    let result = Config::load(Default::default());
    clear_env();

    assert_eq!(result.unwrap_err().operation(), "config");
}

#[test]
#[serial]
fn test_invalid_writer_budget_rejected() {
    clear_env();
    let (_dir, path) = write_config("writer_memory_mb = 2");
    env::set_var("SITEIDX_CONFIG", &path);

    let result = Config::load(Default::default());
    clear_env();

    assert_eq!(result.unwrap_err().operation(), "config");
}

#[test]
#[serial]
fn test_missing_explicit_config_file() {
    clear_env();
    env::set_var("SITEIDX_CONFIG", "/nonexistent/siteidx.toml");

    let result = Config::load(Default::default());
    clear_env();

    assert!(result.is_err());
}
