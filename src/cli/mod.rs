//! CLI module
//!
//! Command-line interface over one cluster.
//!
//! # Commands
//!
//! - `info` / `plugins` / `validate` - cluster and plugin inspection
//! - `list` / `get` / `status` / `tasks` - connector inspection
//! - `create` / `set-config` / `unset-config` / `delete` - config changes
//! - `pause` / `resume` / `restart` / `restart-task` - lifecycle

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

/// Log filter directives for the binary.
///
/// `--verbose` forces `debug`; otherwise a non-empty `RUST_LOG` wins and
/// the fallback is `warn`.
pub fn log_directives(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => "warn".to_string(),
    }
}
