//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Manage the connectors of a Kafka Connect cluster
#[derive(Parser, Debug)]
#[command(name = "kafka-connect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the REST endpoint (overrides --host/--port/--scheme)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Worker host
    #[arg(long, global = true, default_value = "localhost")]
    pub host: String,

    /// Worker REST port
    #[arg(long, global = true, default_value = "8083")]
    pub port: u16,

    /// URL scheme (http or https)
    #[arg(long, global = true, default_value = "http")]
    pub scheme: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    pub timeout_secs: u64,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connector config supplied inline or from a file
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ConfigSource {
    /// Inline config JSON
    #[arg(long)]
    pub config_json: Option<String>,

    /// Config file (JSON, or YAML for .yaml/.yml)
    #[arg(long)]
    pub config_file: Option<PathBuf>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show cluster version and id
    Info,

    /// List installed connector plugins
    Plugins,

    /// Validate a config against a plugin
    Validate {
        /// Plugin class name or alias
        plugin: String,

        #[command(flatten)]
        config: ConfigSource,
    },

    /// List connectors
    List {
        /// Fetch the detail of every connector
        #[arg(long)]
        expand: bool,
    },

    /// Show one connector
    Get { name: String },

    /// Show the status of a connector and its tasks
    Status { name: String },

    /// Create a connector, or replace its config
    Create {
        name: String,

        #[command(flatten)]
        config: ConfigSource,
    },

    /// Set one config key, keeping the others
    SetConfig {
        name: String,
        key: String,
        value: String,
    },

    /// Remove one config key
    UnsetConfig { name: String, key: String },

    /// Delete a connector (succeeds if already absent)
    Delete { name: String },

    /// Pause a connector
    Pause { name: String },

    /// Resume a connector
    Resume { name: String },

    /// Restart a connector
    Restart { name: String },

    /// List the tasks of a connector with their status
    Tasks { name: String },

    /// Restart one task
    RestartTask { name: String, task_id: u32 },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable lines
    Text,
}
