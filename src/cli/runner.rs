//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ConfigSource, OutputFormat};
use crate::cluster::KafkaConnect;
use crate::config::ClusterConfig;
use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::task::Task;
use crate::types::ConnectorConfig;
use futures::TryStreamExt;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Connection config from the global flags
    pub fn cluster_config(&self) -> Result<ClusterConfig> {
        let base = match &self.cli.url {
            Some(url) => ClusterConfig::from_url(url)?,
            None => ClusterConfig::builder()
                .scheme(self.cli.scheme.parse()?)
                .host(self.cli.host.clone())
                .port(self.cli.port)
                .build(),
        };
        Ok(ClusterConfig {
            timeout: Duration::from_secs(self.cli.timeout_secs),
            ..base
        })
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.cluster_config()?;
        debug!("Using cluster at {}", config.base_url());
        let kc = KafkaConnect::new(&config)?;
        let connectors = kc.connectors();

        match &self.cli.command {
            Commands::Info => {
                let info = kc.info().await?;
                self.emit(&info, || {
                    format!(
                        "version:    {}\ncommit:     {}\ncluster id: {}",
                        info.version, info.commit, info.cluster_id
                    )
                })
            }
            Commands::Plugins => {
                let plugins = kc.plugins().await?;
                let infos: Vec<_> = plugins.iter().map(|p| p.info().clone()).collect();
                self.emit(&infos, || {
                    infos
                        .iter()
                        .map(|p| format!("{}\t{}\t{}", p.plugin_type, p.version, p.class_name))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            Commands::Validate { plugin, config } => {
                let config = load_config(config)?;
                let plugins = kc.plugins().await?;
                let target = plugins
                    .iter()
                    .find(|p| p.class_name() == plugin || p.info().alias() == plugin)
                    .ok_or_else(|| Error::not_found(format!("plugin '{plugin}'")))?;
                let validation = target.validate(&config).await?;
                self.emit(&validation, || {
                    if validation.is_valid() {
                        return "config is valid".to_string();
                    }
                    validation
                        .errors()
                        .map(|(key, messages)| format!("{key}: {}", messages.join("; ")))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            Commands::List { expand } => {
                if *expand {
                    let all: Vec<Connector> = connectors.iter().try_collect().await?;
                    let infos: Vec<_> = all.iter().map(Connector::info).collect();
                    self.emit(&infos, || {
                        all.iter()
                            .map(|c| format!("{}\t{} tasks", c.name(), c.tasks_count()))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                } else {
                    let names = connectors.names().await?;
                    self.emit(&names, || names.join("\n"))
                }
            }
            Commands::Get { name } => {
                let connector = connectors.get(name).await?;
                self.emit(connector.info(), || describe(&connector))
            }
            Commands::Status { name } => {
                let status = connectors.get(name).await?.status().await?;
                self.emit(&status, || {
                    let mut lines = vec![format!(
                        "{}: {} on {}",
                        status.name, status.connector.state, status.connector.worker_id
                    )];
                    for task in &status.tasks {
                        lines.push(format!(
                            "  task {}: {} on {}",
                            task.id, task.state, task.worker_id
                        ));
                    }
                    lines.join("\n")
                })
            }
            Commands::Create { name, config } => {
                let connector = connectors.set(name, load_config(config)?).await?;
                self.emit(connector.info(), || describe(&connector))
            }
            Commands::SetConfig { name, key, value } => {
                let mut connector = connectors.get(name).await?;
                connector.set_config_key(key.clone(), value.clone()).await?;
                self.emit(connector.info(), || describe(&connector))
            }
            Commands::UnsetConfig { name, key } => {
                let mut connector = connectors.get(name).await?;
                let removed = connector.remove_config_key(key).await?;
                self.emit(&json!({ "key": key, "removed": removed }), || match &removed {
                    Some(value) => format!("removed {key}={value}"),
                    None => format!("{key} was not set"),
                })
            }
            Commands::Delete { name } => {
                connectors.delete(name).await?;
                self.done("deleted", name)
            }
            Commands::Pause { name } => {
                connectors.handle(name).pause().await?;
                self.done("paused", name)
            }
            Commands::Resume { name } => {
                connectors.handle(name).resume().await?;
                self.done("resumed", name)
            }
            Commands::Restart { name } => {
                connectors.handle(name).restart().await?;
                self.done("restarted", name)
            }
            Commands::Tasks { name } => {
                let tasks: Vec<Task> = connectors.get(name).await?.tasks().try_collect().await?;
                let docs: Vec<Value> = tasks
                    .iter()
                    .map(|t| json!({ "id": t.id(), "status": t.status(), "config": t.config() }))
                    .collect();
                self.emit(&docs, || {
                    tasks
                        .iter()
                        .map(|t| format!("{}\t{}\t{}", t.id(), t.state(), t.worker_id()))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            Commands::RestartTask { name, task_id } => {
                connectors.handle(name).restart_task(*task_id).await?;
                self.done("restarted", &format!("{name}/{task_id}"))
            }
        }
    }

    /// Print `value` as JSON, or the text rendering
    fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => println!("{}", text()),
        }
        Ok(())
    }

    fn done(&self, action: &str, target: &str) -> Result<()> {
        self.emit(&json!({ "action": action, "target": target }), || {
            format!("{action} {target}")
        })
    }
}

fn describe(connector: &Connector) -> String {
    let mut keys: Vec<_> = connector.config().iter().collect();
    keys.sort();
    let mut lines = vec![format!(
        "{} ({} tasks)",
        connector.name(),
        connector.tasks_count()
    )];
    lines.extend(keys.into_iter().map(|(k, v)| format!("  {k}={v}")));
    lines.join("\n")
}

/// Read a connector config from the inline JSON or the file
pub fn load_config(source: &ConfigSource) -> Result<ConnectorConfig> {
    if let Some(json) = &source.config_json {
        return parse_config(json, false);
    }
    match &source.config_file {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(&content, is_yaml(path))
        }
        None => Err(Error::config("no connector config given")),
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Parse a flat config object. Scalar values are turned into strings, so
/// `{"tasks.max": 2}` is accepted.
fn parse_config(content: &str, yaml: bool) -> Result<ConnectorConfig> {
    let value: Value = if yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };

    let Value::Object(map) = value else {
        return Err(Error::config("connector config must be an object"));
    };

    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::config(format!(
                        "value of '{key}' must be a scalar, got {other}"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}
