//! Connector entity
//!
//! A [`Connector`] is a detached copy of one connector's detail document
//! plus a handle to its REST resource. Reads that must be current
//! (`status`, `fetch_config`, `tasks`) always go to the cluster; the
//! snapshot accessors (`config`, `task_ids`, ...) never do.
//!
//! # Config writes
//!
//! The control API only accepts whole configs, so
//! [`Connector::set_config_key`] reads the current config, changes one key
//! and writes the result back. The read and the write are separate
//! requests: a change made by someone else in between is overwritten.

mod types;

pub use types::{
    ConnectorInfo, ConnectorState, ConnectorStateInfo, ConnectorStatus, ConnectorType, TaskId,
};

use crate::error::Result;
use crate::resource::{decode, Resource};
use crate::task::{Task, TaskInfo, TaskStream};
use crate::types::{ConnectorConfig, JsonValue};
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use tracing::info;

/// A connector on the cluster
#[derive(Debug, Clone)]
pub struct Connector {
    /// `/connectors`
    connectors: Resource,
    info: ConnectorInfo,
}

impl Connector {
    /// Fetch the detail document of `name` from the `/connectors` collection
    pub(crate) async fn load(connectors: Resource, name: &str) -> Result<Self> {
        let info = connectors.get(name).await?;
        Ok(Self { connectors, info })
    }

    pub(crate) fn from_info(connectors: Resource, info: ConnectorInfo) -> Self {
        Self { connectors, info }
    }

    /// `/connectors/{name}`
    fn resource(&self) -> Resource {
        self.connectors.item(self.info.name.as_str())
    }

    /// Connector name; never changes
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Config snapshot
    pub fn config(&self) -> &ConnectorConfig {
        &self.info.config
    }

    /// Source or sink, when the cluster reports it
    pub fn connector_type(&self) -> Option<ConnectorType> {
        self.info.connector_type
    }

    /// Ids of the tasks listed in the snapshot
    pub fn task_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.info.tasks.iter().map(|t| t.task)
    }

    pub fn tasks_count(&self) -> usize {
        self.info.tasks.len()
    }

    /// The detail document this entity was built from
    pub fn info(&self) -> &ConnectorInfo {
        &self.info
    }

    /// Re-read the detail document into the snapshot
    pub async fn refresh(&mut self) -> Result<()> {
        self.info = self.connectors.get(&self.info.name).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------------

    /// Current config as stored on the cluster
    pub async fn fetch_config(&self) -> Result<ConnectorConfig> {
        self.resource().get("config").await
    }

    /// Set one config key: read the whole config, merge, write it back.
    ///
    /// Not atomic; see the module docs.
    pub async fn set_config_key(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let mut config = self.fetch_config().await?;
        config.insert(key.into(), value.into());
        self.write_config(config).await
    }

    /// Remove one config key the same way [`set_config_key`] sets one.
    ///
    /// Returns the removed value. Nothing is written if the key was absent.
    ///
    /// [`set_config_key`]: Connector::set_config_key
    pub async fn remove_config_key(&mut self, key: &str) -> Result<Option<String>> {
        let mut config = self.fetch_config().await?;
        let removed = config.remove(key);
        if removed.is_some() {
            self.write_config(config).await?;
        }
        Ok(removed)
    }

    /// Replace the whole config in one write
    pub async fn replace_config(&mut self, config: ConnectorConfig) -> Result<()> {
        self.write_config(config).await
    }

    async fn write_config(&mut self, config: ConnectorConfig) -> Result<()> {
        info!("Updating config of connector '{}'", self.name());
        let resource = self.resource();
        let response: JsonValue = resource.put("config", &config).await?;
        let written = ConnectorInfo {
            config,
            ..self.info.clone()
        };
        self.info = info_from_put(&resource, written, response)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Status and tasks
    // ------------------------------------------------------------------------

    /// Full status document, freshly fetched
    pub async fn status(&self) -> Result<ConnectorStatus> {
        self.resource().get("status").await
    }

    /// Current connector state, freshly fetched
    pub async fn state(&self) -> Result<ConnectorState> {
        Ok(self.status().await?.state())
    }

    /// Tasks of this connector, in the order the cluster lists them.
    ///
    /// The task list is fetched on first poll, then each task's status is
    /// fetched as the stream advances. The stream ends after the first
    /// error.
    pub fn tasks(&self) -> TaskStream {
        let tasks = self.resource().item("tasks");
        stream::try_unfold(None, move |pending| next_task(tasks.clone(), pending)).boxed()
    }

    /// One task by id, with a freshly fetched status
    pub async fn task(&self, id: u32) -> Result<Task> {
        let info = TaskInfo {
            id: TaskId {
                connector: self.info.name.clone(),
                task: id,
            },
            config: ConnectorConfig::new(),
        };
        Task::load(self.resource().item("tasks"), info).await
    }

    /// Restart one task by id without fetching it first.
    ///
    /// Fails with `NotFound` if the task is gone and with `Conflict` while
    /// the cluster is rebalancing.
    pub async fn restart_task(&self, id: u32) -> Result<()> {
        info!("Restarting task {} of connector '{}'", id, self.name());
        self.resource()
            .item("tasks")
            .post_action(&id.to_string(), "restart")
            .await
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Pause the connector and its tasks
    pub async fn pause(&self) -> Result<()> {
        info!("Pausing connector '{}'", self.name());
        self.connectors.put_action(&self.info.name, "pause").await
    }

    /// Resume a paused connector
    pub async fn resume(&self) -> Result<()> {
        info!("Resuming connector '{}'", self.name());
        self.connectors.put_action(&self.info.name, "resume").await
    }

    /// Restart the connector.
    ///
    /// Fails with `Conflict` while the cluster is rebalancing; the caller
    /// may retry.
    pub async fn restart(&self) -> Result<()> {
        info!("Restarting connector '{}'", self.name());
        self.connectors.post_action(&self.info.name, "restart").await
    }
}

/// Build the snapshot after a config `PUT`.
///
/// Clusters answer with the detail document; when the body is empty or is
/// the bare config, `written` is taken as the new state.
pub(crate) fn info_from_put(
    resource: &Resource,
    written: ConnectorInfo,
    response: JsonValue,
) -> Result<ConnectorInfo> {
    if response.get("config").is_some_and(JsonValue::is_object) {
        return decode(&resource.path(), response);
    }
    Ok(written)
}

async fn next_task(
    tasks: Resource,
    pending: Option<VecDeque<TaskInfo>>,
) -> Result<Option<(Task, Option<VecDeque<TaskInfo>>)>> {
    let mut pending = match pending {
        Some(pending) => pending,
        None => tasks.fetch::<Vec<TaskInfo>>().await?.into(),
    };
    match pending.pop_front() {
        Some(info) => {
            let task = Task::load(tasks, info).await?;
            Ok(Some((task, Some(pending))))
        }
        None => Ok(None),
    }
}
