//! Task entity
//!
//! A task is one parallel execution unit of a connector. The cluster alone
//! decides which tasks exist; the client only observes them and can ask
//! for a restart.

use crate::connector::TaskId;
use crate::error::Result;
use crate::resource::Resource;
use crate::types::ConnectorConfig;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use tracing::info;

/// Lazily fetched sequence of tasks
pub type TaskStream = Pin<Box<dyn Stream<Item = Result<Task>> + Send>>;

/// Lifecycle state of a task as reported by the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Running,
    Paused,
    Failed,
    Unassigned,
    Restarting,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Running => "RUNNING",
            TaskState::Paused => "PAUSED",
            TaskState::Failed => "FAILED",
            TaskState::Unassigned => "UNASSIGNED",
            TaskState::Restarting => "RESTARTING",
            TaskState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// `GET /connectors/{name}/tasks/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub id: u32,
    pub state: TaskState,
    #[serde(default)]
    pub worker_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl TaskStatus {
    pub fn is_failed(&self) -> bool {
        self.state == TaskState::Failed
    }
}

/// One entry of `GET /connectors/{name}/tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: TaskId,
    #[serde(default)]
    pub config: ConnectorConfig,
}

/// A task of a connector, with its status as of when it was produced
#[derive(Debug, Clone)]
pub struct Task {
    /// `/connectors/{name}/tasks`
    tasks: Resource,
    info: TaskInfo,
    status: TaskStatus,
}

impl Task {
    /// Fetch the status of the listed task and build the entity
    pub(crate) async fn load(tasks: Resource, info: TaskInfo) -> Result<Self> {
        let status = fetch_status(&tasks, info.id.task).await?;
        Ok(Self {
            tasks,
            info,
            status,
        })
    }

    /// Name of the owning connector
    pub fn connector(&self) -> &str {
        &self.info.id.connector
    }

    /// Task id, unique within the connector
    pub fn id(&self) -> u32 {
        self.info.id.task
    }

    /// Task configuration as generated by the connector
    pub fn config(&self) -> &ConnectorConfig {
        &self.info.config
    }

    /// Status snapshot
    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    pub fn state(&self) -> TaskState {
        self.status.state
    }

    pub fn worker_id(&self) -> &str {
        &self.status.worker_id
    }

    /// Re-read the status from the cluster. The snapshot is left untouched.
    pub async fn fetch_status(&self) -> Result<TaskStatus> {
        fetch_status(&self.tasks, self.id()).await
    }

    /// Restart this task.
    ///
    /// Fails with `NotFound` if the task or connector is gone and with
    /// `Conflict` while the cluster is rebalancing.
    pub async fn restart(&self) -> Result<()> {
        info!("Restarting task {} of connector '{}'", self.id(), self.connector());
        self.tasks
            .post_action(&self.id().to_string(), "restart")
            .await
    }
}

async fn fetch_status(tasks: &Resource, id: u32) -> Result<TaskStatus> {
    tasks.item(id.to_string()).get("status").await
}
