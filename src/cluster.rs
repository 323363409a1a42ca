//! Cluster facade
//!
//! [`KafkaConnect`] is the entry point: cluster info, the connector
//! collection and the plugin listing, all sharing one transport.

use crate::config::ClusterConfig;
use crate::connectors::Connectors;
use crate::error::Result;
use crate::http::{HttpTransport, Transport};
use crate::plugin::{Plugin, PluginInfo};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub version: String,
    pub commit: String,
    #[serde(rename = "kafka_cluster_id")]
    pub cluster_id: String,
}

/// Client for one connect cluster
#[derive(Debug, Clone)]
pub struct KafkaConnect {
    root: Resource,
    plugins: Resource,
    connectors: Connectors,
}

impl KafkaConnect {
    /// Client for the cluster at `localhost:8083`
    pub fn local() -> Result<Self> {
        Self::new(&ClusterConfig::default())
    }

    /// Build a client from connection config. No request is sent.
    pub fn new(config: &ClusterConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Build a client on top of any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            root: Resource::root(Arc::clone(&transport)),
            plugins: Resource::new(Arc::clone(&transport), "connector-plugins"),
            connectors: Connectors::new(transport),
        }
    }

    /// Version and id of the cluster, fetched now
    pub async fn info(&self) -> Result<ClusterInfo> {
        self.root.fetch().await
    }

    /// Check that the cluster answers
    pub async fn ping(&self) -> Result<()> {
        self.info().await.map(drop)
    }

    /// The connector collection
    pub fn connectors(&self) -> &Connectors {
        &self.connectors
    }

    /// Installed connector plugins
    pub async fn plugins(&self) -> Result<Vec<Plugin>> {
        let infos: Vec<PluginInfo> = self.plugins.fetch().await?;
        Ok(infos
            .into_iter()
            .map(|info| Plugin::new(self.plugins.clone(), info))
            .collect())
    }
}
