//! # Kafka Connect client
//!
//! Manage the connectors of a Kafka Connect cluster through its REST API,
//! with map-like access to the connector set.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use kafka_connect::{ClusterConfig, ConnectorConfig, KafkaConnect, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let kc = KafkaConnect::new(&ClusterConfig::from_url("http://localhost:8083")?)?;
//!     let connectors = kc.connectors();
//!
//!     // Create or replace
//!     let config: ConnectorConfig = [
//!         ("connector.class".to_string(), "FileStreamSource".to_string()),
//!         ("topic".to_string(), "test".to_string()),
//!     ]
//!     .into();
//!     connectors.set("sample-connector", config).await?;
//!
//!     // Change one key, keeping the others
//!     let mut connector = connectors.get("sample-connector").await?;
//!     connector.set_config_key("tasks.max", "2").await?;
//!
//!     // Walk every connector, one detail fetch per step
//!     let mut all = connectors.iter();
//!     while let Some(connector) = all.try_next().await? {
//!         println!("{}: {}", connector.name(), connector.state().await?);
//!     }
//!
//!     connectors.delete("sample-connector").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! KafkaConnect ──► Connectors ──► Resource ──► Transport (HttpTransport)
//!                      │             ▲
//!                      ▼             │
//!                  Connector ──► Task
//! ```
//!
//! Entities are detached copies: they hold a handle to the shared
//! transport and issue new requests for every mutation or fresh read.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cluster connection configuration
pub mod config;

/// HTTP transport and status mapping
pub mod http;

/// Generic REST resource accessor
pub mod resource;

/// Connector entity
pub mod connector;

/// Task entity
pub mod task;

/// Map-like connector collection
pub mod connectors;

/// Connector plugins
pub mod plugin;

/// Cluster entry point
pub mod cluster;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use cluster::{ClusterInfo, KafkaConnect};
pub use config::{ClusterConfig, Scheme};
pub use connector::{Connector, ConnectorState, ConnectorStatus, ConnectorType};
pub use connectors::{ConnectorStream, Connectors};
pub use error::{Error, Result, ResultExt};
pub use http::{HttpTransport, ThrottleConfig, Transport};
pub use plugin::{ConfigValidation, Plugin, PluginInfo};
pub use task::{Task, TaskState, TaskStatus, TaskStream};
pub use types::{ConnectorConfig, Method};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
