//! Connector collection
//!
//! [`Connectors`] makes the cluster's set of named connectors behave like
//! a map from name to [`Connector`]:
//!
//! | Map operation | Requests                                         |
//! |---------------|--------------------------------------------------|
//! | `names`/`len` | `GET /connectors`                                |
//! | `get`         | `GET /connectors/{name}`                         |
//! | `set`         | `PUT /connectors/{name}/config`                  |
//! | `delete`      | `DELETE /connectors/{name}` (404 counts as done) |
//! | `contains`    | `GET /connectors/{name}` (404 means false)       |
//! | `iter`        | one list, then one detail fetch per item         |
//! | `handle`      | none                                             |
//!
//! There are no multi-key operations. Nothing is cached, and consecutive
//! calls may see different cluster states.

use crate::connector::{info_from_put, Connector, ConnectorInfo};
use crate::error::{Error, Result, ResultExt};
use crate::http::Transport;
use crate::resource::Resource;
use crate::types::{ConnectorConfig, JsonValue};
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

/// Lazily fetched sequence of connectors
pub type ConnectorStream = Pin<Box<dyn Stream<Item = Result<Connector>> + Send>>;

/// Config key holding the connector name
pub const NAME_KEY: &str = "name";

/// Map-like view of all connectors on a cluster
#[derive(Debug, Clone)]
pub struct Connectors {
    /// `/connectors`
    resource: Resource,
}

impl Connectors {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            resource: Resource::new(transport, "connectors"),
        }
    }

    /// Connector names in the order the cluster lists them
    pub async fn names(&self) -> Result<Vec<String>> {
        self.resource.list().await
    }

    /// Number of connectors (one list call)
    pub async fn len(&self) -> Result<usize> {
        Ok(self.names().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Fetch one connector. Fails with `NotFound` if it does not exist now.
    pub async fn get(&self, name: &str) -> Result<Connector> {
        check_addressable(name)?;
        Connector::load(self.resource.clone(), name).await
    }

    /// Whether a connector with this name exists
    pub async fn contains(&self, name: &str) -> Result<bool> {
        if !is_addressable(name) {
            return Ok(false);
        }
        Ok(self.get(name).await.optional()?.is_some())
    }

    /// Entity for `name` built without any request.
    ///
    /// Its snapshot is empty; use it to send lifecycle actions. The actions
    /// fail with `NotFound` if the connector does not exist.
    pub fn handle(&self, name: &str) -> Connector {
        let info = ConnectorInfo {
            name: name.to_string(),
            config: ConnectorConfig::new(),
            tasks: Vec::new(),
            connector_type: None,
        };
        Connector::from_info(self.resource.clone(), info)
    }

    /// Create the connector, or replace its whole config if it exists.
    ///
    /// The `name` key is filled in when `config` lacks it. Repeating the
    /// call with the same config is harmless.
    pub async fn set(&self, name: &str, config: ConnectorConfig) -> Result<Connector> {
        check_addressable(name)?;
        let mut config = config;
        config
            .entry(NAME_KEY.to_string())
            .or_insert_with(|| name.to_string());

        info!("Creating or replacing connector '{}'", name);
        let resource = self.resource.item(name);
        let response: JsonValue = resource.put("config", &config).await?;
        let written = ConnectorInfo {
            name: name.to_string(),
            config,
            tasks: Vec::new(),
            connector_type: None,
        };
        let info = info_from_put(&resource, written, response)?;
        Ok(Connector::from_info(self.resource.clone(), info))
    }

    /// Delete a connector. Deleting an absent connector succeeds.
    pub async fn delete(&self, name: &str) -> Result<()> {
        if !is_addressable(name) {
            debug!("Connector name '{}' cannot exist; nothing to delete", name);
            return Ok(());
        }
        info!("Deleting connector '{}'", name);
        if self.resource.delete(name).await.optional()?.is_none() {
            debug!("Connector '{}' was already absent", name);
        }
        Ok(())
    }

    /// All connectors, fetched lazily.
    ///
    /// The name list is requested on first poll; each advance then fetches
    /// one connector. Connectors created after the list call are not
    /// visited, and one deleted before its turn ends the stream with
    /// `NotFound`. The stream ends after the first error and cannot be
    /// restarted; call `iter` again for a fresh listing.
    pub fn iter(&self) -> ConnectorStream {
        let resource = self.resource.clone();
        stream::try_unfold(None, move |pending| next_connector(resource.clone(), pending)).boxed()
    }
}

/// Empty and dot names are rewritten by URL normalisation into other paths,
/// so no connector can be reached under them.
fn is_addressable(name: &str) -> bool {
    !matches!(name, "" | "." | "..")
}

fn check_addressable(name: &str) -> Result<()> {
    if is_addressable(name) {
        Ok(())
    } else {
        Err(Error::invalid_request(
            400,
            format!("connector name '{name}' cannot be addressed"),
        ))
    }
}

async fn next_connector(
    connectors: Resource,
    pending: Option<VecDeque<String>>,
) -> Result<Option<(Connector, Option<VecDeque<String>>)>> {
    let mut pending = match pending {
        Some(pending) => pending,
        None => connectors.list().await?.into(),
    };
    match pending.pop_front() {
        Some(name) => {
            let connector = Connector::load(connectors, &name).await?;
            Ok(Some((connector, Some(pending))))
        }
        None => Ok(None),
    }
}
