//! Generic accessor over one REST resource collection
//!
//! A [`Resource`] is a path prefix (`/connectors`, `/connector-plugins`,
//! `/connectors/{name}/tasks`, ...) bound to a shared [`Transport`]. Its
//! operations address either the prefix itself or one item below it.
//! Every call is a single, independent request.

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::{JsonValue, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A REST resource collection reachable through a transport
#[derive(Clone)]
pub struct Resource {
    transport: Arc<dyn Transport>,
    segments: Vec<String>,
}

impl Resource {
    /// The API root (`/`)
    pub fn root(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            segments: Vec::new(),
        }
    }

    /// A collection at `prefix`, e.g. `"connectors"` or `"/connector-plugins"`
    pub fn new(transport: Arc<dyn Transport>, prefix: &str) -> Self {
        Self {
            transport,
            segments: prefix
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The resource one level below this one
    pub fn item(&self, id: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.into());
        Self {
            transport: Arc::clone(&self.transport),
            segments,
        }
    }

    /// Last path segment (the item id), if any
    pub fn id(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Encoded path of this resource
    pub fn path(&self) -> String {
        encode_path(&self.segments, &[])
    }

    /// GET this resource
    pub async fn fetch<T: DeserializeOwned>(&self) -> Result<T> {
        self.call(Method::GET, &[], None).await
    }

    /// Names or ids of every item (GET on the collection root)
    pub async fn list(&self) -> Result<Vec<String>> {
        self.fetch().await
    }

    /// Detail for one item
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        self.call(Method::GET, &[id], None).await
    }

    /// Create or replace one item (PUT, idempotent)
    pub async fn put<T, B>(&self, id: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::PUT, &[id], Some(&body)).await
    }

    /// Remove one item
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.call::<JsonValue>(Method::DELETE, &[id], None)
            .await
            .map(drop)
    }

    /// Bodiless POST on `{id}/{action}`
    pub async fn post_action(&self, id: &str, action: &str) -> Result<()> {
        self.call::<JsonValue>(Method::POST, &[id, action], None)
            .await
            .map(drop)
    }

    /// Bodiless PUT on `{id}/{action}`
    pub async fn put_action(&self, id: &str, action: &str) -> Result<()> {
        self.call::<JsonValue>(Method::PUT, &[id, action], None)
            .await
            .map(drop)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        extra: &[&str],
        body: Option<&JsonValue>,
    ) -> Result<T> {
        let path = encode_path(&self.segments, extra);
        let value = self.transport.send(method, &path, body).await?;
        decode(&path, value)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.path())
            .finish_non_exhaustive()
    }
}

/// Decode a response body, naming the path on failure
pub(crate) fn decode<T: DeserializeOwned>(path: &str, value: JsonValue) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::decode(path, e.to_string()))
}

/// Join segments into an absolute path, percent-encoding each one
fn encode_path(segments: &[String], extra: &[&str]) -> String {
    let parts: Vec<String> = segments
        .iter()
        .map(String::as_str)
        .chain(extra.iter().copied())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    format!("/{}", parts.join("/"))
}
