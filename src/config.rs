//! Cluster connection configuration
//!
//! Describes where a connect cluster's REST endpoint lives and how requests
//! to it are issued. Nothing here touches the network.

use crate::error::{Error, Result};
use crate::http::ThrottleConfig;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default REST port of a connect worker
pub const DEFAULT_PORT: u16 = 8083;

/// Default host
pub const DEFAULT_HOST: &str = "localhost";

/// URL scheme of the REST endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(Error::config(format!("unsupported scheme '{other}'"))),
        }
    }
}

/// Configuration for a connect cluster client
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// URL scheme
    pub scheme: Scheme,
    /// Host name or address of a worker
    pub host: String,
    /// REST port of the worker
    pub port: u16,
    /// Per-request timeout; expiry surfaces as `Unreachable`
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// Client-side request throttle
    pub throttle: Option<ThrottleConfig>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(30),
            user_agent: format!("kafka-connect-client/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            throttle: None,
        }
    }
}

impl ClusterConfig {
    /// Create a new config builder
    pub fn builder() -> ClusterConfigBuilder {
        ClusterConfigBuilder::default()
    }

    /// Parse a base URL such as `https://connect.internal:8083`.
    ///
    /// Missing ports fall back to [`DEFAULT_PORT`], not the scheme's
    /// well-known port.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)?;
        let scheme = parsed.scheme().parse()?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::config(format!("URL '{url}' has no host")))?
            .to_string();

        Ok(Self {
            scheme,
            host,
            port: parsed.port().unwrap_or(DEFAULT_PORT),
            ..Self::default()
        })
    }

    /// Base URL of the REST endpoint, without trailing slash
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Builder for cluster config
#[derive(Default)]
pub struct ClusterConfigBuilder {
    config: ClusterConfig,
}

impl ClusterConfigBuilder {
    /// Set the scheme
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.config.scheme = scheme;
        self
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Limit the request rate of the client
    pub fn throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.config.throttle = Some(throttle);
        self
    }

    /// Build the config
    pub fn build(self) -> ClusterConfig {
        self.config
    }
}
