//! Connector plugins installed on the cluster

use crate::error::Result;
use crate::resource::Resource;
use crate::types::ConnectorConfig;
use serde::{Deserialize, Serialize};

/// Config key naming the connector implementation
pub const CONNECTOR_CLASS_KEY: &str = "connector.class";

/// One entry of `GET /connector-plugins`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(rename = "type", default)]
    pub plugin_type: String,
    #[serde(default)]
    pub version: String,
}

impl PluginInfo {
    /// Short name of the plugin: the last segment of its class name
    pub fn alias(&self) -> &str {
        self.class_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.class_name)
    }
}

/// A plugin, able to validate configs against itself
#[derive(Debug, Clone)]
pub struct Plugin {
    /// `/connector-plugins`
    plugins: Resource,
    info: PluginInfo,
}

impl Plugin {
    pub(crate) fn new(plugins: Resource, info: PluginInfo) -> Self {
        Self { plugins, info }
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    pub fn class_name(&self) -> &str {
        &self.info.class_name
    }

    pub fn plugin_type(&self) -> &str {
        &self.info.plugin_type
    }

    pub fn version(&self) -> &str {
        &self.info.version
    }

    /// Ask the cluster to validate `config` for this plugin.
    ///
    /// `connector.class` is filled in with this plugin's class when absent.
    /// An invalid config is not an error: the result carries the per-key
    /// messages.
    pub async fn validate(&self, config: &ConnectorConfig) -> Result<ConfigValidation> {
        let mut config = config.clone();
        config
            .entry(CONNECTOR_CLASS_KEY.to_string())
            .or_insert_with(|| self.info.class_name.clone());

        self.plugins
            .item(self.info.alias())
            .item("config")
            .put("validate", &config)
            .await
    }
}

/// `PUT /connector-plugins/{alias}/config/validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigValidation {
    pub name: String,
    pub error_count: u32,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub configs: Vec<ConfigKeyValidation>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }

    /// `(key, messages)` for every key that failed validation
    pub fn errors(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.configs
            .iter()
            .filter(|c| !c.value.errors.is_empty())
            .map(|c| (c.value.name.as_str(), c.value.errors.as_slice()))
    }
}

/// Definition and validated value of one config key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigKeyValidation {
    #[serde(default)]
    pub definition: Option<ConfigKeyDefinition>,
    pub value: ConfigKeyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigKeyDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub key_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigKeyValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub recommended_values: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}
