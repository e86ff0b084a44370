//! Connector bindings and connector types as the engine tracks them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ComponentType, Properties};

/// A configured, named instance of a connector type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorBinding {
    /// Name the binding is deployed under
    pub deployed_name: String,
    /// Full name of the connector type this binding instantiates
    pub component_type_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    pub last_changed: DateTime<Utc>,
    #[serde(default)]
    pub last_changed_by: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub routing_uuid: String,
}

impl ConnectorBinding {
    /// Enabled binding with no properties, created and changed at `at`.
    pub fn new(
        deployed_name: impl Into<String>,
        component_type_name: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        ConnectorBinding {
            deployed_name: deployed_name.into(),
            component_type_name: component_type_name.into(),
            description: String::new(),
            enabled: true,
            created: at,
            created_by: String::new(),
            last_changed: at,
            last_changed_by: String::new(),
            properties: Properties::new(),
            routing_uuid: String::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Connector type descriptor: a component type that bindings instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorBindingType {
    #[serde(flatten)]
    pub component_type: ComponentType,
    #[serde(default)]
    pub deployable: bool,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    pub last_changed: DateTime<Utc>,
}

impl ConnectorBindingType {
    pub fn new(component_type: ComponentType, at: DateTime<Utc>) -> Self {
        ConnectorBindingType {
            component_type,
            deployable: true,
            created: at,
            created_by: String::new(),
            last_changed: at,
        }
    }

    pub fn name(&self) -> &str {
        &self.component_type.name
    }
}

/// Live state of a binding as reported by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BindingLiveness {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl From<Option<bool>> for BindingLiveness {
    fn from(state: Option<bool>) -> Self {
        match state {
            Some(true) => BindingLiveness::Open,
            Some(false) => BindingLiveness::Closed,
            None => BindingLiveness::Unknown,
        }
    }
}
