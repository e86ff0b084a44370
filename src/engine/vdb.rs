//! Virtual database definitions and their models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConnectorBinding;

/// Deployment status of a VDB version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VdbStatus {
    #[default]
    Incomplete,
    Inactive,
    Active,
    /// Active and served when a client asks for no specific version
    ActiveDefault,
    Deleted,
}

impl VdbStatus {
    pub fn is_active(self) -> bool {
        matches!(self, VdbStatus::Active | VdbStatus::ActiveDefault)
    }
}

/// A named, versioned logical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdbDefn {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub status: VdbStatus,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    /// Bindings referenced by the VDB's models, keyed by binding name
    #[serde(default)]
    pub connector_bindings: BTreeMap<String, ConnectorBinding>,
    /// Name of the materialization model, if the VDB has one
    #[serde(default)]
    pub materialization_model: Option<String>,
    #[serde(default)]
    pub has_wsdl: bool,
}

impl VdbDefn {
    pub fn new(name: impl Into<String>, version: impl Into<String>, created: DateTime<Utc>) -> Self {
        VdbDefn {
            name: name.into(),
            version: version.into(),
            status: VdbStatus::Active,
            created,
            created_by: String::new(),
            description: String::new(),
            models: Vec::new(),
            connector_bindings: BTreeMap::new(),
            materialization_model: None,
            has_wsdl: false,
        }
    }

    pub fn with_model(mut self, model: ModelInfo) -> Self {
        self.models.push(model);
        self
    }

    /// Register a binding under the name models refer to it by.
    pub fn with_binding(mut self, name: impl Into<String>, binding: ConnectorBinding) -> Self {
        self.connector_bindings.insert(name.into(), binding);
        self
    }

    pub fn connector_binding_by_name(&self, name: &str) -> Option<&ConnectorBinding> {
        self.connector_bindings.get(name)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// A deployable VDB archive; admin views only care about its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdbArchive {
    #[serde(default)]
    pub file_name: String,
    pub definition: VdbDefn,
}

/// A schema unit inside a VDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub physical: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub materialization: bool,
    #[serde(default)]
    pub multi_source_bindings: bool,
    /// Names of the bindings backing a physical model
    #[serde(default)]
    pub connector_binding_names: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl ModelInfo {
    /// Physical model backed by the named bindings.
    pub fn physical<I, S>(name: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ModelInfo {
            name: name.into(),
            model_type: "Physical".to_string(),
            uri: String::new(),
            physical: true,
            visible: true,
            materialization: false,
            multi_source_bindings: false,
            connector_binding_names: bindings.into_iter().map(Into::into).collect(),
        }
    }

    /// Virtual model derived from other models.
    pub fn virtual_model(name: impl Into<String>) -> Self {
        ModelInfo {
            name: name.into(),
            model_type: "Virtual".to_string(),
            uri: String::new(),
            physical: false,
            visible: true,
            materialization: false,
            multi_source_bindings: false,
            connector_binding_names: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(VdbStatus::Active.is_active());
        assert!(VdbStatus::ActiveDefault.is_active());
        assert!(!VdbStatus::Inactive.is_active());
        assert!(!VdbStatus::Incomplete.is_active());
        assert!(!VdbStatus::Deleted.is_active());
    }

    #[test]
    fn test_binding_lookup_by_name() {
        let now = Utc::now();
        let vdb = VdbDefn::new("Parts", "1", now)
            .with_binding("pg", ConnectorBinding::new("pg_prod", "Postgres", now));
        assert_eq!(
            vdb.connector_binding_by_name("pg").map(|b| b.deployed_name.as_str()),
            Some("pg_prod")
        );
        assert!(vdb.connector_binding_by_name("oracle").is_none());
    }
}
