//! Concrete admin view types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{AdminObject, AdminObjectBase};
use crate::engine::{MessageLevel, VdbStatus};

macro_rules! admin_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl AdminObject for $ty {
                fn name(&self) -> &str {
                    &self.base.name
                }

                fn identifier(&self) -> &str {
                    &self.base.identifier
                }
            }
        )+
    };
}

admin_object!(
    ConnectorBinding,
    ConnectorType,
    Vdb,
    Model,
    Session,
    Request,
    QueueWorkerPool,
    LogConfiguration,
    ExtensionModule,
    PropertyDefinition,
    SystemObject,
);

/// Runtime state reported for a connector binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
    Open,
    DataSourceUnavailable,
}

/// A configured connector instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorBinding {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub connector_type_name: String,
    pub description: String,
    pub routing_uuid: String,
    /// Always [`super::UNTRACKED_ID`]
    pub service_id: u64,
    pub state: BindingState,
    pub state_changed_time: DateTime<Utc>,
}

/// A connector type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorType {
    #[serde(flatten)]
    pub base: AdminObjectBase,
}

/// A virtual database version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vdb {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub version: String,
    pub status: VdbStatus,
    pub models: Vec<Model>,
    pub materialized_views: bool,
    pub has_wsdl: bool,
    /// Always [`super::UNTRACKED_ID`]
    pub uid: u64,
    pub versioned_by: String,
    pub versioned_date: DateTime<Utc>,
}

/// Reference from a model to a binding its VDB declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorBindingRef {
    /// Name the model refers to the binding by
    pub name: String,
    /// Deployed name of the binding, `None` if the VDB does not declare it
    pub deployed_name: Option<String>,
}

/// A model inside a VDB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub model_type: String,
    pub model_uri: String,
    pub physical: bool,
    pub visible: bool,
    pub materialization: bool,
    pub supports_multi_source_bindings: bool,
    #[serde(default)]
    pub connector_bindings: Vec<ConnectorBindingRef>,
}

/// A live client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub vdb_name: Option<String>,
    pub vdb_version: Option<String>,
}

/// A user request or one of its source queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub sql_command: String,
    /// Set for queries issued against a connector binding
    pub source: bool,
    pub node_id: Option<String>,
}

/// Counters of a worker pool queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueWorkerPool {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub queued: u32,
    pub highest_queued: u32,
    pub total_enqueued: u64,
    pub total_dequeued: u64,
    pub threads: u32,
    pub highest_threads: u32,
    pub max_threads: u32,
}

/// Logging verbosity and context filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfiguration {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub discarded_contexts: BTreeSet<String>,
    pub log_level: MessageLevel,
}

impl LogConfiguration {
    pub const IDENTIFIER: &'static str = "LogConfiguration";

    pub fn new(discarded_contexts: BTreeSet<String>, log_level: MessageLevel) -> Self {
        LogConfiguration {
            base: AdminObjectBase::new(&[Self::IDENTIFIER]),
            discarded_contexts,
            log_level,
        }
    }
}

/// A deployed binary module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionModule {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub description: String,
    pub module_type: String,
    pub file_contents: Vec<u8>,
}

/// Metadata and current value of one configurable property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub display_name: String,
    pub description: String,
    pub allowed_values: Vec<String>,
    pub constrained_to_allowed_values: bool,
    pub default_value: Option<String>,
    pub required: bool,
    pub modifiable: bool,
    pub hidden: bool,
    pub expert: bool,
    pub preferred: bool,
    pub masked: bool,
    pub minimum_multiplicity: u32,
    /// `None` means unbounded
    pub maximum_multiplicity: Option<u32>,
    pub requires_restart: bool,
    pub value_delimiter: Option<String>,
    pub property_type: Option<String>,
    pub property_type_representation: Option<String>,
    pub value: Option<String>,
}

impl PropertyDefinition {
    /// Unconstrained definition carrying only a name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        PropertyDefinition {
            base: AdminObjectBase::new(&[name.as_str()]),
            display_name: name,
            description: String::new(),
            allowed_values: Vec::new(),
            constrained_to_allowed_values: false,
            default_value: None,
            required: false,
            modifiable: false,
            hidden: false,
            expert: false,
            preferred: false,
            masked: false,
            minimum_multiplicity: 0,
            maximum_multiplicity: None,
            requires_restart: false,
            value_delimiter: None,
            property_type: None,
            property_type_representation: None,
            value: None,
        }
    }
}

/// Engine-wide status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemObject {
    #[serde(flatten)]
    pub base: AdminObjectBase,
    pub start_time: DateTime<Utc>,
    pub started: bool,
}

impl SystemObject {
    pub const IDENTIFIER: &'static str = "System";
}
