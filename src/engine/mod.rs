//! Internal Engine Objects
//!
//! The mutable-in-the-engine types that the runtime services hand out. This
//! layer only ever reads them; the [`crate::translator`] turns them into
//! admin views.
//!
//! All types derive serde so an engine snapshot can be exported and
//! inspected offline.

pub mod binding;
pub mod component;
pub mod runtime;
pub mod vdb;

pub use binding::{BindingLiveness, ConnectorBinding, ConnectorBindingType};
pub use component::{ComponentType, Multiplicity, PropertyDefinition, PropertyType};
pub use runtime::{
    ClientConnection, ExtensionModule, LogConfiguration, LogonResult, MessageLevel, RequestId,
    RequestInfo, WorkerPoolStats,
};
pub use vdb::{ModelInfo, VdbArchive, VdbDefn, VdbStatus};

use std::collections::BTreeMap;

/// Flat property map, ordered by key.
pub type Properties = BTreeMap<String, String>;
