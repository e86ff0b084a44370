//! Admin Object Model
//!
//! Read-only views of engine state handed to management tooling. Every view
//! is built fresh per call and owns its data; nothing here refers back to the
//! engine object it was built from.
//!
//! ## Identifiers
//!
//! A view is identified by one or more parts joined with [`DELIMITER`]:
//!
//! | View | Identifier parts |
//! |------|------------------|
//! | ConnectorBinding | deployed name |
//! | ConnectorType | type name |
//! | Vdb | name, version |
//! | Model | model name |
//! | Session | session id |
//! | Request | connection id, execution id [, node id, source execution id] |
//! | QueueWorkerPool | queue name |
//! | ExtensionModule | full name |
//! | PropertyDefinition | property name |
//!
//! The view name is the last identifier part, except for a VDB whose name is
//! its first part.

mod objects;

pub use objects::{
    BindingState, ConnectorBinding, ConnectorBindingRef, ConnectorType, ExtensionModule,
    LogConfiguration, Model, PropertyDefinition, QueueWorkerPool, Request, Session, SystemObject,
    Vdb,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::Properties;
use crate::error::AdminError;

/// Separator between identifier parts.
pub const DELIMITER: char = '|';

/// Pattern marker matching any run of characters.
pub const WILDCARD: char = '*';

/// Placeholder for numeric ids the engine does not track.
pub const UNTRACKED_ID: u64 = 0;

/// Capability shared by every admin view.
pub trait AdminObject {
    /// Short display name
    fn name(&self) -> &str;

    /// Full identifier, unique within its kind
    fn identifier(&self) -> &str;
}

/// Fields common to every admin view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminObjectBase {
    pub identifier: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub deployed: bool,
    #[serde(default)]
    pub registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl AdminObjectBase {
    /// Base named after the last identifier part.
    pub fn new<S: AsRef<str>>(parts: &[S]) -> Self {
        let name = parts.last().map(|p| p.as_ref().to_string()).unwrap_or_default();
        Self::named(parts, name)
    }

    /// Base with an explicit name.
    pub fn named<S: AsRef<str>>(parts: &[S], name: impl Into<String>) -> Self {
        AdminObjectBase {
            identifier: build_identifier(parts),
            name: name.into(),
            created: None,
            created_by: None,
            last_updated: None,
            last_updated_by: None,
            enabled: false,
            deployed: false,
            registered: false,
            properties: None,
        }
    }

    /// Identifier split back into its parts.
    pub fn identifier_parts(&self) -> Vec<&str> {
        self.identifier.split(DELIMITER).collect()
    }
}

impl AdminObject for AdminObjectBase {
    fn name(&self) -> &str {
        &self.name
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// Join identifier parts with [`DELIMITER`].
pub fn build_identifier<S: AsRef<str>>(parts: &[S]) -> String {
    let mut identifier = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            identifier.push(DELIMITER);
        }
        identifier.push_str(part.as_ref());
    }
    identifier
}

/// Selector for the kind of admin object a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminObjectKind {
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
}

impl AdminObjectKind {
    pub const ALL: [AdminObjectKind; 11] = [
        AdminObjectKind::ConnectorBinding,
        AdminObjectKind::ConnectorType,
        AdminObjectKind::Vdb,
        AdminObjectKind::Model,
        AdminObjectKind::Session,
        AdminObjectKind::Request,
        AdminObjectKind::QueueWorkerPool,
        AdminObjectKind::LogConfiguration,
        AdminObjectKind::ExtensionModule,
        AdminObjectKind::PropertyDefinition,
        AdminObjectKind::SystemObject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdminObjectKind::ConnectorBinding => "ConnectorBinding",
            AdminObjectKind::ConnectorType => "ConnectorType",
            AdminObjectKind::Vdb => "VDB",
            AdminObjectKind::Model => "Model",
            AdminObjectKind::Session => "Session",
            AdminObjectKind::Request => "Request",
            AdminObjectKind::QueueWorkerPool => "QueueWorkerPool",
            AdminObjectKind::LogConfiguration => "LogConfiguration",
            AdminObjectKind::ExtensionModule => "ExtensionModule",
            AdminObjectKind::PropertyDefinition => "PropertyDefinition",
            AdminObjectKind::SystemObject => "SystemObject",
        }
    }
}

impl fmt::Display for AdminObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminObjectKind {
    type Err = AdminError;

    /// Accepts the kind name in any letter case; a `Vdb` spelling is also
    /// accepted for `VDB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminObjectKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AdminError::UnsupportedKind {
                kind: s.to_string(),
            })
    }
}

/// Any admin view, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AdminView {
    ConnectorBinding(ConnectorBinding),
    ConnectorType(ConnectorType),
    Vdb(Vdb),
    Model(Model),
    Session(Session),
    Request(Request),
    QueueWorkerPool(QueueWorkerPool),
    LogConfiguration(LogConfiguration),
    ExtensionModule(ExtensionModule),
    PropertyDefinition(PropertyDefinition),
    SystemObject(SystemObject),
}

impl AdminView {
    pub fn kind(&self) -> AdminObjectKind {
        match self {
            AdminView::ConnectorBinding(_) => AdminObjectKind::ConnectorBinding,
            AdminView::ConnectorType(_) => AdminObjectKind::ConnectorType,
            AdminView::Vdb(_) => AdminObjectKind::Vdb,
            AdminView::Model(_) => AdminObjectKind::Model,
            AdminView::Session(_) => AdminObjectKind::Session,
            AdminView::Request(_) => AdminObjectKind::Request,
            AdminView::QueueWorkerPool(_) => AdminObjectKind::QueueWorkerPool,
            AdminView::LogConfiguration(_) => AdminObjectKind::LogConfiguration,
            AdminView::ExtensionModule(_) => AdminObjectKind::ExtensionModule,
            AdminView::PropertyDefinition(_) => AdminObjectKind::PropertyDefinition,
            AdminView::SystemObject(_) => AdminObjectKind::SystemObject,
        }
    }

    pub fn base(&self) -> &AdminObjectBase {
        match self {
            AdminView::ConnectorBinding(v) => &v.base,
            AdminView::ConnectorType(v) => &v.base,
            AdminView::Vdb(v) => &v.base,
            AdminView::Model(v) => &v.base,
            AdminView::Session(v) => &v.base,
            AdminView::Request(v) => &v.base,
            AdminView::QueueWorkerPool(v) => &v.base,
            AdminView::LogConfiguration(v) => &v.base,
            AdminView::ExtensionModule(v) => &v.base,
            AdminView::PropertyDefinition(v) => &v.base,
            AdminView::SystemObject(v) => &v.base,
        }
    }
}

impl AdminObject for AdminView {
    fn name(&self) -> &str {
        &self.base().name
    }

    fn identifier(&self) -> &str {
        &self.base().identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_joins_parts() {
        let base = AdminObjectBase::new(&["conn7", "12", "3", "1"]);
        assert_eq!(base.identifier, "conn7|12|3|1");
        assert_eq!(base.name, "1");
        assert_eq!(base.identifier_parts(), vec!["conn7", "12", "3", "1"]);
    }

    #[test]
    fn test_single_part_identifier() {
        let base = AdminObjectBase::new(&["oracle_prod"]);
        assert_eq!(base.identifier(), "oracle_prod");
        assert_eq!(base.name(), "oracle_prod");
    }

    #[test]
    fn test_named_overrides_last_part() {
        let base = AdminObjectBase::named(&["Parts", "2"], "Parts");
        assert_eq!(base.identifier, "Parts|2");
        assert_eq!(base.name, "Parts");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "ConnectorBinding".parse::<AdminObjectKind>().unwrap(),
            AdminObjectKind::ConnectorBinding
        );
        assert_eq!("vdb".parse::<AdminObjectKind>().unwrap(), AdminObjectKind::Vdb);
        assert_eq!(
            "systemobject".parse::<AdminObjectKind>().unwrap(),
            AdminObjectKind::SystemObject
        );
    }

    #[test]
    fn test_unknown_kind_names_offender() {
        let err = "UnknownKind".parse::<AdminObjectKind>().unwrap_err();
        assert!(matches!(err, AdminError::UnsupportedKind { ref kind } if kind == "UnknownKind"));
    }

    #[test]
    fn test_kind_roundtrip_through_display() {
        for kind in AdminObjectKind::ALL {
            assert_eq!(kind.to_string().parse::<AdminObjectKind>().unwrap(), kind);
        }
    }
}
