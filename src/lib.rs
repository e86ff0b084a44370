//! # VDB Admin
//!
//! Read-only administrative access to a federated virtual-database engine.
//! Management tools ask for objects by kind and name pattern; the admin layer
//! reads the engine's services, converts what it finds into uniform admin
//! views and filters them.
//!
//! ## Pipeline
//! ```text
//! AdminFacade::get_admin_objects(pattern, kind)
//!     ↓
//! [Engine services]     → ConnectorBinding, ConnectorBindingType, ...
//!     ↓
//! [Translator]          → AdminView (identifier, name, timestamps, state)
//!     ↓
//! [Matcher]             → views whose name or identifier matches
//!     ↓
//! Results | AdminError
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vdb_admin::{AdminFacade, InMemoryEngine, NoCrypto};
//!
//! let engine = Arc::new(InMemoryEngine::from_json(&snapshot_json)?);
//! let admin = AdminFacade::from_in_memory(engine, Arc::new(NoCrypto));
//!
//! for view in admin.get_admin_objects("oracle*", "ConnectorBinding")? {
//!     println!("{}", view.base().identifier);
//! }
//! ```

pub mod admin;
pub mod config;
pub mod engine;
pub mod error;
pub mod facade;
pub mod logging;
pub mod matcher;
pub mod properties;
pub mod services;
pub mod translator;

pub use admin::{AdminObject, AdminObjectBase, AdminObjectKind, AdminView, BindingState};
pub use config::{Config, ConfigError};
pub use error::{
    accumulate, AdminError, AdminResult, CompositeError, ErrorAccumulator, ErrorKind,
    ServiceError,
};
pub use facade::{AdminFacade, AdminQueryOutcome, NoCrypto};
pub use matcher::{matched_collection, matches, Matcher, Pattern};
pub use properties::{is_masked_property, PropertyDefinitionBuilder};
pub use services::{
    ConfigurationService, CryptoService, DataService, EngineSnapshot, EngineStatus,
    InMemoryEngine,
};
pub use translator::{to_native, Resolved, SourceObject, Translator};
