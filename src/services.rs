//! Engine Service Contracts
//!
//! The admin layer reads engine state only through these traits. The facade
//! holds a handle to each capability it needs; nothing is looked up by name
//! at call time.
//!
//! [`InMemoryEngine`] implements every contract over an [`EngineSnapshot`]
//! and backs the CLI and the test suites.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::{
    BindingLiveness, ClientConnection, ConnectorBinding, ConnectorBindingType, Properties,
};
use crate::error::ServiceError;

/// Configuration service: registered types and connected clients.
pub trait ConfigurationService: Send + Sync {
    fn connector_types(&self) -> Result<Vec<ConnectorBindingType>, ServiceError>;

    fn client_connections(&self) -> Result<Vec<ClientConnection>, ServiceError>;
}

/// Data service: deployed bindings and their live state.
pub trait DataService: Send + Sync {
    fn connector_bindings(&self) -> Result<Vec<ConnectorBinding>, ServiceError>;

    fn connector_binding_state(&self, name: &str) -> Result<BindingLiveness, ServiceError>;
}

/// Encryption of values that must not be stored in clear text.
pub trait CryptoService: Send + Sync {
    fn encrypt_string(&self, value: &str) -> Result<String, ServiceError>;
}

/// Engine-wide status.
pub trait EngineStatus: Send + Sync {
    fn start_time(&self) -> DateTime<Utc>;

    fn is_alive(&self) -> bool;

    fn properties(&self) -> Properties;
}

/// Serializable picture of the engine state the admin layer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub start_time: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub alive: bool,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub connector_types: Vec<ConnectorBindingType>,
    #[serde(default)]
    pub connector_bindings: Vec<ConnectorBinding>,
    /// Live state by deployed name; bindings missing here are `Unknown`
    #[serde(default)]
    pub binding_states: BTreeMap<String, BindingLiveness>,
    #[serde(default)]
    pub client_connections: Vec<ClientConnection>,
}

fn default_true() -> bool {
    true
}

impl EngineSnapshot {
    /// Empty running engine started at `start_time`.
    pub fn new(start_time: DateTime<Utc>) -> Self {
        EngineSnapshot {
            start_time,
            alive: true,
            properties: Properties::new(),
            connector_types: Vec::new(),
            connector_bindings: Vec::new(),
            binding_states: BTreeMap::new(),
            client_connections: Vec::new(),
        }
    }
}

/// Engine state held in memory, mutable while readers query it.
///
/// Every read copies data out under a short read lock, so callers never hold
/// the lock while building views.
#[derive(Debug)]
pub struct InMemoryEngine {
    state: RwLock<EngineSnapshot>,
    unreachable: RwLock<BTreeSet<String>>,
}

impl InMemoryEngine {
    pub fn new(snapshot: EngineSnapshot) -> Self {
        InMemoryEngine {
            state: RwLock::new(snapshot),
            unreachable: RwLock::new(BTreeSet::new()),
        }
    }

    /// Load a snapshot exported as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.state.read().clone()
    }

    /// Deploy a binding; one without a routing uuid gets a fresh one.
    pub fn deploy_binding(&self, mut binding: ConnectorBinding) {
        if binding.routing_uuid.is_empty() {
            binding.routing_uuid = uuid::Uuid::new_v4().to_string();
        }
        let mut state = self.state.write();
        state
            .connector_bindings
            .retain(|b| b.deployed_name != binding.deployed_name);
        state.connector_bindings.push(binding);
    }

    pub fn register_connector_type(&self, connector_type: ConnectorBindingType) {
        self.state.write().connector_types.push(connector_type);
    }

    pub fn connect_client(&self, connection: ClientConnection) {
        self.state.write().client_connections.push(connection);
    }

    pub fn set_binding_state(&self, name: &str, liveness: BindingLiveness) {
        self.state
            .write()
            .binding_states
            .insert(name.to_string(), liveness);
    }

    /// Make state lookups for the binding fail until cleared.
    pub fn set_unreachable(&self, name: &str, unreachable: bool) {
        let mut set = self.unreachable.write();
        if unreachable {
            set.insert(name.to_string());
        } else {
            set.remove(name);
        }
    }

    pub fn set_alive(&self, alive: bool) {
        self.state.write().alive = alive;
    }
}

impl ConfigurationService for InMemoryEngine {
    fn connector_types(&self) -> Result<Vec<ConnectorBindingType>, ServiceError> {
        Ok(self.state.read().connector_types.clone())
    }

    fn client_connections(&self) -> Result<Vec<ClientConnection>, ServiceError> {
        Ok(self.state.read().client_connections.clone())
    }
}

impl DataService for InMemoryEngine {
    fn connector_bindings(&self) -> Result<Vec<ConnectorBinding>, ServiceError> {
        Ok(self.state.read().connector_bindings.clone())
    }

    fn connector_binding_state(&self, name: &str) -> Result<BindingLiveness, ServiceError> {
        if self.unreachable.read().contains(name) {
            return Err(ServiceError::Unavailable {
                service: "data",
                reason: format!("binding '{name}' did not answer"),
            });
        }
        let state = self.state.read();
        if !state.connector_bindings.iter().any(|b| b.deployed_name == name) {
            return Err(ServiceError::BindingNotFound(name.to_string()));
        }
        Ok(state.binding_states.get(name).copied().unwrap_or_default())
    }
}

impl EngineStatus for InMemoryEngine {
    fn start_time(&self) -> DateTime<Utc> {
        self.state.read().start_time
    }

    fn is_alive(&self) -> bool {
        self.state.read().alive
    }

    fn properties(&self) -> Properties {
        self.state.read().properties.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InMemoryEngine {
        InMemoryEngine::new(EngineSnapshot::new(Utc::now()))
    }

    #[test]
    fn test_deploy_assigns_routing_uuid() {
        let engine = engine();
        engine.deploy_binding(ConnectorBinding::new("pg", "Postgres", Utc::now()));
        let bindings = engine.connector_bindings().unwrap();
        assert_eq!(bindings.len(), 1);
        assert!(!bindings[0].routing_uuid.is_empty());
    }

    #[test]
    fn test_redeploy_replaces_binding() {
        let engine = engine();
        engine.deploy_binding(ConnectorBinding::new("pg", "Postgres", Utc::now()));
        engine.deploy_binding(ConnectorBinding::new("pg", "Postgres 16", Utc::now()));
        let bindings = engine.connector_bindings().unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].component_type_name, "Postgres 16");
    }

    #[test]
    fn test_binding_state_lookup() {
        let engine = engine();
        engine.deploy_binding(ConnectorBinding::new("pg", "Postgres", Utc::now()));
        assert_eq!(
            engine.connector_binding_state("pg").unwrap(),
            BindingLiveness::Unknown
        );
        engine.set_binding_state("pg", BindingLiveness::Open);
        assert_eq!(
            engine.connector_binding_state("pg").unwrap(),
            BindingLiveness::Open
        );
        engine.set_unreachable("pg", true);
        assert!(engine.connector_binding_state("pg").is_err());
        engine.set_unreachable("pg", false);
        assert!(engine.connector_binding_state("pg").is_ok());
    }

    #[test]
    fn test_state_of_unknown_binding_fails() {
        let engine = engine();
        assert!(matches!(
            engine.connector_binding_state("ghost"),
            Err(ServiceError::BindingNotFound(_))
        ));
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let engine = engine();
        engine.connect_client(ClientConnection::new("1", "Parts", "1"));
        let json = serde_json::to_string(&engine.snapshot()).unwrap();
        let loaded = InMemoryEngine::from_json(&json).unwrap();
        assert_eq!(loaded.client_connections().unwrap().len(), 1);
        assert!(loaded.is_alive());
    }
}
