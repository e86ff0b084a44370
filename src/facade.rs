//! Admin Facade
//!
//! Entry point for management tooling. Every call is one stateless cycle:
//!
//! ```text
//! read engine service -> translate -> filter by pattern -> return | fail
//! ```
//!
//! Nothing is cached and nothing is retried. The facade holds a handle per
//! engine capability it reads from, injected at construction.

use std::sync::Arc;
use tracing::{debug, info};

use crate::admin::{self, AdminObjectBase, AdminObjectKind, AdminView};
use crate::engine::{ClientConnection, ConnectorBinding, ConnectorBindingType};
use crate::error::{AdminError, AdminResult, CompositeError, ErrorAccumulator, ServiceError};
use crate::matcher::Matcher;
use crate::properties::PropertyDefinitionBuilder;
use crate::services::{
    ConfigurationService, CryptoService, DataService, EngineStatus, InMemoryEngine,
};
use crate::translator::Translator;

/// Crypto capability for deployments that have none; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCrypto;

impl CryptoService for NoCrypto {
    fn encrypt_string(&self, _value: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Crypto(
            "no crypto service is configured".to_string(),
        ))
    }
}

/// Objects gathered by a multi-kind query plus whatever failed along the way.
#[derive(Debug, Default)]
pub struct AdminQueryOutcome {
    pub objects: Vec<AdminView>,
    pub failures: Option<CompositeError>,
}

impl AdminQueryOutcome {
    /// True when every sub-query succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_none()
    }

    /// Objects if nothing failed, otherwise the composite failure.
    pub fn into_result(self) -> AdminResult<Vec<AdminView>> {
        match self.failures {
            None => Ok(self.objects),
            Some(composite) => Err(AdminError::Composite(composite)),
        }
    }
}

/// Read-only administrative access to a running engine.
pub struct AdminFacade {
    configuration: Arc<dyn ConfigurationService>,
    data: Arc<dyn DataService>,
    crypto: Arc<dyn CryptoService>,
    engine: Arc<dyn EngineStatus>,
    matcher: Matcher,
}

impl AdminFacade {
    pub fn new(
        configuration: Arc<dyn ConfigurationService>,
        data: Arc<dyn DataService>,
        crypto: Arc<dyn CryptoService>,
        engine: Arc<dyn EngineStatus>,
    ) -> Self {
        AdminFacade {
            configuration,
            data,
            crypto,
            engine,
            matcher: Matcher::default(),
        }
    }

    /// Facade reading every service from one in-memory engine.
    pub fn from_in_memory(engine: Arc<InMemoryEngine>, crypto: Arc<dyn CryptoService>) -> Self {
        AdminFacade::new(engine.clone(), engine.clone(), crypto, engine)
    }

    /// Use a non-default pattern syntax.
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn translator(&self) -> Translator<'_> {
        Translator::new(self.data.as_ref())
    }

    /// Admin objects of `kind` whose name or identifier matches `pattern`.
    ///
    /// `kind` is one of `ConnectorBinding`, `ConnectorType` or
    /// `SystemObject`. Anything else fails with
    /// [`AdminError::UnsupportedKind`] naming the selector as given.
    pub fn get_admin_objects(&self, pattern: &str, kind: &str) -> AdminResult<Vec<AdminView>> {
        let selector = dispatchable(kind)?;
        debug!(kind = %selector, pattern, "admin_query");
        self.query_kind(pattern, selector)
    }

    /// Several kinds in one call. Every selector is checked before anything
    /// runs; an unsupported one fails the call outright. After that, failing
    /// sub-queries are collected while the others still contribute objects.
    pub fn get_admin_objects_batch(
        &self,
        pattern: &str,
        kinds: &[&str],
    ) -> AdminResult<AdminQueryOutcome> {
        let selectors = kinds
            .iter()
            .map(|k| dispatchable(k))
            .collect::<AdminResult<Vec<_>>>()?;

        let mut objects = Vec::new();
        let mut errors = ErrorAccumulator::new();
        for selector in selectors {
            match self.query_kind(pattern, selector) {
                Ok(mut found) => objects.append(&mut found),
                Err(e) => errors.record_error(e),
            }
        }

        if !errors.is_empty() {
            info!(failed = errors.len(), returned = objects.len(), "admin_batch_partial_failure");
        }
        Ok(AdminQueryOutcome {
            objects,
            failures: errors.into_composite(),
        })
    }

    fn query_kind(&self, pattern: &str, kind: AdminObjectKind) -> AdminResult<Vec<AdminView>> {
        match kind {
            AdminObjectKind::ConnectorBinding => self.connector_bindings(pattern),
            AdminObjectKind::ConnectorType => self.connector_types(pattern),
            AdminObjectKind::SystemObject => Ok(vec![AdminView::SystemObject(self.system())]),
            other => Err(AdminError::UnsupportedKind {
                kind: other.to_string(),
            }),
        }
    }

    /// Deployed bindings matching `pattern`.
    pub fn connector_bindings(&self, pattern: &str) -> AdminResult<Vec<AdminView>> {
        let bindings = self.data.connector_bindings()?;
        let views = self.translator().translate_all(&bindings, None)?;
        self.matcher.matched_collection(pattern, views)
    }

    /// Registered connector types matching `pattern`.
    pub fn connector_types(&self, pattern: &str) -> AdminResult<Vec<AdminView>> {
        let types = self.configuration.connector_types()?;
        let views = self.translator().translate_all(&types, None)?;
        self.matcher.matched_collection(pattern, views)
    }

    /// Sessions of connected clients matching `pattern`.
    pub fn sessions(&self, pattern: &str) -> AdminResult<Vec<AdminView>> {
        let connections = self.configuration.client_connections()?;
        let views = self.translator().translate_all(&connections, None)?;
        self.matcher.matched_collection(pattern, views)
    }

    /// Engine-wide status.
    pub fn system(&self) -> admin::SystemObject {
        let mut base = AdminObjectBase::new(&[admin::SystemObject::IDENTIFIER]);
        base.properties = Some(self.engine.properties());
        admin::SystemObject {
            base,
            start_time: self.engine.start_time(),
            started: self.engine.is_alive(),
        }
    }

    pub fn client_connections(&self) -> AdminResult<Vec<ClientConnection>> {
        Ok(self.configuration.client_connections()?)
    }

    /// Connection whose session id equals `session_id`.
    pub fn client_connection(&self, session_id: &str) -> AdminResult<Option<ClientConnection>> {
        Ok(self
            .configuration
            .client_connections()?
            .into_iter()
            .find(|c| c.session_id() == session_id))
    }

    pub fn encrypt_string(&self, value: &str) -> AdminResult<String> {
        Ok(self.crypto.encrypt_string(value)?)
    }

    /// Property definitions of a deployed binding, merged with its values.
    ///
    /// Falls back to minimal map-driven definitions when the binding's
    /// connector type is not registered.
    pub fn binding_property_definitions(
        &self,
        deployed_name: &str,
    ) -> AdminResult<Vec<admin::PropertyDefinition>> {
        let binding = self
            .data
            .connector_bindings()?
            .into_iter()
            .find(|b| b.deployed_name == deployed_name)
            .ok_or_else(|| AdminError::NotFound {
                kind: "Connector binding",
                name: deployed_name.to_string(),
            })?;

        match self.connector_type(&binding.component_type_name)? {
            Some(ctype) => Ok(PropertyDefinitionBuilder::from_component_type(
                &ctype.component_type,
                &binding.properties,
            )),
            None => Ok(PropertyDefinitionBuilder::from_properties(
                &binding.properties,
            )),
        }
    }

    /// Value as it should be stored for a property of the named connector
    /// type: encrypted when the type masks the property.
    pub fn protect_property_value(
        &self,
        connector_type: &str,
        property: &str,
        value: &str,
    ) -> AdminResult<String> {
        let ctype = self.connector_type(connector_type)?;
        PropertyDefinitionBuilder::protect_value(
            property,
            value,
            ctype.as_ref().map(|t| &t.component_type),
            self.crypto.as_ref(),
        )
    }

    fn connector_type(&self, name: &str) -> AdminResult<Option<ConnectorBindingType>> {
        Ok(self
            .configuration
            .connector_types()?
            .into_iter()
            .find(|t| t.name() == name))
    }

    /// Deployed names joined with `", "`.
    pub fn pretty_print_binding_names(bindings: &[ConnectorBinding]) -> String {
        bindings
            .iter()
            .map(|b| b.deployed_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse a selector the facade can dispatch.
fn dispatchable(kind: &str) -> AdminResult<AdminObjectKind> {
    match kind.parse::<AdminObjectKind>() {
        Ok(
            k @ (AdminObjectKind::ConnectorBinding
            | AdminObjectKind::ConnectorType
            | AdminObjectKind::SystemObject),
        ) => Ok(k),
        _ => Err(AdminError::UnsupportedKind {
            kind: kind.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_dispatchable_kinds() {
        assert_eq!(
            dispatchable("ConnectorBinding").unwrap(),
            AdminObjectKind::ConnectorBinding
        );
        assert_eq!(
            dispatchable("connectortype").unwrap(),
            AdminObjectKind::ConnectorType
        );
        assert_eq!(
            dispatchable("SystemObject").unwrap(),
            AdminObjectKind::SystemObject
        );
    }

    #[test]
    fn test_known_but_undispatchable_kind() {
        let err = dispatchable("VDB").unwrap_err();
        assert!(matches!(err, AdminError::UnsupportedKind { ref kind } if kind == "VDB"));
    }

    #[test]
    fn test_pretty_print_binding_names() {
        let now = Utc::now();
        let bindings = vec![
            ConnectorBinding::new("a", "T", now),
            ConnectorBinding::new("b", "T", now),
            ConnectorBinding::new("c", "T", now),
        ];
        assert_eq!(AdminFacade::pretty_print_binding_names(&bindings), "a, b, c");
        assert_eq!(AdminFacade::pretty_print_binding_names(&[]), "");
    }

    #[test]
    fn test_no_crypto_fails() {
        assert!(matches!(
            NoCrypto.encrypt_string("x"),
            Err(ServiceError::Crypto(_))
        ));
    }

    #[test]
    fn test_outcome_into_result() {
        let complete = AdminQueryOutcome::default();
        assert!(complete.is_complete());
        assert!(complete.into_result().unwrap().is_empty());

        let failed = AdminQueryOutcome {
            objects: Vec::new(),
            failures: Some(crate::error::accumulate(
                None,
                "down",
                crate::error::ErrorKind::Component,
            )),
        };
        assert!(!failed.is_complete());
        assert!(matches!(failed.into_result(), Err(AdminError::Composite(_))));
    }
}
