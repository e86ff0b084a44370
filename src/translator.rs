//! Engine Object Translation
//!
//! Converts internal engine objects into admin views.
//!
//! ## Dispatch
//!
//! Inputs are wrapped in [`SourceObject`], one variant per internal type the
//! engine services hand out. The dispatch match is exhaustive: adding a
//! variant forces a decision here, and variants with no admin view fail with
//! [`AdminError::UnsupportedConversion`].
//!
//! | Source | View | Parent |
//! |--------|------|--------|
//! | ConnectorBinding | ConnectorBinding | - |
//! | ConnectorBindingType | ConnectorType | - |
//! | VdbDefn / VdbArchive | Vdb | - |
//! | ModelInfo | Model | owning VdbDefn (required) |
//! | LogConfiguration | LogConfiguration | - |
//! | RequestInfo | Request | - |
//! | WorkerPoolStats | QueueWorkerPool | - |
//! | ClientConnection | Session | - |
//! | ExtensionModule | ExtensionModule | - |
//!
//! ## Binding state
//!
//! A binding's live state is a side read against the [`DataService`]. That
//! read never fails a conversion: any lookup error degrades to
//! [`BindingState::DataSourceUnavailable`] through [`Resolved`].

use tracing::{debug, warn};

use crate::admin::{
    self, AdminObjectBase, AdminView, BindingState, ConnectorBindingRef, UNTRACKED_ID,
};
use crate::engine::{
    self, runtime::VDB_VERSION, runtime::VIRTUAL_DB, BindingLiveness, ClientConnection,
    ComponentType, ConnectorBindingType, ModelInfo, RequestInfo, VdbArchive, VdbDefn,
    WorkerPoolStats,
};
use crate::error::{AdminError, AdminResult, ServiceError};
use crate::services::DataService;

/// Borrowed internal object awaiting translation.
#[derive(Debug, Clone, Copy)]
pub enum SourceObject<'a> {
    ConnectorBinding(&'a engine::ConnectorBinding),
    ConnectorBindingType(&'a ConnectorBindingType),
    VdbDefn(&'a VdbDefn),
    VdbArchive(&'a VdbArchive),
    ModelInfo(&'a ModelInfo),
    LogConfiguration(&'a engine::LogConfiguration),
    RequestInfo(&'a RequestInfo),
    WorkerPoolStats(&'a WorkerPoolStats),
    ClientConnection(&'a ClientConnection),
    ExtensionModule(&'a engine::ExtensionModule),
    ComponentType(&'a ComponentType),
    PropertyDefinition(&'a engine::PropertyDefinition),
}

impl SourceObject<'_> {
    pub fn variant_name(&self) -> &'static str {
        match self {
            SourceObject::ConnectorBinding(_) => "ConnectorBinding",
            SourceObject::ConnectorBindingType(_) => "ConnectorBindingType",
            SourceObject::VdbDefn(_) => "VdbDefn",
            SourceObject::VdbArchive(_) => "VdbArchive",
            SourceObject::ModelInfo(_) => "ModelInfo",
            SourceObject::LogConfiguration(_) => "LogConfiguration",
            SourceObject::RequestInfo(_) => "RequestInfo",
            SourceObject::WorkerPoolStats(_) => "WorkerPoolStats",
            SourceObject::ClientConnection(_) => "ClientConnection",
            SourceObject::ExtensionModule(_) => "ExtensionModule",
            SourceObject::ComponentType(_) => "ComponentType",
            SourceObject::PropertyDefinition(_) => "PropertyDefinition",
        }
    }
}

macro_rules! source_from {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for SourceObject<'a> {
                fn from(src: &'a $ty) -> Self {
                    SourceObject::$variant(src)
                }
            }
        )+
    };
}

source_from!(
    ConnectorBinding => engine::ConnectorBinding,
    ConnectorBindingType => ConnectorBindingType,
    VdbDefn => VdbDefn,
    VdbArchive => VdbArchive,
    ModelInfo => ModelInfo,
    LogConfiguration => engine::LogConfiguration,
    RequestInfo => RequestInfo,
    WorkerPoolStats => WorkerPoolStats,
    ClientConnection => ClientConnection,
    ExtensionModule => engine::ExtensionModule,
    ComponentType => ComponentType,
    PropertyDefinition => engine::PropertyDefinition,
);

/// Outcome of a best-effort lookup: the live value, or a default standing in
/// for it together with the failure that forced the default.
#[derive(Debug)]
pub enum Resolved<T> {
    Live(T),
    Defaulted { value: T, cause: ServiceError },
}

impl<T> Resolved<T> {
    pub fn value(&self) -> &T {
        match self {
            Resolved::Live(value) | Resolved::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolved::Live(value) | Resolved::Defaulted { value, .. } => value,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Resolved::Defaulted { .. })
    }
}

/// Translates engine objects into admin views.
pub struct Translator<'a> {
    data: &'a dyn DataService,
}

impl<'a> Translator<'a> {
    /// Translator reading binding state from `data`.
    pub fn new(data: &'a dyn DataService) -> Self {
        Translator { data }
    }

    /// Translate one object. `parent` is the owning VDB, needed by models.
    pub fn translate<'s>(
        &self,
        src: impl Into<SourceObject<'s>>,
        parent: Option<&VdbDefn>,
    ) -> AdminResult<AdminView> {
        match src.into() {
            SourceObject::ConnectorBinding(b) => {
                Ok(AdminView::ConnectorBinding(self.connector_binding(b)))
            }
            SourceObject::ConnectorBindingType(t) => {
                Ok(AdminView::ConnectorType(connector_type(t)))
            }
            SourceObject::VdbDefn(v) => Ok(AdminView::Vdb(vdb(v))),
            SourceObject::VdbArchive(a) => Ok(AdminView::Vdb(vdb(&a.definition))),
            SourceObject::ModelInfo(m) => {
                let owner = parent.ok_or_else(|| AdminError::MissingParent {
                    model: m.name.clone(),
                })?;
                Ok(AdminView::Model(model(m, owner)))
            }
            SourceObject::LogConfiguration(l) => Ok(AdminView::LogConfiguration(
                admin::LogConfiguration::new(l.discarded_contexts.clone(), l.message_level),
            )),
            SourceObject::RequestInfo(r) => Ok(AdminView::Request(request(r))),
            SourceObject::WorkerPoolStats(s) => Ok(AdminView::QueueWorkerPool(worker_pool(s))),
            SourceObject::ClientConnection(c) => Ok(AdminView::Session(session(c))),
            SourceObject::ExtensionModule(e) => Ok(AdminView::ExtensionModule(extension_module(e))),
            unsupported @ (SourceObject::ComponentType(_) | SourceObject::PropertyDefinition(_)) => {
                Err(AdminError::UnsupportedConversion {
                    variant: unsupported.variant_name(),
                })
            }
        }
    }

    /// `None` in, `None` out.
    pub fn translate_opt<'s>(
        &self,
        src: Option<impl Into<SourceObject<'s>>>,
        parent: Option<&VdbDefn>,
    ) -> AdminResult<Option<AdminView>> {
        src.map(|s| self.translate(s, parent)).transpose()
    }

    /// Translate every element of a list, collection or array, in order.
    /// The first failing element fails the whole call.
    pub fn translate_all<'s, I>(&self, items: I, parent: Option<&VdbDefn>) -> AdminResult<Vec<AdminView>>
    where
        I: IntoIterator,
        I::Item: Into<SourceObject<'s>>,
    {
        let views = items
            .into_iter()
            .map(|item| self.translate(item, parent))
            .collect::<AdminResult<Vec<_>>>()?;
        debug!(count = views.len(), "translated_admin_objects");
        Ok(views)
    }

    /// Binding view with its live state resolved.
    pub fn connector_binding(&self, src: &engine::ConnectorBinding) -> admin::ConnectorBinding {
        let mut base = AdminObjectBase::new(&[src.deployed_name.as_str()]);
        base.created = Some(src.created);
        base.created_by = Some(src.created_by.clone());
        base.deployed = src.enabled;
        base.enabled = src.enabled;
        base.last_updated = Some(src.last_changed);
        base.last_updated_by = Some(src.last_changed_by.clone());
        base.properties = Some(src.properties.clone());
        base.registered = true;

        admin::ConnectorBinding {
            base,
            connector_type_name: src.component_type_name.clone(),
            description: src.description.clone(),
            routing_uuid: src.routing_uuid.clone(),
            service_id: UNTRACKED_ID,
            state: self.binding_state(&src.deployed_name).into_value(),
            state_changed_time: src.last_changed,
        }
    }

    /// Live state of a binding; only a confirmed open binding reads `Open`.
    pub fn binding_state(&self, name: &str) -> Resolved<BindingState> {
        match self.data.connector_binding_state(name) {
            Ok(BindingLiveness::Open) => Resolved::Live(BindingState::Open),
            Ok(BindingLiveness::Closed | BindingLiveness::Unknown) => {
                Resolved::Live(BindingState::DataSourceUnavailable)
            }
            Err(cause) => {
                warn!(binding = name, error = %cause, "binding_state_lookup_failed");
                Resolved::Defaulted {
                    value: BindingState::DataSourceUnavailable,
                    cause,
                }
            }
        }
    }
}

/// View-to-engine direction; only logging configuration converts back.
pub fn to_native(view: &AdminView) -> AdminResult<engine::LogConfiguration> {
    match view {
        AdminView::LogConfiguration(l) => Ok(engine::LogConfiguration {
            discarded_contexts: l.discarded_contexts.clone(),
            message_level: l.log_level,
        }),
        other => Err(AdminError::UnsupportedConversion {
            variant: other.kind().as_str(),
        }),
    }
}

fn connector_type(src: &ConnectorBindingType) -> admin::ConnectorType {
    let mut base = AdminObjectBase::new(&[src.name()]);
    base.created = Some(src.created);
    base.created_by = Some(src.created_by.clone());
    base.deployed = src.deployable;
    base.enabled = true;
    base.last_updated = Some(src.last_changed);
    base.registered = true;
    admin::ConnectorType { base }
}

fn vdb(src: &VdbDefn) -> admin::Vdb {
    let mut base = AdminObjectBase::named(
        &[src.name.as_str(), src.version.as_str()],
        src.name.as_str(),
    );
    base.created = Some(src.created);
    base.created_by = Some(src.created_by.clone());
    base.deployed = src.is_active();
    base.enabled = src.is_active();
    base.last_updated = Some(src.created);
    base.last_updated_by = Some(src.created_by.clone());
    base.registered = true;

    admin::Vdb {
        base,
        version: src.version.clone(),
        status: src.status,
        models: src.models.iter().map(|m| model(m, src)).collect(),
        materialized_views: src.materialization_model.is_some(),
        has_wsdl: src.has_wsdl,
        uid: UNTRACKED_ID,
        versioned_by: src.created_by.clone(),
        versioned_date: src.created,
    }
}

fn model(src: &ModelInfo, owner: &VdbDefn) -> admin::Model {
    let mut base = AdminObjectBase::new(&[src.name.as_str()]);
    base.created = Some(owner.created);
    base.created_by = Some(owner.created_by.clone());
    base.deployed = owner.is_active();
    base.enabled = owner.is_active();
    base.last_updated = Some(owner.created);
    base.last_updated_by = Some(owner.created_by.clone());
    base.registered = true;

    let connector_bindings = if src.physical {
        src.connector_binding_names
            .iter()
            .map(|name| ConnectorBindingRef {
                name: name.clone(),
                deployed_name: owner
                    .connector_binding_by_name(name)
                    .map(|b| b.deployed_name.clone()),
            })
            .collect()
    } else {
        Vec::new()
    };

    admin::Model {
        base,
        model_type: src.model_type.clone(),
        model_uri: src.uri.clone(),
        physical: src.physical,
        visible: src.visible,
        materialization: src.materialization,
        supports_multi_source_bindings: src.multi_source_bindings,
        connector_bindings,
    }
}

fn request(src: &RequestInfo) -> admin::Request {
    let connection_id = src.request_id.connection_id.as_str();
    let request_execution = src.request_id.execution_id.to_string();

    let (base, node_id) = if src.is_source_request() {
        let node_id = src.node_id.to_string();
        let base = AdminObjectBase::new(&[
            connection_id,
            request_execution.as_str(),
            node_id.as_str(),
            src.execution_id.to_string().as_str(),
        ]);
        (base, Some(node_id))
    } else {
        (
            AdminObjectBase::new(&[connection_id, request_execution.as_str()]),
            None,
        )
    };

    let mut base = base;
    base.created = Some(src.processing_timestamp);

    admin::Request {
        base,
        sql_command: src.command.clone(),
        source: src.is_source_request(),
        node_id,
    }
}

fn worker_pool(src: &WorkerPoolStats) -> admin::QueueWorkerPool {
    admin::QueueWorkerPool {
        base: AdminObjectBase::new(&[src.queue_name.as_str()]),
        queued: src.queued,
        highest_queued: src.highest_queued,
        total_enqueued: src.total_submitted,
        total_dequeued: src.total_completed,
        threads: src.active_threads,
        highest_threads: src.highest_active_threads,
        max_threads: src.max_threads,
    }
}

fn session(src: &ClientConnection) -> admin::Session {
    admin::Session {
        base: AdminObjectBase::new(&[src.session_id()]),
        vdb_name: src.logon.product_info(VIRTUAL_DB).map(str::to_string),
        vdb_version: src.logon.product_info(VDB_VERSION).map(str::to_string),
    }
}

fn extension_module(src: &engine::ExtensionModule) -> admin::ExtensionModule {
    admin::ExtensionModule {
        base: AdminObjectBase::new(&[src.full_name.as_str()]),
        description: src.description.clone(),
        module_type: src.module_type.clone(),
        file_contents: src.file_contents.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{AdminObject, AdminObjectKind};
    use crate::engine::{MessageLevel, RequestId};
    use chrono::{TimeZone, Utc};

    struct FixedState(Result<BindingLiveness, String>);

    impl DataService for FixedState {
        fn connector_bindings(&self) -> Result<Vec<engine::ConnectorBinding>, ServiceError> {
            Ok(Vec::new())
        }

        fn connector_binding_state(&self, _name: &str) -> Result<BindingLiveness, ServiceError> {
            self.0.clone().map_err(ServiceError::Other)
        }
    }

    fn request_info(binding_uuid: Option<&str>) -> RequestInfo {
        RequestInfo {
            request_id: RequestId {
                connection_id: "conn7".to_string(),
                execution_id: 12,
            },
            node_id: 3,
            execution_id: 1,
            command: "SELECT * FROM parts".to_string(),
            processing_timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            connector_binding_uuid: binding_uuid.map(str::to_string),
        }
    }

    #[test]
    fn test_binding_state_mapping() {
        let open = FixedState(Ok(BindingLiveness::Open));
        assert_eq!(
            *Translator::new(&open).binding_state("b").value(),
            BindingState::Open
        );

        let closed = FixedState(Ok(BindingLiveness::Closed));
        let state = Translator::new(&closed).binding_state("b");
        assert!(!state.is_defaulted());
        assert_eq!(*state.value(), BindingState::DataSourceUnavailable);

        let unknown = FixedState(Ok(BindingLiveness::Unknown));
        assert_eq!(
            Translator::new(&unknown).binding_state("b").into_value(),
            BindingState::DataSourceUnavailable
        );
    }

    #[test]
    fn test_binding_state_failure_defaults() {
        let broken = FixedState(Err("socket closed".to_string()));
        let state = Translator::new(&broken).binding_state("b");
        assert!(state.is_defaulted());
        assert_eq!(*state.value(), BindingState::DataSourceUnavailable);
    }

    #[test]
    fn test_user_request_identifier() {
        let data = FixedState(Ok(BindingLiveness::Open));
        let view = Translator::new(&data)
            .translate(&request_info(None), None)
            .unwrap();
        let AdminView::Request(req) = view else {
            panic!("expected request view");
        };
        assert_eq!(req.identifier(), "conn7|12");
        assert!(!req.source);
        assert_eq!(req.node_id, None);
        assert_eq!(req.sql_command, "SELECT * FROM parts");
        assert_eq!(req.base.created, Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()));
    }

    #[test]
    fn test_source_request_identifier() {
        let data = FixedState(Ok(BindingLiveness::Open));
        let view = Translator::new(&data)
            .translate(&request_info(Some("uuid-1")), None)
            .unwrap();
        let AdminView::Request(req) = view else {
            panic!("expected request view");
        };
        assert_eq!(req.identifier(), "conn7|12|3|1");
        assert!(req.source);
        assert_eq!(req.node_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_worker_pool_counters() {
        let stats = WorkerPoolStats {
            queue_name: "QueryProcessorQueue".to_string(),
            active_threads: 4,
            highest_active_threads: 9,
            max_threads: 16,
            queued: 2,
            highest_queued: 30,
            total_submitted: 500,
            total_completed: 498,
        };
        let data = FixedState(Ok(BindingLiveness::Open));
        let AdminView::QueueWorkerPool(pool) = Translator::new(&data).translate(&stats, None).unwrap()
        else {
            panic!("expected pool view");
        };
        assert_eq!(pool.identifier(), "QueryProcessorQueue");
        assert_eq!(pool.threads, 4);
        assert_eq!(pool.highest_threads, 9);
        assert_eq!(pool.total_enqueued, 500);
        assert_eq!(pool.total_dequeued, 498);
    }

    #[test]
    fn test_log_configuration_both_directions() {
        let native = engine::LogConfiguration::new(["CONNECTOR"], MessageLevel::Detail);
        let data = FixedState(Ok(BindingLiveness::Open));
        let view = Translator::new(&data).translate(&native, None).unwrap();
        assert_eq!(view.kind(), AdminObjectKind::LogConfiguration);
        assert_eq!(to_native(&view).unwrap(), native);
    }

    #[test]
    fn test_to_native_rejects_other_views() {
        let data = FixedState(Ok(BindingLiveness::Open));
        let view = Translator::new(&data)
            .translate(&request_info(None), None)
            .unwrap();
        assert!(matches!(
            to_native(&view),
            Err(AdminError::UnsupportedConversion { variant: "Request" })
        ));
    }
}
