//! Admin Error Types
//!
//! Two kinds of single failure exist: *component* failures (an underlying
//! service or infrastructure call went wrong) and *processing* failures (the
//! caller asked for something this layer cannot do). Independent
//! sub-operations of one administrative call collect their failures into a
//! [`CompositeError`] instead of failing fast on the first one.
//!
//! ```
//! use vdb_admin::error::{accumulate, ErrorKind};
//!
//! let composite = accumulate(None, "binding a unreachable", ErrorKind::Component);
//! let composite = accumulate(Some(composite), "bad selector", ErrorKind::Processing);
//! assert_eq!(composite.len(), 2);
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Boxed cause carried by component and processing errors.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

/// Classification of a single admin failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Runtime or infrastructure failure in a service call
    Component,
    /// Caller or programmatic misuse
    Processing,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Component => write!(f, "component"),
            ErrorKind::Processing => write!(f, "processing"),
        }
    }
}

/// Failures reported by the external engine services this layer reads from.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Service could not be reached or refused the call
    #[error("{service} service unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },

    /// No connector binding is deployed under the name
    #[error("Connector binding not found: {0}")]
    BindingNotFound(String),

    /// Underlying cryptographic failure
    #[error("Encryption failed: {0}")]
    Crypto(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// A single administrative failure, or the composite of several.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Underlying service call failed
    #[error("Component error: {source}")]
    Component {
        #[source]
        source: BoxError,
    },

    /// Caller error with an arbitrary cause
    #[error("Processing error: {source}")]
    Processing {
        #[source]
        source: BoxError,
    },

    /// Admin object kind selector that cannot be dispatched
    #[error("Unsupported admin object kind: {kind}")]
    UnsupportedKind { kind: String },

    /// Source variant with no registered conversion
    #[error("Unsupported object conversion: {variant}")]
    UnsupportedConversion { variant: &'static str },

    /// Model translated without its owning VDB
    #[error("Model '{model}' can only be converted with its owning VDB as parent")]
    MissingParent { model: String },

    /// Named admin object does not exist
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Several independent failures from one call
    #[error(transparent)]
    Composite(#[from] CompositeError),
}

impl AdminError {
    /// Wrap a cause as a component error.
    pub fn component(cause: impl Into<BoxError>) -> Self {
        AdminError::Component {
            source: cause.into(),
        }
    }

    /// Wrap a cause as a processing error.
    pub fn processing(cause: impl Into<BoxError>) -> Self {
        AdminError::Processing {
            source: cause.into(),
        }
    }

    /// Wrap a cause as an error of the given kind.
    pub fn with_kind(kind: ErrorKind, cause: impl Into<BoxError>) -> Self {
        match kind {
            ErrorKind::Component => Self::component(cause),
            ErrorKind::Processing => Self::processing(cause),
        }
    }

    /// Kind of a single error; `None` for a composite.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AdminError::Component { .. } => Some(ErrorKind::Component),
            AdminError::Processing { .. }
            | AdminError::UnsupportedKind { .. }
            | AdminError::UnsupportedConversion { .. }
            | AdminError::MissingParent { .. }
            | AdminError::NotFound { .. } => Some(ErrorKind::Processing),
            AdminError::Composite(_) => None,
        }
    }
}

impl From<ServiceError> for AdminError {
    fn from(e: ServiceError) -> Self {
        AdminError::component(e)
    }
}

/// Ordered collection of failures raised by independent sub-operations.
///
/// Never empty once built through [`accumulate`] or [`ErrorAccumulator`].
#[derive(Debug, Default)]
pub struct CompositeError {
    children: Vec<AdminError>,
}

impl CompositeError {
    /// Start a composite from its first failure.
    pub fn new(first: AdminError) -> Self {
        CompositeError {
            children: vec![first],
        }
    }

    /// Append another failure.
    pub fn push(&mut self, child: AdminError) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[AdminError] {
        &self.children
    }

    pub fn into_children(self) -> Vec<AdminError> {
        self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of children of the given kind.
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.children
            .iter()
            .filter(|c| c.kind() == Some(kind))
            .count()
    }
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} administrative operation(s) failed", self.children.len())?;
        for (i, child) in self.children.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{child}")?;
        }
        Ok(())
    }
}

impl StdError for CompositeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.children.first().map(|c| c as &(dyn StdError + 'static))
    }
}

/// Fold a failure into an existing composite, or start a new one.
///
/// The existing composite is extended in place, never re-wrapped, so every
/// failure stays a direct child.
pub fn accumulate(
    existing: Option<CompositeError>,
    cause: impl Into<BoxError>,
    kind: ErrorKind,
) -> CompositeError {
    let child = AdminError::with_kind(kind, cause);
    match existing {
        None => CompositeError::new(child),
        Some(mut composite) => {
            composite.push(child);
            composite
        }
    }
}

/// Collects failures across the sub-operations of one call.
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    composite: Option<CompositeError>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw cause under the given kind.
    pub fn record(&mut self, cause: impl Into<BoxError>, kind: ErrorKind) {
        self.composite = Some(accumulate(self.composite.take(), cause, kind));
    }

    /// Record an already classified error as-is.
    pub fn record_error(&mut self, error: AdminError) {
        match self.composite.as_mut() {
            Some(composite) => composite.push(error),
            None => self.composite = Some(CompositeError::new(error)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.composite.is_none()
    }

    pub fn len(&self) -> usize {
        self.composite.as_ref().map_or(0, CompositeError::len)
    }

    pub fn into_composite(self) -> Option<CompositeError> {
        self.composite
    }

    /// `Ok` when nothing failed, otherwise the composite.
    pub fn finish(self) -> Result<(), CompositeError> {
        match self.composite {
            None => Ok(()),
            Some(composite) => Err(composite),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_without_existing_creates_single_child() {
        let composite = accumulate(None, "data service down", ErrorKind::Component);
        assert_eq!(composite.len(), 1);
        let child = &composite.children()[0];
        assert_eq!(child.kind(), Some(ErrorKind::Component));
        assert!(child.to_string().contains("data service down"));
    }

    #[test]
    fn test_accumulate_appends_to_existing() {
        let composite = accumulate(None, "a", ErrorKind::Component);
        let composite = accumulate(Some(composite), "b", ErrorKind::Processing);
        assert_eq!(composite.len(), 2);
        assert_eq!(composite.children()[0].kind(), Some(ErrorKind::Component));
        assert_eq!(composite.children()[1].kind(), Some(ErrorKind::Processing));
        assert_eq!(composite.count_of(ErrorKind::Component), 1);
        assert_eq!(composite.count_of(ErrorKind::Processing), 1);
    }

    #[test]
    fn test_composite_display_lists_children() {
        let composite = accumulate(None, "first", ErrorKind::Component);
        let composite = accumulate(Some(composite), "second", ErrorKind::Component);
        let text = composite.to_string();
        assert!(text.starts_with("2 administrative operation(s) failed"));
        assert!(text.contains("first"));
        assert!(text.contains("second"));
    }

    #[test]
    fn test_composite_source_is_first_child() {
        let composite = accumulate(None, "root cause", ErrorKind::Component);
        let source = composite.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Component error: root cause"));
    }

    #[test]
    fn test_service_error_converts_to_component() {
        let err: AdminError = ServiceError::Crypto("bad key".to_string()).into();
        assert_eq!(err.kind(), Some(ErrorKind::Component));
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn test_specific_errors_are_processing() {
        let kind = AdminError::UnsupportedKind {
            kind: "Cache".to_string(),
        };
        assert_eq!(kind.kind(), Some(ErrorKind::Processing));
        let conv = AdminError::UnsupportedConversion {
            variant: "ComponentType",
        };
        assert_eq!(conv.kind(), Some(ErrorKind::Processing));
    }

    #[test]
    fn test_accumulator_finish() {
        let acc = ErrorAccumulator::new();
        assert!(acc.is_empty());
        assert!(acc.finish().is_ok());

        let mut acc = ErrorAccumulator::new();
        acc.record("x", ErrorKind::Component);
        acc.record_error(AdminError::UnsupportedKind {
            kind: "Foo".to_string(),
        });
        assert_eq!(acc.len(), 2);
        let err = acc.finish().unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_composite_wraps_transparently() {
        let composite = accumulate(None, "boom", ErrorKind::Component);
        let err = AdminError::from(composite);
        assert!(err.kind().is_none());
        assert!(err.to_string().contains("boom"));
    }
}
