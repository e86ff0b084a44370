//! Failure accumulation laws (proptest) and error classification.

use std::error::Error as _;

use proptest::prelude::*;

use vdb_admin::{accumulate, AdminError, CompositeError, ErrorAccumulator, ErrorKind, ServiceError};

fn kind_strategy() -> impl Strategy<Value = ErrorKind> {
    prop_oneof![Just(ErrorKind::Component), Just(ErrorKind::Processing)]
}

proptest! {
    #[test]
    fn prop_fold_keeps_every_failure_in_order(
        failures in proptest::collection::vec(("[a-z]{1,8}", kind_strategy()), 1..12)
    ) {
        let mut composite: Option<CompositeError> = None;
        for (message, kind) in &failures {
            composite = Some(accumulate(composite, message.clone(), *kind));
        }
        let composite = composite.unwrap();

        prop_assert_eq!(composite.len(), failures.len());
        for (child, (message, kind)) in composite.children().iter().zip(&failures) {
            prop_assert_eq!(child.kind(), Some(*kind));
            prop_assert!(child.to_string().contains(message.as_str()));
        }
        let components = failures.iter().filter(|(_, k)| *k == ErrorKind::Component).count();
        prop_assert_eq!(composite.count_of(ErrorKind::Component), components);
    }

    #[test]
    fn prop_accumulator_matches_fold(
        failures in proptest::collection::vec(("[a-z]{1,8}", kind_strategy()), 0..12)
    ) {
        let mut acc = ErrorAccumulator::new();
        for (message, kind) in &failures {
            acc.record(message.clone(), *kind);
        }
        prop_assert_eq!(acc.len(), failures.len());
        prop_assert_eq!(acc.is_empty(), failures.is_empty());
        prop_assert_eq!(acc.finish().is_ok(), failures.is_empty());
    }
}

#[test]
fn test_composite_display_lists_children() {
    let composite = accumulate(None, "types unavailable", ErrorKind::Component);
    let composite = accumulate(Some(composite), "bad pattern", ErrorKind::Processing);
    let text = composite.to_string();
    assert!(text.starts_with("2 administrative operation(s) failed: "));
    assert!(text.contains("types unavailable"));
    assert!(text.contains("; "));
    assert!(text.contains("bad pattern"));
}

#[test]
fn test_composite_source_is_first_child() {
    let composite = accumulate(None, "first", ErrorKind::Component);
    let composite = accumulate(Some(composite), "second", ErrorKind::Component);
    let source = composite.source().unwrap();
    assert!(source.to_string().contains("first"));
}

#[test]
fn test_composite_is_transparent_in_admin_error() {
    let composite = accumulate(None, "down", ErrorKind::Component);
    let err = AdminError::from(composite);
    assert_eq!(err.kind(), None);
    assert!(err.to_string().starts_with("1 administrative operation(s) failed"));
}

#[test]
fn test_accumulator_keeps_classified_errors() {
    let mut acc = ErrorAccumulator::new();
    acc.record_error(AdminError::UnsupportedKind {
        kind: "Widget".to_string(),
    });
    acc.record_error(ServiceError::BindingNotFound("ghost".to_string()).into());

    let composite = acc.into_composite().unwrap();
    assert!(matches!(
        composite.children()[0],
        AdminError::UnsupportedKind { .. }
    ));
    assert_eq!(composite.children()[1].kind(), Some(ErrorKind::Component));
    assert_eq!(composite.into_children().len(), 2);
}

#[test]
fn test_service_errors_become_component_errors() {
    let err: AdminError = ServiceError::Unavailable {
        service: "data",
        reason: "timeout".to_string(),
    }
    .into();
    assert_eq!(err.kind(), Some(ErrorKind::Component));
    assert!(err.to_string().contains("data service unavailable: timeout"));
    assert!(err.source().is_some());
}

#[test]
fn test_with_kind() {
    assert_eq!(
        AdminError::with_kind(ErrorKind::Processing, "x").kind(),
        Some(ErrorKind::Processing)
    );
    assert_eq!(
        AdminError::with_kind(ErrorKind::Component, "x").kind(),
        Some(ErrorKind::Component)
    );
}
