use snaptab_core::errors::{ExError, ExErrorKind, SnapTabError};

#[test]
fn test_unknown_namespace_verifiable_by_kind() {
    let ex: ExError = SnapTabError::UnknownNamespace {
        namespace: "country".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::UnknownNamespace);
    assert_eq!(ex.code(), "ERR_UNKNOWN_NAMESPACE");
    assert_eq!(ex.namespace(), Some("country"));
}

#[test]
fn test_missing_assignment_distinct_from_unknown_namespace() {
    let ex: ExError = SnapTabError::MissingAssignment {
        namespace: "scopus_author".to_string(),
        value: "999".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::MissingAssignment);
    assert_ne!(ex.kind(), ExErrorKind::UnknownNamespace);
    assert_eq!(ex.op(), Some("catalog_lookup"));
    assert!(ex.message().contains("999"));
}

#[test]
fn test_invalid_bits_maps_to_invalid_input() {
    let ex: ExError = SnapTabError::InvalidBits { bits: 64 }.into();
    assert_eq!(ex.kind(), ExErrorKind::InvalidInput);
    assert!(ex.message().contains("64"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::MalformedDocument, "ERR_MALFORMED_DOCUMENT"),
        (ExErrorKind::MissingKeyValue, "ERR_MISSING_KEY_VALUE"),
        (ExErrorKind::Io, "ERR_IO"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_json_error_becomes_serialization() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: SnapTabError = json_err.into();
    assert!(matches!(err, SnapTabError::Serialization { .. }));
}
