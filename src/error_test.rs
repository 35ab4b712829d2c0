use super::*;

#[test]
fn status_401_maps_to_unauthenticated() {
    let err: Error = BackendError::Status { status: 401, message: "JWT expired".into() }.into();
    assert_eq!(err, Error::Unauthenticated);
}

#[test]
fn other_status_maps_to_rejected_with_message() {
    let err: Error = BackendError::Status { status: 403, message: "new row violates policy".into() }.into();
    assert_eq!(err, Error::Rejected { status: 403, message: "new row violates policy".into() });
    assert!(!err.is_policy_violation());
}

#[test]
fn request_failure_maps_to_network() {
    let err: Error = BackendError::Request("connection reset".into()).into();
    assert_eq!(err.error_code(), "E_NETWORK");
    assert!(err.retryable());
}

#[test]
fn silent_noops_are_policy_violations() {
    assert!(Error::NoRowsAffected.is_policy_violation());
    assert!(Error::DeleteNotApplied { id: 7 }.is_policy_violation());
    assert!(!Error::Network("x".into()).is_policy_violation());
}

#[test]
fn delete_not_applied_has_distinct_code_from_network() {
    let policy = Error::DeleteNotApplied { id: 3 };
    let network = Error::Network("timeout".into());
    assert_ne!(policy.error_code(), network.error_code());
    assert!(policy.to_string().contains("still exists"));
}

#[test]
fn backend_error_retryable_on_server_errors_only() {
    assert!(BackendError::Status { status: 503, message: String::new() }.retryable());
    assert!(BackendError::Status { status: 429, message: String::new() }.retryable());
    assert!(!BackendError::Status { status: 400, message: String::new() }.retryable());
    assert!(!BackendError::Decode("bad".into()).retryable());
}
