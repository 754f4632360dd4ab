use super::*;

#[test]
fn retry_delays_grow_exponentially() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay_ms(0), 500);
    assert_eq!(policy.delay_ms(1), 1000);
    assert_eq!(policy.delay_ms(2), 2000);

    let custom = RetryPolicy {
        max_attempts: 5,
        base_delay_ms: 100,
    };
    assert_eq!(custom.delay_ms(3), 800);
    // Shift is capped so a large attempt count cannot overflow
    assert_eq!(custom.delay_ms(40), custom.delay_ms(10));
}

#[test]
fn transient_errors_retry_until_the_attempt_bound() {
    let policy = RetryPolicy::default();
    let err = ApiError::Transient("connection reset".to_string());

    assert!(policy.should_retry(&err, 0));
    assert!(policy.should_retry(&err, 1));
    // Third attempt is the last one allowed by max_attempts = 3
    assert!(!policy.should_retry(&err, 2));
}

#[test]
fn client_errors_are_never_retried() {
    let policy = RetryPolicy::default();
    assert!(!policy.should_retry(&ApiError::Unauthorized, 0));
    assert!(!policy.should_retry(&ApiError::Rejected(404, "missing".to_string()), 0));
    assert!(!policy.should_retry(&ApiError::Decode("bad json".to_string()), 0));
}

#[test]
fn http_errors_classify_by_retryability() {
    assert!(classify_http(HttpError::NetworkError("offline".to_string())).is_transient());
    assert_eq!(
        classify_http(HttpError::RequestBuildFailed("bad header".to_string())),
        ApiError::Rejected(0, "bad header".to_string())
    );
    assert_eq!(
        classify_http(HttpError::ResponseParseFailed("not text".to_string())),
        ApiError::Decode("not text".to_string())
    );
}

#[test]
fn status_codes_classify_by_retryability() {
    assert_eq!(classify_status(401), ApiError::Unauthorized);
    assert_eq!(classify_status(403), ApiError::Unauthorized);
    assert!(classify_status(500).is_transient());
    assert!(classify_status(503).is_transient());
    assert!(matches!(classify_status(404), ApiError::Rejected(404, _)));
    assert!(matches!(classify_status(422), ApiError::Rejected(422, _)));
}
