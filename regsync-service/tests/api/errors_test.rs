use super::*;

#[tokio::test]
async fn test_registrations_when_status_read_fails_then_500_with_code() {
    let app = test_app(StubEngine::failing(|| RegsyncError::StatusReadFailed {
        authority: "registry".to_string(),
        details: "connection refused".to_string(),
    }));
    let body = serde_json::to_value(vec![test_registration(1)]).expect("serialize");

    let (status, json) = post_json(&app.router, "/api/v1/registrations", &body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "StatusReadFailed");
    assert_eq!(json["error"]["class"], "batch_fatal");
    assert!(json["error"]["message"].as_str().unwrap_or_default().contains("connection refused"));
    assert_eq!(app.metrics.snapshot().http_error, 1);
}

#[tokio::test]
async fn test_registrations_when_engine_rejects_input_then_400() {
    let app = test_app(StubEngine::failing(|| RegsyncError::InvalidPublicKey {
        input: "0x12".to_string(),
        reason: "expected 48 bytes".to_string(),
    }));
    let body = serde_json::to_value(vec![test_registration(1)]).expect("serialize");

    let (status, json) = post_json(&app.router, "/api/v1/registrations", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "InvalidPublicKey");
}

#[tokio::test]
async fn test_registrations_when_body_malformed_then_rejected_before_engine() {
    let app = test_app(StubEngine::ok());

    let (status, _) = send(&app.router, "POST", "/api/v1/registrations", Some("[{\"message\":".to_string())).await;

    assert!(status.is_client_error());
    assert_eq!(app.engine.calls(), 0);
}

#[tokio::test]
async fn test_registrations_when_pubkey_too_short_then_rejected_before_engine() {
    let app = test_app(StubEngine::ok());
    let mut body = serde_json::to_value(vec![test_registration(1)]).expect("serialize");
    body[0]["message"]["pubkey"] = serde_json::Value::String("0x1234".to_string());

    let (status, _) = post_json(&app.router, "/api/v1/registrations", &body).await;

    assert!(status.is_client_error());
    assert_eq!(app.engine.calls(), 0);
}

#[tokio::test]
async fn test_unknown_route_when_requested_then_404() {
    let app = test_app(StubEngine::ok());
    let (status, _) = send(&app.router, "GET", "/api/v1/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
