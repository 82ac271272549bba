use super::*;
use serde_json::json;

#[tokio::test]
async fn test_registrations_when_valid_batch_then_outcomes_returned_in_order() {
    let app = test_app(StubEngine::ok());
    let body = serde_json::to_value(vec![test_registration(1), test_registration(2)]).expect("serialize");

    let (status, json) = post_json(&app.router, "/api/v1/registrations", &body).await;

    assert_eq!(status, StatusCode::OK);
    let results = json.as_array().expect("array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["pubkey"], test_pubkey(1).to_string());
    assert_eq!(results[1]["pubkey"], test_pubkey(2).to_string());
    assert_eq!(results[0]["registry"]["state"], "confirmed");
    assert_eq!(results[0]["registry_success"], true);
    assert_eq!(results[0]["delegation"]["state"], "not_required");
    assert_eq!(app.engine.calls(), 1);
}

#[tokio::test]
async fn test_registrations_when_builder_api_json_then_decimal_strings_accepted() {
    let app = test_app(StubEngine::ok());
    let body = json!([{
        "message": {
            "fee_recipient": "0x5555555555555555555555555555555555555555",
            "gas_limit": "30000000",
            "timestamp": "1700000000",
            "pubkey": test_pubkey(9).to_string(),
        },
        "signature": BlsSignature::new([0x22; 96]).to_string(),
    }]);

    let (status, json) = post_json(&app.router, "/api/v1/registrations", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["pubkey"], test_pubkey(9).to_string());
    assert_eq!(json[0]["payout_recipient"].as_str().map(str::to_lowercase).as_deref(), Some("0x5555555555555555555555555555555555555555"));
}

#[tokio::test]
async fn test_registrations_when_empty_array_then_empty_result() {
    let app = test_app(StubEngine::ok());
    let (status, json) = post_json(&app.router, "/api/v1/registrations", &json!([])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_metrics_when_registration_served_then_request_counted() {
    let app = test_app(StubEngine::ok());
    let body = serde_json::to_value(vec![test_registration(3)]).expect("serialize");
    let (status, _) = post_json(&app.router, "/api/v1/registrations", &body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = send(&app.router, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.contains("regsync_http_requests_total{route=\"registrations\",status=\"ok\"} 1"));
    assert!(text.contains("regsync_registrations_processed_total{authority=\"registry\",outcome=\"confirmed\"} 1"));
    assert_eq!(app.metrics.snapshot().http_ok, 1);
}

#[tokio::test]
async fn test_health_when_called_then_reports_healthy() {
    let app = test_app(StubEngine::ok());
    let (status, bytes) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(json["status"], "healthy");
}
