//! Assertions for the error contract: status, `x-trace-id`,
//! `x-error-code`, and a `{"error": message}` body.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde_json::Value;

/// Checks every part of an error response and returns the message.
pub async fn assert_error_response(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_message: &str,
) -> String {
    assert_eq!(resp.status(), expected_status);

    let headers = resp.headers().clone();
    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert!(!trace_id.is_empty());
    assert_ne!(trace_id, "unknown", "trace id should come from the request");

    let code = headers
        .get("x-error-code")
        .expect("x-error-code header should be present")
        .to_str()
        .expect("x-error-code header should be valid UTF-8");
    assert_eq!(code, expected_code);

    let body = actix_web::test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).expect("error body should be JSON");
    let object = json.as_object().expect("error body should be an object");
    assert_eq!(object.len(), 1, "error body has only the message: {json}");

    let message = json["error"]
        .as_str()
        .expect("error field should be a string")
        .to_string();
    assert_eq!(message, expected_message);
    message
}
