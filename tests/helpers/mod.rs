#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::{Mock, MockServer, ResponseTemplate};

use support_console::config::Config;
use support_console::state::AppState;

pub const ASHA_MOBILE: &str = "9876543210";

/// Config pointing at a mock support service.
pub fn test_config(backend_url: &str) -> Config {
    Config {
        listen: "127.0.0.1:0".into(),
        backend_url: backend_url.into(),
        api_token: Some("test-token".into()),
        request_timeout: Duration::from_secs(2),
        cors_origins: vec![],
        dev_mode: true,
    }
}

/// Build the full console router against `backend_url`.
pub fn test_app(backend_url: &str) -> Router {
    let state = AppState::new(&test_config(backend_url)).expect("app state");
    Router::new()
        .route("/healthz", axum::routing::get(|| async { "ok" }))
        .merge(support_console::api::router())
        .with_state(state)
}

/// Mount a successful verify-user response for a student customer.
pub async fn mount_verified_user(server: &MockServer) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/users/verify-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "userId": "u1",
                "_id": "u1",
                "name": "Asha",
                "userType": "user",
                "mobile": ASHA_MOBILE,
                "additionalDetails": { "college": "IIT", "course": "CSE", "year": 3 }
            }
        })))
        .mount(server)
        .await;
}

/// Drive the console from verify to the create-request form.
pub async fn verify_and_start_create(app: &Router) {
    let (status, body) = post_json(
        app,
        "/api/workflow/verify",
        serde_json::json!({ "user_type": "user", "method": "mobile", "identifier": ASHA_MOBILE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify failed: {body}");
    let (status, body) = post_json(app, "/api/workflow/start-create", Value::Null).await;
    assert_eq!(status, StatusCode::OK, "start-create failed: {body}");
    assert_eq!(body["step"], "create-request");
}

/// A listing entry as the support service returns it.
pub fn listed_request(reference_id: &str, status: &str) -> Value {
    serde_json::json!({
        "referenceId": reference_id,
        "customerId": "u1",
        "requestType": "modify-mobile-number",
        "description": "lost old SIM",
        "priority": "high",
        "status": status,
        "createdAt": "2024-05-01T10:00:00Z",
        "oldMobile": ASHA_MOBILE,
        "newMobile": "9123456780"
    })
}

/// Send a GET request.
pub async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = body_json(resp).await;
    (status, body)
}

/// Send a POST request with a JSON body. `Value::Null` sends no body.
pub async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let builder = Request::builder().method("POST").uri(path);
    let req = if body.is_null() {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = body_json(resp).await;
    (status, body)
}

/// Read the response body as JSON; non-JSON bodies come back as a string.
pub async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
