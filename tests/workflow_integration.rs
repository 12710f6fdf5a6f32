mod helpers;

use axum::http::StatusCode;
use serde_json::Value;
use wiremock::matchers;
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{
    ASHA_MOBILE, get_json, listed_request, mount_verified_user, post_json, test_app,
    verify_and_start_create,
};

fn mobile_change(new_mobile: &str) -> Value {
    serde_json::json!({
        "request_type": "modify-mobile-number",
        "description": "lost old SIM",
        "priority": "high",
        "old_mobile": ASHA_MOBILE,
        "new_mobile": new_mobile,
    })
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthz_ok() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());
    let (status, body) = get_json(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn fresh_console_is_at_verify() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());
    let (status, body) = get_json(&app, "/api/workflow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "verify");
    assert_eq!(body["section"], "customer-service");
    assert_eq!(body["busy"], false);
    assert!(body.get("customer").is_none());
}

#[tokio::test]
async fn verify_by_mobile_reaches_overview() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/users/verify-user"))
        .and(matchers::header("Authorization", "Bearer test-token"))
        .and(matchers::body_partial_json(serde_json::json!({
            "userType": "user",
            "verificationMethod": "mobile",
            "mobile": ASHA_MOBILE,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "userId": "u1", "name": "Asha", "userType": "user", "mobile": ASHA_MOBILE }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    let (status, body) = post_json(
        &app,
        "/api/workflow/verify",
        serde_json::json!({ "user_type": "user", "method": "mobile", "identifier": ASHA_MOBILE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["step"], "overview");
    assert_eq!(body["customer"]["id"], "u1");
    assert_eq!(body["customer"]["name"], "Asha");
}

#[tokio::test]
async fn short_mobile_rejected_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    let (status, body) = post_json(
        &app,
        "/api/workflow/verify",
        serde_json::json!({ "user_type": "user", "method": "mobile", "identifier": "98765" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("10 digits"));

    let (_, snap) = get_json(&app, "/api/workflow").await;
    assert_eq!(snap["step"], "verify");
}

#[tokio::test]
async fn unknown_customer_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/users/verify-user"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "success": false,
            "message": "User not found"
        })))
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    let (status, body) = post_json(
        &app,
        "/api/workflow/verify",
        serde_json::json!({ "user_type": "user", "method": "mobile", "identifier": "9000000000" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (_, snap) = get_json(&app, "/api/workflow").await;
    assert_eq!(snap["step"], "verify");
    assert_eq!(snap["error"], "User not found");
}

#[tokio::test]
async fn organisation_verified_by_email_uses_organisation_id() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/users/verify-user"))
        .and(matchers::body_partial_json(serde_json::json!({
            "userType": "organisation",
            "verificationMethod": "email",
            "email": "ops@acme.io",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": {
                "organisationId": "org-7",
                "_id": "mongo-7",
                "name": "Acme Events",
                "email": "ops@acme.io",
                "director": "R. Rao",
                "isVerified": true
            }
        })))
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    let (status, body) = post_json(
        &app,
        "/api/workflow/verify",
        serde_json::json!({ "user_type": "organisation", "method": "email", "identifier": "ops@acme.io" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["customer"]["id"], "org-7");
    assert_eq!(body["customer"]["user_type"], "organisation");
    assert_eq!(body["customer"]["organisation"]["director"], "R. Rao");
}

// ---------------------------------------------------------------------------
// Request creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_mobile_change_reaches_confirmation() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/customer-requests/create/u1"))
        .and(matchers::body_partial_json(serde_json::json!({
            "requestType": "modify-mobile-number",
            "priority": "high",
            "oldMobile": ASHA_MOBILE,
            "newMobile": "9123456780",
            "oldPassword": "",
            "newEmail": "",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": { "referenceId": "REQ-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) =
        post_json(&app, "/api/workflow/requests", mobile_change("9123456780")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["step"], "confirmation");
    assert_eq!(body["reference_id"], "REQ-1");
    assert_eq!(body["customer"]["id"], "u1");
}

#[tokio::test]
async fn invalid_new_mobile_makes_no_create_call() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::path("/api/customer-requests/create/u1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) = post_json(&app, "/api/workflow/requests", mobile_change("12345")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("mobile"));

    let (_, snap) = get_json(&app, "/api/workflow").await;
    assert_eq!(snap["step"], "create-request");
}

#[tokio::test]
async fn short_password_makes_no_create_call() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::path("/api/customer-requests/create/u1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/workflow/requests",
        serde_json::json!({
            "request_type": "reset-password",
            "description": "forgot password",
            "old_password": "hunter22",
            "new_password": "abc",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 6"));
}

#[tokio::test]
async fn unchanged_password_makes_no_create_call() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::path("/api/customer-requests/create/u1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/workflow/requests",
        serde_json::json!({
            "request_type": "reset-password",
            "description": "forgot password",
            "old_password": "abc123",
            "new_password": "abc123",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "new password must differ from the old password");

    let (_, snap) = get_json(&app, "/api/workflow").await;
    assert_eq!(snap["step"], "create-request");
}

#[tokio::test]
async fn rejected_create_keeps_form_open() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/customer-requests/create/u1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "success": false,
            "message": "an open request of this type already exists"
        })))
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) =
        post_json(&app, "/api/workflow/requests", mobile_change("9123456780")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "an open request of this type already exists");

    let (_, snap) = get_json(&app, "/api/workflow").await;
    assert_eq!(snap["step"], "create-request");
    assert_eq!(snap["busy"], false);
}

#[tokio::test]
async fn submit_before_verification_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    let (status, body) =
        post_json(&app, "/api/workflow/requests", mobile_change("9123456780")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "cannot submit from the verify step");
}

#[tokio::test]
async fn legacy_mobile_form_files_mobile_change() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/customer-requests/create/u1"))
        .and(matchers::body_partial_json(serde_json::json!({
            "requestType": "modify-mobile-number",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": { "referenceId": "REQ-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    post_json(
        &app,
        "/api/workflow/verify",
        serde_json::json!({ "user_type": "user", "method": "mobile", "identifier": ASHA_MOBILE }),
    )
    .await;
    let (status, body) = post_json(&app, "/api/workflow/start-modify-mobile", Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "modify-mobile");

    let mut form = mobile_change("9123456780");
    form["request_type"] = Value::from("");
    let (status, body) = post_json(&app, "/api/workflow/requests", form).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["reference_id"], "REQ-2");
}

// ---------------------------------------------------------------------------
// Request list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_requests_for_active_customer() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/customer-requests/my-requests/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "requests": [listed_request("REQ-1", "open")] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) = get_json(&app, "/api/workflow/requests").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["reference_id"], "REQ-1");
    assert_eq!(body["items"][0]["new_mobile"], "9123456780");

    let (_, snap) = get_json(&app, "/api/workflow").await;
    assert_eq!(snap["step"], "create-request");
}

#[tokio::test]
async fn toggle_refetches_list() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("PUT"))
        .and(matchers::path("/api/customer-requests/REQ-1/toggle-status/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "status": "closed" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/customer-requests/my-requests/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "requests": [listed_request("REQ-1", "closed")] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) =
        post_json(&app, "/api/workflow/requests/REQ-1/toggle", Value::Null).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "closed");
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["status"], "closed");
}

#[tokio::test]
async fn toggle_non_json_response_is_bad_gateway() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("PUT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>proxy error</html>", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(matchers::method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) =
        post_json(&app, "/api/workflow/requests/REQ-1/toggle", Value::Null).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "unexpected response from the support service");
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tab_switch_discards_customer() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;

    let (status, body) = post_json(
        &app,
        "/api/workflow/tab-switch",
        serde_json::json!({ "section": "organisers" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "verify");
    assert!(body.get("customer").is_none());

    let (status, _) = get_json(&app, "/api/workflow/requests").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_json(
        &app,
        "/api/workflow/tab-switch",
        serde_json::json!({ "section": "customer-service" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "verify");
}

#[tokio::test]
async fn confirmation_back_to_overview_then_reset() {
    let server = MockServer::start().await;
    mount_verified_user(&server).await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/api/customer-requests/create/u1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "data": { "referenceId": "REQ-3" }
        })))
        .mount(&server)
        .await;

    let app = test_app(&format!("{}/api", server.uri()));
    verify_and_start_create(&app).await;
    post_json(&app, "/api/workflow/requests", mobile_change("9123456780")).await;

    let (status, body) = post_json(&app, "/api/workflow/start-create", Value::Null).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "cannot start a request from the confirmation step");

    let (_, body) = post_json(&app, "/api/workflow/overview", Value::Null).await;
    assert_eq!(body["step"], "overview");
    assert_eq!(body["customer"]["id"], "u1");

    let (_, body) = post_json(&app, "/api/workflow/reset", Value::Null).await;
    assert_eq!(body["step"], "verify");
    assert!(body.get("customer").is_none());
}

#[tokio::test]
async fn navigate_without_customer_falls_back_to_verify() {
    let server = MockServer::start().await;
    let app = test_app(&format!("{}/api", server.uri()));
    let (status, body) = post_json(
        &app,
        "/api/workflow/navigate",
        serde_json::json!({ "step": "create-request" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "verify");
}

#[tokio::test]
async fn request_types_listed_with_labels() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());
    let (status, body) = get_json(&app, "/api/request-types").await;
    assert_eq!(status, StatusCode::OK);
    let types = body.as_array().unwrap();
    assert_eq!(types.len(), 3);
    assert_eq!(types[0]["value"], "modify-mobile-number");
    assert_eq!(types[0]["label"], "modify mobile number");
}
