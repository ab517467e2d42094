mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};

use support::{AUTH, MAX_BODY_BYTES, TestApp, bearer};

#[tokio::test]
async fn test_report_lifecycle_notifies_owner() {
    let app = TestApp::new();
    let (user_token, user_id) = app.register("a@x.com", "secret123").await;
    let (admin_token, _) = app.admin("admin@x.com").await;

    let response = app
        .server
        .post("/reports")
        .add_header(AUTH, bearer(&user_token))
        .json(&json!({
            "issue_type": "LEAKAGE",
            "severity": "HIGH",
            "description": "leak",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let report: Value = response.json();
    assert_eq!(report["status"], "PENDING");
    assert_eq!(report["user_id"], user_id.to_string());
    assert_eq!(report["user"]["email"], "a@x.com");
    assert_eq!(report["image_base64_data"], json!([]));

    let id = report["id"].as_str().unwrap();
    let response = app
        .server
        .put(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin_token))
        .json(&json!({ "status": "RESOLVED" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["status"], "RESOLVED");

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert!(sent[0].html.contains("Resolved"));
}

#[tokio::test]
async fn test_malformed_report_id_is_bad_request() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "secret123").await;

    let response = app
        .server
        .get("/reports/not-an-id")
        .add_header(AUTH, bearer(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid report ID format");
}

#[tokio::test]
async fn test_reports_require_token() {
    let app = TestApp::new();

    let response = app.server.get("/reports").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/reports")
        .add_header(AUTH, bearer("not.a.jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_missing_fields_rejected_without_persisting() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "secret123").await;

    let response = app
        .server
        .post("/reports")
        .add_header(AUTH, bearer(&token))
        .json(&json!({ "severity": "LOW", "description": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("issue_type"));
    assert!(message.contains("description"));

    let response = app
        .server
        .get("/reports")
        .add_header(AUTH, bearer(&token))
        .await;
    let reports: Vec<Value> = response.json();
    assert!(reports.is_empty());
}

#[tokio::test]
async fn test_invalid_json_body_is_bad_request() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "secret123").await;

    let response = app
        .server
        .post("/reports")
        .add_header(AUTH, bearer(&token))
        .json(&json!({ "issue_type": "LEAKAGE", "severity": "LOW", "description": "x", "latitude": "north" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_listing_is_scoped_by_role() {
    let app = TestApp::new();
    let (alice, alice_id) = app.register("alice@x.com", "secret123").await;
    let (bob, _) = app.register("bob@x.com", "secret123").await;
    let (admin, _) = app.admin("admin@x.com").await;

    let alice_report = app.create_report(&alice, "alice leak").await;
    let bob_report = app.create_report(&bob, "bob leak").await;

    let reports: Vec<Value> = app
        .server
        .get("/reports")
        .add_header(AUTH, bearer(&alice))
        .await
        .json();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["user_id"], alice_id.to_string());

    let reports: Vec<Value> = app
        .server
        .get("/reports")
        .add_header(AUTH, bearer(&admin))
        .await
        .json();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["id"], bob_report.to_string());

    let own: Vec<Value> = app
        .server
        .get("/reports/user-reports")
        .add_header(AUTH, bearer(&admin))
        .await
        .json();
    assert!(own.is_empty());

    let response = app
        .server
        .get(&format!("/reports/{bob_report}"))
        .add_header(AUTH, bearer(&alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .get(&format!("/reports/{alice_report}"))
        .add_header(AUTH, bearer(&admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_coordinates_round_trip() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "secret123").await;

    let created: Value = app
        .server
        .post("/reports")
        .add_header(AUTH, bearer(&token))
        .json(&json!({
            "issue_type": "WATER_QUALITY_PROBLEM",
            "severity": "MEDIUM",
            "description": "cloudy water",
            "latitude": 40.71,
            "longitude": -74.00,
            "image_base64_data": ["aGVsbG8="],
        }))
        .await
        .json();

    let id = created["id"].as_str().unwrap();
    let fetched: Value = app
        .server
        .get(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&token))
        .await
        .json();

    assert_eq!(fetched["latitude"].as_f64(), Some(40.71));
    assert_eq!(fetched["longitude"].as_f64(), Some(-74.00));
    assert_eq!(fetched["image_base64_data"], json!(["aGVsbG8="]));
}

#[tokio::test]
async fn test_invalid_status_leaves_report_unchanged() {
    let app = TestApp::new();
    let (user, _) = app.register("a@x.com", "secret123").await;
    let (admin, _) = app.admin("admin@x.com").await;
    let id = app.create_report(&user, "leak").await;

    let response = app
        .server
        .put(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin))
        .json(&json!({ "status": "CLOSED" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let report: Value = app
        .server
        .get(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin))
        .await
        .json();
    assert_eq!(report["status"], "PENDING");
    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_update_requires_admin_and_existing_report() {
    let app = TestApp::new();
    let (user, _) = app.register("a@x.com", "secret123").await;
    let (admin, _) = app.admin("admin@x.com").await;
    let id = app.create_report(&user, "leak").await;

    let response = app
        .server
        .put(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&user))
        .json(&json!({ "status": "RESOLVED" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .put(&format!("/reports/{}", uuid::Uuid::new_v4()))
        .add_header(AUTH, bearer(&admin))
        .json(&json!({ "status": "RESOLVED" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assignment_without_status_change_sends_no_mail() {
    let app = TestApp::new();
    let (user, _) = app.register("a@x.com", "secret123").await;
    let (admin, _) = app.admin("admin@x.com").await;
    let id = app.create_report(&user, "leak").await;

    let updated: Value = app
        .server
        .put(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin))
        .json(&json!({ "assigned_to": "Crew 7", "status": "pending" }))
        .await
        .json();
    assert_eq!(updated["assigned_to"], "Crew 7");
    assert_eq!(updated["status"], "PENDING");

    let cleared: Value = app
        .server
        .put(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin))
        .json(&json!({ "assigned_to": null }))
        .await
        .json();
    assert_eq!(cleared["assigned_to"], Value::Null);

    assert!(app.mailer.sent().await.is_empty());
}

#[tokio::test]
async fn test_delete_report() {
    let app = TestApp::new();
    let (user, _) = app.register("a@x.com", "secret123").await;
    let (admin, _) = app.admin("admin@x.com").await;
    let id = app.create_report(&user, "leak").await;

    let response = app
        .server
        .delete(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .delete(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Report deleted successfully");

    let response = app
        .server
        .delete(&format!("/reports/{id}"))
        .add_header(AUTH, bearer(&admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_overview() {
    let app = TestApp::new();
    let (user, _) = app.register("a@x.com", "secret123").await;
    let (admin, _) = app.admin("admin@x.com").await;
    app.create_report(&user, "first").await;
    app.create_report(&user, "second").await;

    let response = app
        .server
        .get("/reports/stats/overview")
        .add_header(AUTH, bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let stats: Value = app
        .server
        .get("/reports/stats/overview")
        .add_header(AUTH, bearer(&admin))
        .await
        .json();
    assert_eq!(stats["totalReports"], 2);
    assert_eq!(stats["statusCounts"]["PENDING"], 2);
    assert_eq!(stats["statusCounts"]["RESOLVED"], 0);
    assert_eq!(stats["severityCounts"]["HIGH"], 2);
    assert_eq!(stats["issueTypeCounts"]["OTHER"], 0);
    assert_eq!(stats["recentReports"].as_array().unwrap().len(), 2);
    assert_eq!(stats["recentReports"][0]["description"], "second");
}

#[tokio::test]
async fn test_unknown_route_and_health() {
    let app = TestApp::new();

    let response = app.server.get("/nowhere").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Route not found");

    let health: Value = app.server.get("/health").await.json();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_unsupported_method_gets_json_error() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "secret123").await;

    let response = app
        .server
        .patch("/reports")
        .add_header(AUTH, bearer(&token))
        .json(&json!({ "status": "RESOLVED" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Method not allowed");
    let allow = response.headers().get("allow").unwrap().to_str().unwrap().to_string();
    assert!(allow.contains("GET"));
    assert!(allow.contains("POST"));
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "secret123").await;

    let response = app
        .server
        .post("/reports")
        .add_header(AUTH, bearer(&token))
        .json(&json!({
            "issue_type": "LEAKAGE",
            "severity": "LOW",
            "description": "x".repeat(MAX_BODY_BYTES + 10),
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}
