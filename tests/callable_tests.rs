// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Callable endpoint tests.
//!
//! These tests verify that:
//! 1. Privileged callables reject callers without the admin claim
//! 2. Errors use the `{"error": {"status", "message"}}` envelope
//! 3. Results use the `{"result": ...}` envelope
//! 4. Invalid bearer tokens are rejected before any handler runs

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{activity, create_test_app, create_test_jwt, user};

async fn call(app: Router, name: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(format!("/callable/{name}"))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ═══════════════════════════════════════════════════════════════════════════
// testCleanup
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_cleanup_requires_admin() {
    let (app, _, env) = create_test_app();
    env.store
        .put_activity(activity("a1", "2000-01-01T00:00:00.000Z"));

    for token in [None, Some(create_test_jwt("user-1", false))] {
        let (status, body) =
            call(app.clone(), "testCleanup", token.as_deref(), json!({"data": {}})).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({"error": {
                "status": "PERMISSION_DENIED",
                "message": "Only admin can trigger cleanup"
            }})
        );
    }

    // Nothing was deleted
    assert_eq!(env.store.activities().len(), 1);
}

#[tokio::test]
async fn test_cleanup_as_admin() {
    let (app, _, env) = create_test_app();
    for i in 0..3 {
        env.store
            .put_activity(activity(&format!("old-{i}"), "2000-01-01T00:00:00.000Z"));
    }
    env.store
        .put_activity(activity("future", "2999-01-01T00:00:00.000Z"));
    let token = create_test_jwt("admin-1", true);

    let (status, body) = call(
        app.clone(),
        "testCleanup",
        Some(&token),
        json!({"data": {"days": 30, "maxDelete": 2}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": {"success": true, "deleted": 2}}));

    // Defaults apply when data is missing
    let (_, body) = call(app.clone(), "testCleanup", Some(&token), json!({})).await;
    assert_eq!(body, json!({"result": {"success": true, "deleted": 1}}));

    let (_, body) = call(app, "testCleanup", Some(&token), json!({"data": null})).await;
    assert_eq!(
        body,
        json!({"result": {"success": true, "message": "No old activities found"}})
    );

    assert_eq!(env.store.activities().len(), 1);
}

#[tokio::test]
async fn test_cleanup_rejects_out_of_range_arguments() {
    let (app, _, _) = create_test_app();
    let token = create_test_jwt("admin-1", true);

    for data in [
        json!({"days": 5000}),
        json!({"maxDelete": 20000}),
        json!({"days": -1}),
    ] {
        let (status, body) =
            call(app.clone(), "testCleanup", Some(&token), json!({ "data": data.clone() })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{data}");
        assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    }
}

/// Send a request without a JSON content type or body.
async fn call_without_body(app: Router, name: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(format!("/callable/{name}"));
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_cleanup_checks_admin_before_arguments() {
    let (app, _, env) = create_test_app();
    env.store
        .put_activity(activity("a1", "2000-01-01T00:00:00.000Z"));
    let user_token = create_test_jwt("user-1", false);

    for token in [None, Some(user_token.as_str())] {
        let (status, body) = call_without_body(app.clone(), "testCleanup", token).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["status"], "PERMISSION_DENIED");

        let (status, body) = call(
            app.clone(),
            "testCleanup",
            token,
            json!({"data": {"days": "30"}}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({"error": {
                "status": "PERMISSION_DENIED",
                "message": "Only admin can trigger cleanup"
            }})
        );
    }

    assert_eq!(env.store.activities().len(), 1);
}

#[tokio::test]
async fn test_cleanup_malformed_body_is_invalid_argument() {
    let (app, _, env) = create_test_app();
    env.store
        .put_activity(activity("a1", "2000-01-01T00:00:00.000Z"));
    let token = create_test_jwt("admin-1", true);

    let (status, body) = call(
        app.clone(),
        "testCleanup",
        Some(&token),
        json!({"data": {"days": "30"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");

    let (status, body) = call_without_body(app, "testCleanup", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");

    assert_eq!(env.store.activities().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// getCleanupStats
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_cleanup_stats_is_public() {
    let (app, _, env) = create_test_app();
    env.store
        .put_activity(activity("old", "2000-01-01T00:00:00.000Z"));
    env.store
        .put_activity(activity("new", "2999-01-01T00:00:00.000Z"));

    let (status, body) = call(app, "getCleanupStats", None, json!({"data": null})).await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["result"];
    assert_eq!(result["total"], 2);
    assert_eq!(result["old"], 1);
    assert_eq!(result["recent"], 1);
    assert_eq!(result["retentionDays"], 7);
    assert!(result["cutoffDate"].as_str().unwrap().ends_with('Z'));
}

// ═══════════════════════════════════════════════════════════════════════════
// sendTestNotification
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_notification_requires_authentication() {
    let (app, _, env) = create_test_app();

    let (status, body) = call(app, "sendTestNotification", None, json!({"data": {}})).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"error": {
            "status": "UNAUTHENTICATED",
            "message": "User must be authenticated"
        }})
    );
    assert!(env.push.sent().is_empty());
}

#[tokio::test]
async fn test_notification_goes_to_caller() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("user-1", Some("device-1"), None));
    env.store.put_user(user("user-2", Some("device-2"), None));
    let token = create_test_jwt("user-1", false);

    let (status, body) = call(
        app.clone(),
        "sendTestNotification",
        Some(&token),
        json!({"data": {"title": "Hello"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"result": {"success": true, "message": "Test notification sent"}})
    );

    let sent = env.push.sent();
    assert_eq!(sent.len(), 1);
    let (device, payload) = &sent[0];
    assert_eq!(device, "device-1");
    assert_eq!(payload.title, "Hello");
    assert_eq!(payload.body, "นี่คือการแจ้งเตือนทดสอบ");
    assert_eq!(payload.data_value("type"), Some("test"));
    assert!(payload.data_value("timestamp").is_some());
}

#[tokio::test]
async fn test_notification_without_token_still_succeeds() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("user-1", None, None));
    let token = create_test_jwt("user-1", false);

    let (status, body) = call(app, "sendTestNotification", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["success"], true);
    assert!(env.push.sent().is_empty());
}

#[tokio::test]
async fn test_notification_checks_caller_before_arguments() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("user-1", Some("device-1"), None));

    let (status, body) = call_without_body(app.clone(), "sendTestNotification", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status"], "UNAUTHENTICATED");

    let token = create_test_jwt("user-1", false);
    let (status, body) = call(
        app,
        "sendTestNotification",
        Some(&token),
        json!({"data": {"title": 42}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    assert!(env.push.sent().is_empty());
}

#[tokio::test]
async fn test_invalid_bearer_token_rejected() {
    let (app, _, _) = create_test_app();

    let (status, body) = call(
        app,
        "getCleanupStats",
        Some("not-a-jwt"),
        json!({"data": null}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["buildId"].is_string());
}
