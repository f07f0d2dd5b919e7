// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trigger and job route tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{activity, create_test_app, done_task, pending_task, user};

const UUID: &str = "test-trigger-uuid";

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_wrong_uuid_is_not_found() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("u1", Some("tok"), None));
    env.store.put_task(done_task("t1", "u1", Utc::now()));

    let event = json!({
        "taskId": "t1",
        "before": {"userId": "u1", "isDone": false},
        "after": {"userId": "u1", "isDone": true}
    });

    let response = app
        .clone()
        .oneshot(post("/triggers/wrong-uuid/task-written", event))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(post("/jobs/wrong-uuid/send-daily-reminder", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(env.push.sent().is_empty());
}

#[tokio::test]
async fn test_task_written_unlocks_first_milestone() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("u1", Some("tok"), None));
    env.store.put_task(done_task("t1", "u1", Utc::now()));

    let event = json!({
        "taskId": "t1",
        "before": {"userId": "u1", "isDone": false},
        "after": {"userId": "u1", "isDone": true}
    });

    let response = app
        .oneshot(post(&format!("/triggers/{UUID}/task-written"), event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let payloads = env.push.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].title, "🎯 เริ่มต้นดีแล้ว!");
    assert_eq!(env.store.achievements().len(), 1);
}

#[tokio::test]
async fn test_task_created_is_ignored() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("u1", Some("tok"), None));
    env.store.put_task(pending_task("t1", "u1"));

    let event = json!({
        "taskId": "t1",
        "after": {"userId": "u1", "isDone": false}
    });

    let response = app
        .oneshot(post(&format!("/triggers/{UUID}/task-written"), event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(env.push.sent().is_empty());
}

#[tokio::test]
async fn test_job_route_runs_cleanup() {
    let (app, _, env) = create_test_app();
    env.store
        .put_activity(activity("old", "2000-01-01T00:00:00.000Z"));
    let recent = (Utc::now() - Duration::hours(1))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    env.store.put_activity(activity("recent", &recent));

    let response = app
        .oneshot(post(
            &format!("/jobs/{UUID}/cleanup-old-activities"),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["deleted"], 1);
    assert_eq!(env.store.activities().len(), 1);
}

#[tokio::test]
async fn test_job_route_runs_daily_reminder() {
    let (app, _, env) = create_test_app();
    env.store.put_user(user("u1", Some("tok-1"), None));
    env.store.put_task(pending_task("t1", "u1"));
    env.store.put_user(user("u2", Some("tok-2"), None));

    let response = app
        .oneshot(post(&format!("/jobs/{UUID}/send-daily-reminder"), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        report,
        json!({"usersScanned": 2, "notificationsSent": 1, "delivered": 1})
    );
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let (app, _, _) = create_test_app();

    let response = app
        .oneshot(post(&format!("/jobs/{UUID}/drop-everything"), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
