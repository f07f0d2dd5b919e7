// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Callable endpoints used by the app.
//!
//! Requests carry their arguments as `{"data": {...}}` and successful
//! responses wrap the value as `{"result": ...}`. Errors use the
//! `{"error": {"status", "message"}}` body rendered by [`AppError`].

use crate::config::{DEFAULT_MAX_DELETE, DEFAULT_RETENTION_DAYS};
use crate::error::{AppError, Result};
use crate::middleware::auth::Caller;
use crate::models::{CleanupStats, ManualCleanupResult};
use crate::services::{cleanup, messages};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/callable/testCleanup", post(test_cleanup))
        .route("/callable/getCleanupStats", post(get_cleanup_stats))
        .route("/callable/sendTestNotification", post(send_test_notification))
}

/// Callable request envelope.
#[derive(Debug, Deserialize)]
pub struct CallableRequest<T> {
    pub data: Option<T>,
}

impl<T: Default> CallableRequest<T> {
    fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// Unwrap the request body once the caller has been checked. A body that
/// is not a JSON envelope of the expected shape is an invalid argument.
fn callable_data<T: Default>(
    body: std::result::Result<Json<CallableRequest<T>>, JsonRejection>,
) -> Result<T> {
    let Json(request) = body.map_err(|e| AppError::InvalidArgument(e.body_text()))?;
    Ok(request.into_data())
}

/// Callable response envelope.
#[derive(Debug, Serialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

fn respond<T>(result: T) -> Json<CallableResponse<T>> {
    Json(CallableResponse { result })
}

// ─── Cleanup ─────────────────────────────────────────────────

/// Arguments of `testCleanup`. Missing or zero values take the defaults.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    #[validate(range(min = 0, max = 3650))]
    pub days: Option<i64>,
    #[validate(range(min = 0, max = 10000))]
    pub max_delete: Option<i64>,
}

impl CleanupRequest {
    fn retention_days(&self) -> u32 {
        match self.days {
            Some(days) if days > 0 => days as u32,
            _ => DEFAULT_RETENTION_DAYS,
        }
    }

    fn max_delete(&self) -> u32 {
        match self.max_delete {
            Some(max) if max > 0 => max as u32,
            _ => DEFAULT_MAX_DELETE,
        }
    }
}

/// Delete old activities on demand (admin only).
async fn test_cleanup(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    body: std::result::Result<Json<CallableRequest<CleanupRequest>>, JsonRejection>,
) -> Result<Json<CallableResponse<ManualCleanupResult>>> {
    let admin = caller.require_admin("Only admin can trigger cleanup")?;

    let args = callable_data(body)?;
    args.validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    tracing::info!(
        user_id = %admin.user_id,
        days = args.retention_days(),
        max_delete = args.max_delete(),
        "Manual cleanup triggered"
    );

    let result = cleanup::manual_cleanup(
        state.notifier.store(),
        args.retention_days(),
        args.max_delete(),
        Utc::now(),
    )
    .await?;

    Ok(respond(result))
}

/// Activity counts for the default retention window.
async fn get_cleanup_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CallableResponse<CleanupStats>>> {
    let stats = cleanup::cleanup_stats(state.notifier.store(), Utc::now()).await?;
    Ok(respond(stats))
}

// ─── Test notification ───────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct TestNotificationRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResult {
    pub success: bool,
    pub message: String,
}

/// Send a notification to the caller's own device.
async fn send_test_notification(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    body: std::result::Result<Json<CallableRequest<TestNotificationRequest>>, JsonRejection>,
) -> Result<Json<CallableResponse<MessageResult>>> {
    let user = caller.require()?;
    let args = callable_data(body)?;

    let payload =
        messages::test_notification(args.title.as_deref(), args.body.as_deref(), Utc::now());
    let delivery = state.notifier.send_to_user(&user.user_id, &payload).await?;
    tracing::debug!(user_id = %user.user_id, ?delivery, "Test notification processed");

    Ok(respond(MessageResult {
        success: true,
        message: "Test notification sent".to_string(),
    }))
}
