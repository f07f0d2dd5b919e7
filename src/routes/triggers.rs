// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trigger and job handlers.
//!
//! These are called by infrastructure (the document event source and an
//! external scheduler), not by the app. They are guarded by a secret path
//! segment; a mismatch answers `404` so the routes are not discoverable.

use crate::error::{AppError, Result};
use crate::services::{achievements, JobKind, TaskWrite};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/triggers/{uuid}/task-written", post(task_written))
        .route("/jobs/{uuid}/{job}", post(run_job))
}

fn check_path_uuid(state: &AppState, uuid: &str, route: &str) -> Result<()> {
    if uuid != state.config.trigger_path_uuid {
        tracing::warn!(
            received_uuid = %uuid,
            route,
            "Security Alert: Trigger path UUID mismatch"
        );
        return Err(AppError::NotFound("Not found".to_string()));
    }
    Ok(())
}

/// Handle one create/update/delete of a task document.
async fn task_written(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    Json(write): Json<TaskWrite>,
) -> Result<StatusCode> {
    check_path_uuid(&state, &uuid, "task-written")?;

    tracing::debug!(task_id = %write.task_id, "Task write received");

    let report =
        achievements::on_task_written(&state.notifier, state.config.timezone, &write, Utc::now())
            .await?;

    if report.daily_completion.is_some() || report.project_completion.is_some() {
        tracing::info!(
            task_id = %write.task_id,
            daily = report.daily_completion.is_some(),
            project = report.project_completion.is_some(),
            "Task write produced achievements"
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Run one recurring job now and return its report.
async fn run_job(
    State(state): State<Arc<AppState>>,
    Path((uuid, job)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>> {
    check_path_uuid(&state, &uuid, "jobs")?;

    let job = JobKind::parse(&job).ok_or_else(|| AppError::NotFound(format!("Job {}", job)))?;

    tracing::info!(job = job.name(), "Job invoked over HTTP");
    let report = job.run(&state.notifier, Utc::now()).await?;

    Ok(Json(report))
}
