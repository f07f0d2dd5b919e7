// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement detection on task writes.
//!
//! Both checks re-query current state on every event instead of keeping a
//! counter, and neither is deduplicated: a redelivered event, or two writes
//! racing on the same user's count, can announce the same milestone twice.
//! Milestones match exact counts, so a write that jumps over one (4 → 6)
//! announces nothing.

use crate::error::Result;
use crate::models::project::Project;
use crate::models::{Achievement, TaskSnapshot};
use crate::services::messages;
use crate::services::notifier::Notifier;
use crate::time_utils::start_of_local_day;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A create/update/delete on one task document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWrite {
    pub task_id: String,
    /// State before the write; absent on create
    #[serde(default)]
    pub before: Option<TaskSnapshot>,
    /// State after the write; absent on delete
    #[serde(default)]
    pub after: Option<TaskSnapshot>,
}

/// What the task-write handler did.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerReport {
    pub daily_completion: Option<Achievement>,
    pub project_completion: Option<Achievement>,
}

/// Announce a same-day completion milestone when a task flips to done.
///
/// Returns the recorded achievement, if any.
pub async fn check_daily_achievement(
    notifier: &Notifier,
    timezone: Tz,
    write: &TaskWrite,
    now: DateTime<Utc>,
) -> Result<Option<Achievement>> {
    let (Some(before), Some(after)) = (&write.before, &write.after) else {
        return Ok(None);
    };
    if before.is_done == after.is_done || !after.is_done {
        return Ok(None);
    }
    let Some(user_id) = after.user_id.as_deref().filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let midnight = start_of_local_day(now, timezone);
    let completed_today = notifier
        .store()
        .count_completed_since(user_id, midnight)
        .await?;

    let Some(milestone) = messages::daily_milestone(completed_today) else {
        tracing::debug!(user_id, completed_today, "No daily milestone reached");
        return Ok(None);
    };

    notifier
        .send_to_user(user_id, &messages::daily_achievement(milestone))
        .await?;

    let achievement = Achievement::daily_completion(user_id, completed_today, milestone.title, now);
    notifier.store().add_achievement(&achievement).await?;

    tracing::info!(
        user_id,
        task_id = %write.task_id,
        count = completed_today,
        title = milestone.title,
        "Achievement unlocked"
    );
    Ok(Some(achievement))
}

/// Announce a project whose tasks (for this owner) are now all done.
///
/// Fires on every qualifying write, including re-completions of an already
/// finished project.
pub async fn check_project_completion(
    notifier: &Notifier,
    write: &TaskWrite,
    now: DateTime<Utc>,
) -> Result<Option<Achievement>> {
    let Some(after) = &write.after else {
        return Ok(None);
    };
    if !after.is_done {
        return Ok(None);
    }
    let Some(project_id) = after.project_id.as_deref().filter(|id| !id.is_empty()) else {
        return Ok(None);
    };
    let Some(user_id) = after.user_id.as_deref().filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let tasks = notifier.store().get_project_tasks(user_id, project_id).await?;
    let total = tasks.len() as u32;
    let completed = tasks.iter().filter(|t| t.is_done).count() as u32;

    if total == 0 || completed != total {
        tracing::debug!(user_id, project_id, completed, total, "Project not complete");
        return Ok(None);
    }

    let project = notifier.store().get_project(project_id).await?;
    let project_title = Project::display_title(project.as_ref());

    notifier
        .send_to_user(
            user_id,
            &messages::project_achievement(project_id, &project_title, total),
        )
        .await?;

    let achievement =
        Achievement::project_completion(user_id, project_id, &project_title, total, now);
    notifier.store().add_achievement(&achievement).await?;

    tracing::info!(
        user_id,
        project_id,
        project_title = %project_title,
        task_count = total,
        "Project completed"
    );
    Ok(Some(achievement))
}

/// Run both checks for one task write.
///
/// The checks are independent: a failure in one is logged and does not
/// skip the other. The first error is returned after both ran.
pub async fn on_task_written(
    notifier: &Notifier,
    timezone: Tz,
    write: &TaskWrite,
    now: DateTime<Utc>,
) -> Result<TriggerReport> {
    let daily = check_daily_achievement(notifier, timezone, write, now).await;
    if let Err(e) = &daily {
        tracing::error!(task_id = %write.task_id, error = %e, "Daily achievement check failed");
    }

    let project = check_project_completion(notifier, write, now).await;
    if let Err(e) = &project {
        tracing::error!(task_id = %write.task_id, error = %e, "Project completion check failed");
    }

    match (daily, project) {
        (Ok(daily_completion), Ok(project_completion)) => Ok(TriggerReport {
            daily_completion,
            project_completion,
        }),
        (Err(e), _) | (Ok(_), Err(e)) => Err(e),
    }
}
