// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recurring jobs and the in-process cron runner.
//!
//! Every job can also be run on demand through the job route, so an
//! external scheduler can drive them when the in-process one is disabled.

use crate::error::Result;
use crate::services::notifier::Notifier;
use crate::services::{cleanup, reminders};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;
use tokio::task::JoinHandle;

/// A recurring job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    CleanupOldActivities,
    CheckInactiveUsers,
    SendWeeklySummary,
    SendDailyReminder,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::CleanupOldActivities,
        JobKind::CheckInactiveUsers,
        JobKind::SendWeeklySummary,
        JobKind::SendDailyReminder,
    ];

    /// Route name of the job.
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::CleanupOldActivities => "cleanup-old-activities",
            JobKind::CheckInactiveUsers => "check-inactive-users",
            JobKind::SendWeeklySummary => "send-weekly-summary",
            JobKind::SendDailyReminder => "send-daily-reminder",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|job| job.name() == name)
    }

    /// Cron expression (sec min hour dom month dow), in the schedule timezone.
    pub fn cron_expression(&self) -> &'static str {
        match self {
            JobKind::CleanupOldActivities => "0 0 2 * * *",
            JobKind::CheckInactiveUsers => "0 0 9 * * *",
            JobKind::SendWeeklySummary => "0 0 20 * * Sun",
            JobKind::SendDailyReminder => "0 0 18 * * *",
        }
    }

    pub fn schedule(&self) -> std::result::Result<Schedule, cron::error::Error> {
        Schedule::from_str(self.cron_expression())
    }

    /// Run the job once and return its report as JSON.
    pub async fn run(&self, notifier: &Notifier, now: DateTime<Utc>) -> Result<serde_json::Value> {
        let report = match self {
            JobKind::CleanupOldActivities => {
                serde_json::to_value(cleanup::cleanup_old_activities(notifier.store(), now).await?)
            }
            JobKind::CheckInactiveUsers => {
                serde_json::to_value(reminders::check_inactive_users(notifier, now).await?)
            }
            JobKind::SendWeeklySummary => {
                serde_json::to_value(reminders::send_weekly_summary(notifier, now).await?)
            }
            JobKind::SendDailyReminder => {
                serde_json::to_value(reminders::send_daily_reminder(notifier, now).await?)
            }
        };
        Ok(report.map_err(anyhow::Error::from)?)
    }
}

/// Next fire time of `schedule` strictly after `now`, in UTC.
pub fn next_fire(schedule: &Schedule, timezone: Tz, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule
        .after(&now.with_timezone(&timezone))
        .next()
        .map(|at| at.with_timezone(&Utc))
}

/// Spawn one background task per job. Each sleeps until its next fire
/// time, runs, logs the outcome, and repeats; a failed run does not stop
/// the schedule.
pub fn spawn_scheduler(notifier: Notifier, timezone: Tz) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    for job in JobKind::ALL {
        let schedule = match job.schedule() {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::error!(job = job.name(), error = %e, "Invalid job schedule, not scheduling");
                continue;
            }
        };
        let notifier = notifier.clone();

        handles.push(tokio::spawn(async move {
            tracing::info!(
                job = job.name(),
                cron = job.cron_expression(),
                timezone = %timezone,
                "Job scheduled"
            );

            loop {
                let now = Utc::now();
                let Some(next) = next_fire(&schedule, timezone, now) else {
                    tracing::warn!(job = job.name(), "Schedule has no upcoming runs");
                    break;
                };
                let wait = (next - now).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;

                match job.run(&notifier, Utc::now()).await {
                    Ok(report) => tracing::info!(job = job.name(), %report, "Job completed"),
                    Err(e) => tracing::error!(job = job.name(), error = %e, "Job failed"),
                }
            }
        }));
    }

    handles
}
