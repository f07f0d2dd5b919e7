// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scheduled per-user notifications: inactivity, weekly summary and daily
//! reminder.
//!
//! Each job walks the `users` collection page by page, one user at a time,
//! and sends at most one notification per user per run.

use crate::config::USER_PAGE_SIZE;
use crate::db::TaskStore;
use crate::error::Result;
use crate::models::User;
use crate::services::messages::{self, INACTIVITY_THRESHOLDS};
use crate::services::notifier::{Delivery, Notifier};
use crate::time_utils::whole_days_between;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters reported by a notifier job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyReport {
    pub users_scanned: u32,
    /// Notifications attempted
    pub notifications_sent: u32,
    /// Attempts the dispatcher accepted
    pub delivered: u32,
}

impl NotifyReport {
    fn record(&mut self, delivery: &Delivery) {
        self.notifications_sent += 1;
        if delivery.is_sent() {
            self.delivered += 1;
        }
    }
}

/// Offset pager over the `users` collection.
struct UserPages<'a> {
    store: &'a dyn TaskStore,
    offset: u32,
    exhausted: bool,
}

impl<'a> UserPages<'a> {
    fn new(store: &'a dyn TaskStore) -> Self {
        Self {
            store,
            offset: 0,
            exhausted: false,
        }
    }

    async fn next_page(&mut self) -> Result<Option<Vec<User>>> {
        if self.exhausted {
            return Ok(None);
        }

        let users = self.store.list_users(self.offset, USER_PAGE_SIZE).await?;
        if users.len() < USER_PAGE_SIZE as usize {
            self.exhausted = true;
        }
        if users.is_empty() {
            return Ok(None);
        }

        self.offset += users.len() as u32;
        Ok(Some(users))
    }
}

/// Remind users whose last sign-in was exactly 3, 7 or 14 days ago and who
/// still have pending tasks.
///
/// Thresholds use exact equality, so a skipped daily run skips that
/// threshold for everyone who crossed it that day.
pub async fn check_inactive_users(notifier: &Notifier, now: DateTime<Utc>) -> Result<NotifyReport> {
    tracing::info!("Checking inactive users");
    let mut report = NotifyReport::default();
    let mut pages = UserPages::new(notifier.store());

    while let Some(users) = pages.next_page().await? {
        for user in users {
            report.users_scanned += 1;

            let Some(last_sign_in) = user.last_sign_in else {
                continue;
            };

            let days_inactive = whole_days_between(last_sign_in, now);
            if !INACTIVITY_THRESHOLDS.contains(&days_inactive) {
                continue;
            }

            let stats = notifier.user_task_stats(&user.id, now).await?;
            if stats.pending == 0 {
                continue;
            }

            if let Some(payload) = messages::inactivity_reminder(days_inactive, stats.pending) {
                tracing::debug!(user_id = %user.id, days_inactive, "Sending inactivity reminder");
                let delivery = notifier.deliver(&user, &payload).await;
                report.record(&delivery);
            }
        }
    }

    tracing::info!(
        users_scanned = report.users_scanned,
        notifications_sent = report.notifications_sent,
        delivered = report.delivered,
        "Sent inactive user notifications"
    );
    Ok(report)
}

/// Send each user their productivity figures for the trailing week.
pub async fn send_weekly_summary(notifier: &Notifier, now: DateTime<Utc>) -> Result<NotifyReport> {
    tracing::info!("Sending weekly summaries");
    let mut report = NotifyReport::default();
    let mut pages = UserPages::new(notifier.store());

    while let Some(users) = pages.next_page().await? {
        for user in users {
            report.users_scanned += 1;

            let weekly = notifier.weekly_stats(&user.id, now).await?;
            let current = notifier.user_task_stats(&user.id, now).await?;

            // Nothing meaningful to report.
            if weekly.completed_this_week == 0 && current.total == 0 {
                continue;
            }

            let payload = messages::weekly_summary(&weekly, &current);
            let delivery = notifier.deliver(&user, &payload).await;
            report.record(&delivery);
        }
    }

    tracing::info!(
        users_scanned = report.users_scanned,
        notifications_sent = report.notifications_sent,
        delivered = report.delivered,
        "Sent weekly summaries"
    );
    Ok(report)
}

/// Remind every user with pending tasks; the tone escalates when any of
/// them are overdue.
pub async fn send_daily_reminder(notifier: &Notifier, now: DateTime<Utc>) -> Result<NotifyReport> {
    tracing::info!("Sending daily reminders");
    let mut report = NotifyReport::default();
    let mut pages = UserPages::new(notifier.store());

    while let Some(users) = pages.next_page().await? {
        for user in users {
            report.users_scanned += 1;

            let stats = notifier.user_task_stats(&user.id, now).await?;
            if stats.pending == 0 {
                continue;
            }

            let payload = messages::daily_reminder(&stats);
            let delivery = notifier.deliver(&user, &payload).await;
            report.record(&delivery);
        }
    }

    tracing::info!(
        users_scanned = report.users_scanned,
        notifications_sent = report.notifications_sent,
        delivered = report.delivered,
        "Sent daily reminders"
    );
    Ok(report)
}
