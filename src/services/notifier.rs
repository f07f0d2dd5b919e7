// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification delivery and per-user statistics.
//!
//! Delivery is log-and-continue: a missing user or push token is a normal
//! outcome, and dispatch failures are logged and swallowed so one bad
//! device never aborts a batch. Only store failures propagate.

use crate::db::TaskStore;
use crate::error::Result;
use crate::models::{TaskStats, User, WeeklyStats};
use crate::services::push::{PushDispatcher, PushPayload};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the dispatcher, with its message ID
    Sent(String),
    UserNotFound,
    NoToken,
    /// The dispatcher returned an error (already logged)
    Failed,
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent(_))
    }
}

/// Store and dispatch capabilities shared by every job and trigger.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn TaskStore>,
    push: Arc<dyn PushDispatcher>,
}

impl Notifier {
    pub fn new(store: Arc<dyn TaskStore>, push: Arc<dyn PushDispatcher>) -> Self {
        Self { store, push }
    }

    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    /// Look up a user and send them `payload`.
    pub async fn send_to_user(&self, user_id: &str, payload: &PushPayload) -> Result<Delivery> {
        match self.store.get_user(user_id).await? {
            Some(user) => Ok(self.deliver(&user, payload).await),
            None => {
                tracing::info!(user_id, "User not found, skipping notification");
                Ok(Delivery::UserNotFound)
            }
        }
    }

    /// Send `payload` to an already loaded user.
    pub async fn deliver(&self, user: &User, payload: &PushPayload) -> Delivery {
        let Some(token) = user.push_token() else {
            tracing::info!(user_id = %user.id, "No FCM token for user, skipping notification");
            return Delivery::NoToken;
        };

        match self.push.send(token, payload).await {
            Ok(message_id) => {
                tracing::info!(
                    user_id = %user.id,
                    message_id = %message_id,
                    kind = payload.data_value("type").unwrap_or("none"),
                    "Notification sent"
                );
                Delivery::Sent(message_id)
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "Failed to send notification"
                );
                Delivery::Failed
            }
        }
    }

    /// Current totals over all of a user's tasks.
    pub async fn user_task_stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<TaskStats> {
        let tasks = self.store.get_tasks_for_user(user_id).await?;
        Ok(TaskStats::from_tasks(&tasks, now))
    }

    /// Completions and creations over the seven days ending at `now`.
    pub async fn weekly_stats(&self, user_id: &str, now: DateTime<Utc>) -> Result<WeeklyStats> {
        let week_ago = now - Duration::days(7);
        let completed = self.store.count_completed_since(user_id, week_ago).await?;
        let created = self.store.count_created_since(user_id, week_ago).await?;
        Ok(WeeklyStats::new(completed, created))
    }
}
