// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Task model, written by the mobile client and observed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task document in Firestore.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Document ID
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Project the task belongs to, if any
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    /// Set by the client when `is_done` flips to true
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// A pending task whose due date has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_done && self.due_date.is_some_and(|due| due < now)
    }
}

/// One side of a task write event.
///
/// Only the fields the achievement triggers look at are decoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub is_done: bool,
}
