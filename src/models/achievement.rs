//! Append-only achievement history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    DailyCompletion,
    ProjectCompletion,
}

impl AchievementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementKind::DailyCompletion => "daily_completion",
            AchievementKind::ProjectCompletion => "project_completion",
        }
    }
}

/// Record stored in the `achievements` collection. Never read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: AchievementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub achieved_at: DateTime<Utc>,
}

impl Achievement {
    /// Document ID for this record: owner, kind, milestone or project,
    /// and the local record time in microseconds.
    pub fn document_id(&self) -> String {
        let subject = match self.kind {
            AchievementKind::DailyCompletion => self.count.unwrap_or_default().to_string(),
            AchievementKind::ProjectCompletion => self.project_id.clone().unwrap_or_default(),
        };
        format!(
            "{}_{}_{}_{}",
            self.user_id,
            self.kind.as_str(),
            subject,
            self.achieved_at.timestamp_micros()
        )
    }

    pub fn daily_completion(
        user_id: &str,
        count: u32,
        title: &str,
        achieved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: AchievementKind::DailyCompletion,
            count: Some(count),
            title: Some(title.to_string()),
            project_id: None,
            project_title: None,
            task_count: None,
            achieved_at,
        }
    }

    pub fn project_completion(
        user_id: &str,
        project_id: &str,
        project_title: &str,
        task_count: u32,
        achieved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind: AchievementKind::ProjectCompletion,
            count: None,
            title: None,
            project_id: Some(project_id.to_string()),
            project_title: Some(project_title.to_string()),
            task_count: Some(task_count),
            achieved_at,
        }
    }
}
