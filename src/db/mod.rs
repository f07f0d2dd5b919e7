//! Database layer.
//!
//! Jobs talk to the document store only through [`TaskStore`], so the
//! Firestore client can be swapped for the in-memory store in tests and
//! local development.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{Achievement, Activity, Project, Task, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TASKS: &str = "tasks";
    pub const PROJECTS: &str = "projects";
    pub const ACTIVITIES: &str = "activities";
    /// Append-only achievement history
    pub const ACHIEVEMENTS: &str = "achievements";
}

/// Timestamp range over the `activities` collection.
///
/// Bounds are ISO 8601 strings and compare lexically.
#[derive(Debug, Clone, Copy)]
pub enum ActivityRange<'a> {
    All,
    Before(&'a str),
    AtOrAfter(&'a str),
}

impl ActivityRange<'_> {
    pub fn contains(&self, timestamp: &str) -> bool {
        match self {
            ActivityRange::All => true,
            ActivityRange::Before(cutoff) => timestamp < *cutoff,
            ActivityRange::AtOrAfter(cutoff) => timestamp >= *cutoff,
        }
    }
}

/// Query-and-write access to the document store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Get a user by document ID.
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// One page of users in document-ID order.
    async fn list_users(&self, offset: u32, limit: u32) -> Result<Vec<User>, AppError>;

    /// All tasks owned by a user.
    async fn get_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, AppError>;

    /// Count of a user's done tasks with `completedAt >= since`.
    async fn count_completed_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError>;

    /// Count of a user's tasks with `createdAt >= since`.
    async fn count_created_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError>;

    /// All tasks in a project owned by a user.
    async fn get_project_tasks(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Vec<Task>, AppError>;

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError>;

    /// Up to `limit` activities with `timestamp < cutoff`, in no particular order.
    async fn find_activities_before(
        &self,
        cutoff: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError>;

    /// Delete activities by ID as one atomic commit.
    async fn delete_activities(&self, ids: &[String]) -> Result<(), AppError>;

    async fn count_activities(&self, range: ActivityRange<'_>) -> Result<u64, AppError>;

    /// Append an achievement record under a generated ID.
    async fn add_achievement(&self, achievement: &Achievement) -> Result<(), AppError>;
}
