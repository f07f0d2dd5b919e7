// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Mirrors the Firestore query semantics the jobs depend on. Used for
//! local development (`STORE_BACKEND=memory`) and by the test suite.

use crate::db::{ActivityRange, TaskStore};
use crate::error::AppError;
use crate::models::{Achievement, Activity, Project, Task, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Collections {
    users: BTreeMap<String, User>,
    tasks: BTreeMap<String, Task>,
    projects: BTreeMap<String, Project>,
    activities: BTreeMap<String, Activity>,
    achievements: Vec<Achievement>,
}

/// Document store held in memory. Documents are keyed by ID and iterate in
/// ID order, like Firestore's default ordering.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put_user(&self, user: User) {
        self.write().users.insert(user.id.clone(), user);
    }

    pub fn put_task(&self, task: Task) {
        self.write().tasks.insert(task.id.clone(), task);
    }

    pub fn put_project(&self, project: Project) {
        self.write().projects.insert(project.id.clone(), project);
    }

    pub fn put_activity(&self, activity: Activity) {
        self.write().activities.insert(activity.id.clone(), activity);
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.read().activities.values().cloned().collect()
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        self.read().achievements.clone()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.read().users.get(user_id).cloned())
    }

    async fn list_users(&self, offset: u32, limit: u32) -> Result<Vec<User>, AppError> {
        Ok(self
            .read()
            .users
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, AppError> {
        Ok(self
            .read()
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_completed_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        let count = self
            .read()
            .tasks
            .values()
            .filter(|t| {
                t.user_id == user_id && t.is_done && t.completed_at.is_some_and(|c| c >= since)
            })
            .count();
        Ok(count as u32)
    }

    async fn count_created_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        let count = self
            .read()
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && t.created_at.is_some_and(|c| c >= since))
            .count();
        Ok(count as u32)
    }

    async fn get_project_tasks(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Vec<Task>, AppError> {
        Ok(self
            .read()
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && t.project_id.as_deref() == Some(project_id))
            .cloned()
            .collect())
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.read().projects.get(project_id).cloned())
    }

    async fn find_activities_before(
        &self,
        cutoff: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        Ok(self
            .read()
            .activities
            .values()
            .filter(|a| ActivityRange::Before(cutoff).contains(&a.timestamp))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn delete_activities(&self, ids: &[String]) -> Result<(), AppError> {
        let mut data = self.write();
        for id in ids {
            data.activities.remove(id);
        }
        Ok(())
    }

    async fn count_activities(&self, range: ActivityRange<'_>) -> Result<u64, AppError> {
        Ok(self
            .read()
            .activities
            .values()
            .filter(|a| range.contains(&a.timestamp))
            .count() as u64)
    }

    async fn add_achievement(&self, achievement: &Achievement) -> Result<(), AppError> {
        self.write().achievements.push(achievement.clone());
        Ok(())
    }
}
