// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use planmate_functions::config::Config;
use planmate_functions::db::{ActivityRange, FirestoreDb, MemoryStore, TaskStore};
use planmate_functions::error::AppError;
use planmate_functions::models::{Achievement, Activity, Project, Task, User};
use planmate_functions::routes::create_router;
use planmate_functions::services::{Notifier, PushDispatcher, PushError, PushPayload};
use planmate_functions::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Parse an RFC 3339 string into UTC.
#[allow(dead_code)]
pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339")
        .with_timezone(&Utc)
}

// ─── Push recording ──────────────────────────────────────────

/// Dispatcher that records every send instead of delivering it.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(String, PushPayload)>>,
    fail: bool,
}

#[allow(dead_code)]
impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose every send fails (after being recorded).
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, PushPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<PushPayload> {
        self.sent().into_iter().map(|(_, p)| p).collect()
    }
}

#[async_trait]
impl PushDispatcher for RecordingDispatcher {
    async fn send(&self, token: &str, payload: &PushPayload) -> Result<String, PushError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((token.to_string(), payload.clone()));
        if self.fail {
            return Err(PushError::Api {
                status: 404,
                body: "UNREGISTERED".to_string(),
            });
        }
        Ok(format!("projects/test-project/messages/{}", sent.len()))
    }
}

// ─── Store with injected failures ────────────────────────────

/// Memory store wrapper whose project queries fail.
#[allow(dead_code)]
pub struct BrokenProjectsStore {
    pub inner: Arc<MemoryStore>,
}

#[async_trait]
impl TaskStore for BrokenProjectsStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.inner.get_user(user_id).await
    }

    async fn list_users(&self, offset: u32, limit: u32) -> Result<Vec<User>, AppError> {
        self.inner.list_users(offset, limit).await
    }

    async fn get_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, AppError> {
        self.inner.get_tasks_for_user(user_id).await
    }

    async fn count_completed_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        self.inner.count_completed_since(user_id, since).await
    }

    async fn count_created_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        self.inner.count_created_since(user_id, since).await
    }

    async fn get_project_tasks(
        &self,
        _user_id: &str,
        _project_id: &str,
    ) -> Result<Vec<Task>, AppError> {
        Err(AppError::Database("projects unavailable".to_string()))
    }

    async fn get_project(&self, _project_id: &str) -> Result<Option<Project>, AppError> {
        Err(AppError::Database("projects unavailable".to_string()))
    }

    async fn find_activities_before(
        &self,
        cutoff: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        self.inner.find_activities_before(cutoff, limit).await
    }

    async fn delete_activities(&self, ids: &[String]) -> Result<(), AppError> {
        self.inner.delete_activities(ids).await
    }

    async fn count_activities(&self, range: ActivityRange<'_>) -> Result<u64, AppError> {
        self.inner.count_activities(range).await
    }

    async fn add_achievement(&self, achievement: &Achievement) -> Result<(), AppError> {
        self.inner.add_achievement(achievement).await
    }
}

// ─── Fixtures ────────────────────────────────────────────────

/// Everything a test needs to seed data and observe sends.
#[allow(dead_code)]
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub push: Arc<RecordingDispatcher>,
    pub notifier: Notifier,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        Self::with_dispatcher(RecordingDispatcher::new())
    }

    pub fn with_dispatcher(push: RecordingDispatcher) -> Self {
        let store = Arc::new(MemoryStore::new());
        let push = Arc::new(push);
        let notifier = Notifier::new(store.clone(), push.clone());
        Self {
            store,
            push,
            notifier,
        }
    }
}

#[allow(dead_code)]
pub fn user(id: &str, token: Option<&str>, last_sign_in: Option<DateTime<Utc>>) -> User {
    User {
        id: id.to_string(),
        last_sign_in,
        fcm_token: token.map(str::to_string),
    }
}

#[allow(dead_code)]
pub fn pending_task(id: &str, user_id: &str) -> Task {
    Task {
        id: id.to_string(),
        user_id: user_id.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn done_task(id: &str, user_id: &str, completed_at: DateTime<Utc>) -> Task {
    Task {
        id: id.to_string(),
        user_id: user_id.to_string(),
        is_done: true,
        completed_at: Some(completed_at),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn activity(id: &str, timestamp: &str) -> Activity {
    Activity {
        id: id.to_string(),
        timestamp: timestamp.to_string(),
    }
}

/// Create a test app over an in-memory store and a recording dispatcher.
/// Returns the router, the shared state and the test environment.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TestEnv) {
    let env = TestEnv::new();
    let state = Arc::new(AppState::new(
        Config::test_default(),
        env.store.clone(),
        env.push.clone(),
    ));
    (create_router(state.clone()), state, env)
}

/// Create a test JWT token.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, admin: bool) -> String {
    planmate_functions::middleware::auth::create_jwt(
        user_id,
        admin,
        &Config::test_default().jwt_signing_key,
    )
    .unwrap()
}
