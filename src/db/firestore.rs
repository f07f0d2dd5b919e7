// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the queries the scheduled jobs and triggers need over:
//! - Users (push tokens, last sign-in)
//! - Tasks and projects (statistics, achievements)
//! - Activities (retention cleanup)
//! - Achievements (append-only history)

use crate::db::{collections, ActivityRange, TaskStore};
use crate::error::AppError;
use crate::models::{Achievement, Activity, Project, Task, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firestore::FirestoreTimestamp;
use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;

/// Firestore limits batch/transaction writes to 500 operations.
const MAX_WRITES_PER_COMMIT: usize = 500;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Write a document under a fixed ID, replacing any existing one.
    ///
    /// Users, tasks, projects and activities are written by the app; this
    /// seeds them for emulator runs.
    pub async fn put_document<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + Sync + Send,
        for<'de> T: serde::Deserialize<'de>,
    {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read a document by ID.
    pub async fn get_document<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the documents produced by a streaming query without
    /// materializing them.
    async fn count_stream<T>(
        stream: BoxStream<'_, firestore::FirestoreResult<T>>,
    ) -> Result<u64, AppError> {
        stream
            .try_fold(0u64, |count, _| async move { Ok(count + 1) })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl TaskStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn list_users(&self, offset: u32, limit: u32) -> Result<Vec<User>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([("__name__", firestore::FirestoreQueryDirection::Ascending)])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Task Operations ─────────────────────────────────────────

    async fn get_tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::TASKS)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn count_completed_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        let stream = self
            .client
            .fluent()
            .select()
            .from(collections::TASKS)
            .filter(|q| {
                q.for_all([
                    q.field("userId").eq(user_id),
                    q.field("isDone").eq(true),
                    q.field("completedAt")
                        .greater_than_or_equal(FirestoreTimestamp(since)),
                ])
            })
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = Self::count_stream(stream).await?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn count_created_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        let stream = self
            .client
            .fluent()
            .select()
            .from(collections::TASKS)
            .filter(|q| {
                q.for_all([
                    q.field("userId").eq(user_id),
                    q.field("createdAt")
                        .greater_than_or_equal(FirestoreTimestamp(since)),
                ])
            })
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = Self::count_stream(stream).await?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn get_project_tasks(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Vec<Task>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::TASKS)
            .filter(|q| {
                q.for_all([
                    q.field("projectId").eq(project_id),
                    q.field("userId").eq(user_id),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::PROJECTS)
            .obj()
            .one(project_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Activity Operations ─────────────────────────────────────

    async fn find_activities_before(
        &self,
        cutoff: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(|q| q.for_all([q.field("timestamp").less_than(cutoff)]))
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All deletes go into one transaction, so a page is removed entirely
    /// or not at all.
    async fn delete_activities(&self, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        if ids.len() > MAX_WRITES_PER_COMMIT {
            return Err(AppError::Database(format!(
                "Refusing to delete {} activities in one commit (limit {})",
                ids.len(),
                MAX_WRITES_PER_COMMIT
            )));
        }

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for id in ids {
            self.client
                .fluent()
                .delete()
                .from(collections::ACTIVITIES)
                .document_id(id)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add deletion to transaction for {}: {}",
                        collections::ACTIVITIES,
                        e
                    ))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit batch deletion: {}", e)))?;

        tracing::debug!(count = ids.len(), "Deleted activity batch");
        Ok(())
    }

    async fn count_activities(&self, range: ActivityRange<'_>) -> Result<u64, AppError> {
        let query = self
            .client
            .fluent()
            .select()
            .from(collections::ACTIVITIES);

        let stream = match range {
            ActivityRange::All => query.stream_query_with_errors().await,
            ActivityRange::Before(cutoff) => {
                query
                    .filter(|q| q.for_all([q.field("timestamp").less_than(cutoff)]))
                    .stream_query_with_errors()
                    .await
            }
            ActivityRange::AtOrAfter(cutoff) => {
                query
                    .filter(|q| q.for_all([q.field("timestamp").greater_than_or_equal(cutoff)]))
                    .stream_query_with_errors()
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        Self::count_stream(stream).await
    }

    // ─── Achievement Operations ──────────────────────────────────

    /// `achievedAt` is overwritten with the commit time by a server-value
    /// transform, so the stored timestamp comes from Firestore.
    async fn add_achievement(&self, achievement: &Achievement) -> Result<(), AppError> {
        let document_id = achievement.document_id();

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.client
            .fluent()
            .update()
            .in_col(collections::ACHIEVEMENTS)
            .document_id(&document_id)
            .object(achievement)
            .transforms(|t| {
                t.fields([t
                    .field("achievedAt")
                    .server_value(firestore::FirestoreTransformServerValue::RequestTime)])
            })
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to add achievement {} to transaction: {}",
                    document_id, e
                ))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit achievement: {}", e)))?;

        tracing::debug!(
            document_id = %document_id,
            kind = achievement.kind.as_str(),
            "Recorded achievement"
        );
        Ok(())
    }
}
