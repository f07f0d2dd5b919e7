// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PlanMate Functions Server
//!
//! Serves the callable endpoints and task-write triggers, and runs the
//! recurring notification and cleanup jobs.

use planmate_functions::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryStore, TaskStore},
    services::{scheduler, FcmDispatcher, LogOnlyDispatcher, PushDispatcher},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        timezone = %config.timezone,
        "Starting PlanMate Functions"
    );

    // Document store
    let store: Arc<dyn TaskStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(
            FirestoreDb::new(&config.gcp_project_id)
                .await
                .expect("Failed to connect to Firestore"),
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, nothing will be persisted");
            Arc::new(MemoryStore::new())
        }
    };

    // Push dispatcher
    let push: Arc<dyn PushDispatcher> = match &config.firebase_key_path {
        Some(key_path) => Arc::new(
            FcmDispatcher::from_key_file(&config.gcp_project_id, key_path)
                .await
                .expect("Failed to initialize FCM dispatcher"),
        ),
        None => {
            tracing::warn!("FIREBASE_KEY_PATH not set, notifications will only be logged");
            Arc::new(LogOnlyDispatcher)
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store, push));

    if config.enable_scheduler {
        let jobs = scheduler::spawn_scheduler(state.notifier.clone(), config.timezone);
        tracing::info!(count = jobs.len(), "Scheduler started");
    } else {
        tracing::info!("In-process scheduler disabled");
    }

    // Build router
    let app = planmate_functions::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("planmate_functions=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
