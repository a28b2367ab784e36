// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Database Schema Bootstrap
//!
//! Creates the scheduling core's tables if they do not exist. Full
//! migration tooling belongs to the control plane; this module only
//! guarantees that a fresh database is usable.

use sqlx::migrate::MigrateDatabase;
use sqlx::SqlitePool;
use tracing::{debug, info};

use lattice_pipeline_domain::SchedulerError;

const CREATE_PROJECTS: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    root_path TEXT NOT NULL,
    minimum_x REAL NOT NULL DEFAULT 0,
    maximum_x REAL NOT NULL DEFAULT 0,
    minimum_y REAL NOT NULL DEFAULT 0,
    maximum_y REAL NOT NULL DEFAULT 0,
    minimum_z REAL NOT NULL DEFAULT 0,
    maximum_z REAL NOT NULL DEFAULT 0,
    input_source_state TEXT NOT NULL DEFAULT 'unknown',
    exit_requested INTEGER NOT NULL DEFAULT 0
)
"#;

const CREATE_TILE_STATUS: &str = r#"
CREATE TABLE IF NOT EXISTS tile_status (
    project_id TEXT NOT NULL,
    relative_path TEXT NOT NULL,
    tile_index INTEGER,
    tile_name TEXT NOT NULL,
    prev_stage_status INTEGER NOT NULL,
    this_stage_status INTEGER NOT NULL,
    lat_x REAL,
    lat_y REAL,
    lat_z REAL,
    step_x REAL,
    step_y REAL,
    step_z REAL,
    duration REAL NOT NULL DEFAULT 0,
    cpu_high REAL NOT NULL DEFAULT 0,
    memory_high REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (project_id, relative_path)
)
"#;

const CREATE_TILE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tile_status_project ON tile_status(project_id)";

/// Creates the core's tables on the provided pool if they are missing.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), SchedulerError> {
    debug!("Ensuring database schema is up to date");

    for statement in [CREATE_PROJECTS, CREATE_TILE_STATUS, CREATE_TILE_STATUS_INDEX] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to create schema: {}", e)))?;
    }

    info!("Database schema is up to date");
    Ok(())
}

/// Creates the SQLite database file if it doesn't exist.
///
/// `SqlitePool::connect` fails on a missing file, so startup calls this
/// first.
pub async fn create_database_if_missing(database_url: &str) -> Result<(), SchedulerError> {
    let exists = sqlx::Sqlite::database_exists(database_url)
        .await
        .map_err(|e| SchedulerError::database_error(format!("Failed to probe database: {}", e)))?;

    if !exists {
        debug!("Database does not exist, creating: {}", database_url);
        sqlx::Sqlite::create_database(database_url)
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to create database: {}", e)))?;
        info!("Created new SQLite database: {}", database_url);
    }
    Ok(())
}

/// Creates the database if missing, connects, and bootstraps the schema.
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, SchedulerError> {
    create_database_if_missing(database_url).await?;

    let pool = SqlitePool::connect(database_url)
        .await
        .map_err(|e| SchedulerError::database_error(format!("Failed to connect to database: {}", e)))?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // A shared in-memory database needs a single connection; otherwise each
    // pooled connection sees its own empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    ensure_schema(&pool).await.expect("schema bootstrap");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_bootstrap_is_idempotent() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_tables_exist_after_bootstrap() {
        let pool = memory_pool().await;
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('projects', 'tile_status')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count.0, 2);
    }
}
