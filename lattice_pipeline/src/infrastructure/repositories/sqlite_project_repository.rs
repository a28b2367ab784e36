// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Project Repository
//!
//! SQLite implementation of the `ProjectRepository` port. The scheduling
//! core never creates projects; it lists them to spawn ingestors, re-reads
//! them at tick boundaries, and flushes sample extents parsed from
//! inventories.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use lattice_pipeline_domain::value_objects::{InputSourceState, ProjectId, SampleExtents};
use lattice_pipeline_domain::{Project, ProjectRepository, SchedulerError};

/// SQLite-backed project repository.
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Project, SchedulerError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| SchedulerError::database_error(format!("Failed to read project id: {}", e)))?;
        let name: String = row
            .try_get("name")
            .map_err(|e| SchedulerError::database_error(format!("Failed to read project name: {}", e)))?;
        let root_path: String = row
            .try_get("root_path")
            .map_err(|e| SchedulerError::database_error(format!("Failed to read project root: {}", e)))?;
        let state: String = row
            .try_get("input_source_state")
            .map_err(|e| SchedulerError::database_error(format!("Failed to read input source state: {}", e)))?;
        let exit_requested: bool = row
            .try_get("exit_requested")
            .map_err(|e| SchedulerError::database_error(format!("Failed to read exit flag: {}", e)))?;

        let extents = SampleExtents::new(
            row.try_get("minimum_x")
                .map_err(|e| SchedulerError::database_error(format!("Failed to read extents: {}", e)))?,
            row.try_get("maximum_x")
                .map_err(|e| SchedulerError::database_error(format!("Failed to read extents: {}", e)))?,
            row.try_get("minimum_y")
                .map_err(|e| SchedulerError::database_error(format!("Failed to read extents: {}", e)))?,
            row.try_get("maximum_y")
                .map_err(|e| SchedulerError::database_error(format!("Failed to read extents: {}", e)))?,
            row.try_get("minimum_z")
                .map_err(|e| SchedulerError::database_error(format!("Failed to read extents: {}", e)))?,
            row.try_get("maximum_z")
                .map_err(|e| SchedulerError::database_error(format!("Failed to read extents: {}", e)))?,
        );

        Ok(Project::from_persistence(
            ProjectId::parse(&id)?,
            name,
            root_path,
            extents,
            InputSourceState::from_str(&state)?,
            exit_requested,
        ))
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn list_all(&self) -> Result<Vec<Project>, SchedulerError> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to list projects: {}", e)))?;

        rows.iter().map(Self::project_from_row).collect()
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, SchedulerError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to query project: {}", e)))?;

        row.as_ref().map(Self::project_from_row).transpose()
    }

    async fn update_sample_extents(
        &self,
        id: ProjectId,
        extents: &SampleExtents,
    ) -> Result<(), SchedulerError> {
        let result = sqlx::query(
            "UPDATE projects SET minimum_x = ?, maximum_x = ?, minimum_y = ?, maximum_y = ?, \
             minimum_z = ?, maximum_z = ? WHERE id = ?",
        )
        .bind(extents.minimum_x)
        .bind(extents.maximum_x)
        .bind(extents.minimum_y)
        .bind(extents.maximum_y)
        .bind(extents.minimum_z)
        .bind(extents.maximum_z)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| SchedulerError::database_error(format!("Failed to update extents: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(SchedulerError::ProjectNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::schema::memory_pool;

    async fn seed_project(pool: &SqlitePool, id: ProjectId, name: &str, exit_requested: bool) {
        sqlx::query(
            "INSERT INTO projects (id, name, root_path, input_source_state, exit_requested) \
             VALUES (?, ?, ?, 'unknown', ?)",
        )
        .bind(id.to_string())
        .bind(name)
        .bind("/groups/sample")
        .bind(exit_requested)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_and_find() {
        let pool = memory_pool().await;
        let id = ProjectId::new();
        seed_project(&pool, id, "sample-a", false).await;

        let repo = SqliteProjectRepository::new(pool);
        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name(), "sample-a");

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id(), id);
        assert_eq!(found.input_source_state(), InputSourceState::Unknown);
        assert!(!found.exit_requested());
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let pool = memory_pool().await;
        let repo = SqliteProjectRepository::new(pool);
        assert!(repo.find_by_id(ProjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_extents_round_trip() {
        let pool = memory_pool().await;
        let id = ProjectId::new();
        seed_project(&pool, id, "sample-b", false).await;

        let repo = SqliteProjectRepository::new(pool);
        let extents = SampleExtents::new(0.0, 100.0, 0.0, 200.0, 0.0, 50.0);
        repo.update_sample_extents(id, &extents).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.sample_extents(), &extents);
    }

    #[tokio::test]
    async fn test_update_extents_unknown_project() {
        let pool = memory_pool().await;
        let repo = SqliteProjectRepository::new(pool);
        let err = repo
            .update_sample_extents(ProjectId::new(), &SampleExtents::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::ProjectNotFound(_)));
    }

    #[tokio::test]
    async fn test_exit_requested_survives_round_trip() {
        let pool = memory_pool().await;
        let id = ProjectId::new();
        seed_project(&pool, id, "sample-c", true).await;

        let repo = SqliteProjectRepository::new(pool);
        assert!(repo.find_by_id(id).await.unwrap().unwrap().exit_requested());
    }
}
