// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Local Control Plane Adapter
//!
//! `ControlPlane` implementation that persists input-source classifications
//! straight into the local project table. The HTTP control plane owns
//! project records; in deployments where this core shares its database, the
//! publication is a local UPDATE rather than an API round trip.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use lattice_pipeline_domain::value_objects::{InputSourceState, ProjectId};
use lattice_pipeline_domain::{ControlPlane, SchedulerError};

/// Database-backed control-plane write port.
pub struct LocalControlPlane {
    pool: SqlitePool,
}

impl LocalControlPlane {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ControlPlane for LocalControlPlane {
    async fn update_project(
        &self,
        project_id: ProjectId,
        state: InputSourceState,
    ) -> Result<(), SchedulerError> {
        let result = sqlx::query("UPDATE projects SET input_source_state = ? WHERE id = ?")
            .bind(state.as_str())
            .bind(project_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to publish input state: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(SchedulerError::ProjectNotFound(project_id.to_string()));
        }

        debug!(project = %project_id, state = %state, "published input source state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::schema::memory_pool;
    use crate::infrastructure::repositories::SqliteProjectRepository;
    use lattice_pipeline_domain::ProjectRepository;

    #[tokio::test]
    async fn test_update_project_publishes_state() {
        let pool = memory_pool().await;
        let id = ProjectId::new();
        sqlx::query("INSERT INTO projects (id, name, root_path) VALUES (?, 'p', '/data/p')")
            .bind(id.to_string())
            .execute(&pool)
            .await
            .unwrap();

        let control_plane = LocalControlPlane::new(pool.clone());
        control_plane
            .update_project(id, InputSourceState::Pipeline)
            .await
            .unwrap();

        let repo = SqliteProjectRepository::new(pool);
        let project = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(project.input_source_state(), InputSourceState::Pipeline);
    }

    #[tokio::test]
    async fn test_update_unknown_project_fails() {
        let pool = memory_pool().await;
        let control_plane = LocalControlPlane::new(pool);
        let err = control_plane
            .update_project(ProjectId::new(), InputSourceState::Missing)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulerError::ProjectNotFound(_)));
    }
}
