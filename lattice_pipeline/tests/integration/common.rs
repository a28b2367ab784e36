// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Common Test Helpers
//!
//! In-memory port implementations shared by the integration suites. They
//! honor the same contracts as the SQLite implementations (insertion order,
//! per-project path uniqueness, whole-batch atomicity is trivial in
//! memory).

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use lattice_pipeline_domain::value_objects::{
    InputSourceState, ProjectId, SampleExtents, TileRelativePath,
};
use lattice_pipeline_domain::{
    ControlPlane, Project, ProjectRepository, SchedulerError, TileStatusRecord, TileStatusRepository,
};

/// In-memory project repository.
#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectRepository {
    pub fn with_project(project: Project) -> Self {
        let repo = Self::default();
        repo.projects.lock().insert(project.id(), project);
        repo
    }

    pub fn put(&self, project: Project) {
        self.projects.lock().insert(project.id(), project);
    }

    pub fn get(&self, id: ProjectId) -> Option<Project> {
        self.projects.lock().get(&id).cloned()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list_all(&self) -> Result<Vec<Project>, SchedulerError> {
        Ok(self.projects.lock().values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, SchedulerError> {
        Ok(self.projects.lock().get(&id).cloned())
    }

    async fn update_sample_extents(
        &self,
        id: ProjectId,
        extents: &SampleExtents,
    ) -> Result<(), SchedulerError> {
        let mut projects = self.projects.lock();
        let project = projects
            .get_mut(&id)
            .ok_or_else(|| SchedulerError::ProjectNotFound(id.to_string()))?;
        project.set_sample_extents(*extents);
        Ok(())
    }
}

/// In-memory tile-status repository preserving insertion order per project.
#[derive(Default)]
pub struct InMemoryTileStatusRepository {
    rows: Mutex<HashMap<ProjectId, Vec<TileStatusRecord>>>,
}

impl InMemoryTileStatusRepository {
    pub fn seed(&self, project_id: ProjectId, rows: Vec<TileStatusRecord>) {
        self.rows.lock().insert(project_id, rows);
    }

    pub fn snapshot(&self, project_id: ProjectId) -> Vec<TileStatusRecord> {
        self.rows.lock().get(&project_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TileStatusRepository for InMemoryTileStatusRepository {
    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TileStatusRecord>, SchedulerError> {
        Ok(self.snapshot(project_id))
    }

    async fn insert_batch(
        &self,
        project_id: ProjectId,
        rows: &[TileStatusRecord],
    ) -> Result<(), SchedulerError> {
        let mut table = self.rows.lock();
        let existing = table.entry(project_id).or_default();
        for record in rows {
            if existing.iter().any(|r| r.relative_path == record.relative_path) {
                return Err(SchedulerError::database_error(format!(
                    "duplicate relative path: {}",
                    record.relative_path
                )));
            }
            existing.push(record.clone());
        }
        Ok(())
    }

    async fn update_batch(
        &self,
        project_id: ProjectId,
        rows: &[TileStatusRecord],
    ) -> Result<(), SchedulerError> {
        let mut table = self.rows.lock();
        let existing = table.entry(project_id).or_default();
        for record in rows {
            match existing.iter_mut().find(|r| r.relative_path == record.relative_path) {
                Some(row) => *row = record.clone(),
                None => {
                    return Err(SchedulerError::database_error(format!(
                        "update of unknown path: {}",
                        record.relative_path
                    )))
                }
            }
        }
        Ok(())
    }

    async fn delete_batch(
        &self,
        project_id: ProjectId,
        paths: &[TileRelativePath],
    ) -> Result<(), SchedulerError> {
        let mut table = self.rows.lock();
        let existing = table.entry(project_id).or_default();
        existing.retain(|r| !paths.contains(&r.relative_path));
        Ok(())
    }
}

/// Control plane double recording every published classification.
#[derive(Default)]
pub struct RecordingControlPlane {
    published: Mutex<Vec<(ProjectId, InputSourceState)>>,
}

impl RecordingControlPlane {
    pub fn published(&self) -> Vec<(ProjectId, InputSourceState)> {
        self.published.lock().clone()
    }

    pub fn last_state(&self, project_id: ProjectId) -> Option<InputSourceState> {
        self.published
            .lock()
            .iter()
            .rev()
            .find(|(id, _)| *id == project_id)
            .map(|(_, state)| *state)
    }
}

#[async_trait]
impl ControlPlane for RecordingControlPlane {
    async fn update_project(
        &self,
        project_id: ProjectId,
        state: InputSourceState,
    ) -> Result<(), SchedulerError> {
        self.published.lock().push((project_id, state));
        Ok(())
    }
}
