// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Project Ingestor
//!
//! The stage-zero scheduler: one periodic worker per project that keeps the
//! persisted tile-status table synchronized with the inventory document at
//! the project root.
//!
//! ## One tick
//!
//! 1. Re-read the project (fresh root path, `exit_requested`)
//! 2. Map the root, classify the input source, publish the classification
//!    to the control plane
//! 3. Parse the selected document; malformed documents skip the tick and
//!    leave table and snapshot untouched
//! 4. Flush parsed extents to persistence before tile processing
//! 5. Mux inventory against the persisted vector; a mass-deletion guard
//!    trip skips the tick without any disk or database writes
//! 6. Apply the plan bucket by bucket (inserts, then updates, then deletes),
//!    one transaction per bucket
//! 7. Write the inventory snapshot
//!
//! Ticks never overlap for one project: the loop is strictly serial and
//! sleeps between passes. Distinct projects run in parallel and share only
//! the database pool. A recoverable tick failure is logged and retried on
//! the next tick; the loop itself keeps running until `exit_requested` or
//! process shutdown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use async_trait::async_trait;
use lattice_pipeline_bootstrap::CancellationToken;
use lattice_pipeline_domain::services::tile_mux::MuxOutcome;
use lattice_pipeline_domain::value_objects::ProjectId;
use lattice_pipeline_domain::{
    Clock, ControlPlane, Project, ProjectRepository, SchedulerError, StageScheduler,
    TaskExecutionReport, Tile, TileMuxer, TileStatusRecord, TileStatusRepository,
};

use crate::infrastructure::adapters::{InventoryReader, InventoryWriter, PathMapper};
use crate::infrastructure::metrics::MetricsService;

/// Stage id of the inventory-synchronization stage
pub const STAGE_ZERO_ID: i64 = 0;

/// Stage-zero scheduler: periodic inventory ingestion for one project.
pub struct ProjectIngestor {
    project_id: ProjectId,
    projects: Arc<dyn ProjectRepository>,
    tiles: Arc<dyn TileStatusRepository>,
    control_plane: Arc<dyn ControlPlane>,
    path_mapper: Arc<PathMapper>,
    muxer: TileMuxer,
    metrics: Arc<MetricsService>,
    tick_interval: Duration,
    shutdown: CancellationToken,
}

impl ProjectIngestor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        project_id: ProjectId,
        projects: Arc<dyn ProjectRepository>,
        tiles: Arc<dyn TileStatusRepository>,
        control_plane: Arc<dyn ControlPlane>,
        path_mapper: Arc<PathMapper>,
        clock: Arc<dyn Clock>,
        metrics: Arc<MetricsService>,
        tick_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            project_id,
            projects,
            tiles,
            control_plane,
            path_mapper,
            muxer: TileMuxer::new(clock),
            metrics,
            tick_interval,
            shutdown,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Drives ticks until the project requests exit, the project vanishes,
    /// or shutdown is initiated. The in-flight tick always completes before
    /// the loop returns.
    pub async fn run(&self) -> Result<(), SchedulerError> {
        info!(project = %self.project_id, "project ingestor starting");
        self.metrics.increment_active_ingestors();

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            match self.projects.find_by_id(self.project_id).await {
                Err(e) => {
                    // Recoverable: the next tick re-reads the project.
                    warn!(project = %self.project_id, error = %e, "failed to load project, skipping tick");
                }
                Ok(None) => {
                    warn!(project = %self.project_id, "project no longer exists, stopping ingestor");
                    break;
                }
                Ok(Some(project)) if project.exit_requested() => {
                    info!(project = %self.project_id, "exit requested, stopping ingestor");
                    break;
                }
                Ok(Some(project)) => {
                    if let Err(e) = self.tick(&project).await {
                        warn!(project = %self.project_id, error = %e, "ingestor tick failed, will retry");
                    }
                }
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.tick_interval) => {}
            }
        }

        self.metrics.decrement_active_ingestors();
        info!(project = %self.project_id, "project ingestor stopped");
        Ok(())
    }

    /// One full ingestor pass for the given project snapshot.
    pub async fn tick(&self, project: &Project) -> Result<(), SchedulerError> {
        self.metrics.increment_ingestor_ticks();

        let mapped_root = PathBuf::from(self.path_mapper.map(project.root_path()));
        let classification = InventoryReader::classify(&mapped_root).await;
        self.control_plane
            .update_project(project.id(), classification.state)
            .await?;

        let Some(document) = classification.document else {
            debug!(
                project = %self.project_id,
                state = %classification.state,
                "no inventory document, skipping tick"
            );
            return Ok(());
        };

        let parsed = match InventoryReader::parse_document(&document).await {
            Ok(parsed) => parsed,
            Err(e) => {
                // Malformed inventory: table and snapshot stay untouched.
                warn!(
                    project = %self.project_id,
                    document = %document.display(),
                    error = %e,
                    "unparseable inventory, skipping tick"
                );
                return Ok(());
            }
        };

        if let Some(extents) = &parsed.extents {
            if project.sample_extents() != extents {
                self.projects.update_sample_extents(project.id(), extents).await?;
                debug!(project = %self.project_id, "flushed sample extents");
            }
        }

        let persisted = self.tiles.list_for_project(project.id()).await?;

        match self.muxer.mux(&parsed.tiles, &persisted) {
            MuxOutcome::GuardTripped {
                persisted: persisted_count,
                parsed: parsed_count,
            } => {
                warn!(
                    project = %self.project_id,
                    persisted = persisted_count,
                    parsed = parsed_count,
                    "mass-deletion guard tripped, skipping tick"
                );
                self.metrics.increment_guard_trips();
                Ok(())
            }
            MuxOutcome::Plan(plan) => {
                self.tiles.insert_batch(project.id(), &plan.to_insert).await?;
                self.tiles.update_batch(project.id(), &plan.to_update).await?;
                self.tiles.delete_batch(project.id(), &plan.to_delete).await?;
                self.metrics.record_plan_applied(
                    plan.to_insert.len(),
                    plan.to_update.len(),
                    plan.to_delete.len(),
                );

                InventoryWriter::write_snapshot(&mapped_root, &parsed.tiles).await?;

                debug!(
                    project = %self.project_id,
                    inserted = plan.to_insert.len(),
                    updated = plan.to_update.len(),
                    deleted = plan.to_delete.len(),
                    "ingestor tick applied"
                );
                Ok(())
            }
        }
    }
}

#[async_trait]
impl StageScheduler for ProjectIngestor {
    fn pipeline_stage_id(&self) -> i64 {
        STAGE_ZERO_ID
    }

    async fn refresh_tile_status(&self) -> Result<(), SchedulerError> {
        let project = self
            .projects
            .find_by_id(self.project_id)
            .await?
            .ok_or_else(|| SchedulerError::ProjectNotFound(self.project_id.to_string()))?;
        self.tick(&project).await
    }

    fn mux_input_output_tiles(&self, input: &[Tile], output: &[TileStatusRecord]) -> MuxOutcome {
        self.muxer.mux(input, output)
    }

    async fn on_task_execution_complete(
        &self,
        report: &TaskExecutionReport,
    ) -> Result<bool, SchedulerError> {
        // Stage zero dispatches no tasks; a record routed here carries no
        // bookkeeping to apply, so handling is trivially idempotent.
        debug!(
            project = %self.project_id,
            execution_id = report.id,
            "stage zero received completion record"
        );
        Ok(true)
    }
}
