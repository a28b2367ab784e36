// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tile Status Repository Interface
//!
//! Access to a project's persisted stage-zero tile-status table. The table
//! is mutated only by the owning project's ingestor, which applies a mux
//! plan bucket by bucket; each batch method must be atomic so a failed tick
//! leaves no half-applied bucket.

use async_trait::async_trait;

use crate::entities::TileStatusRecord;
use crate::value_objects::{ProjectId, TileRelativePath};
use crate::SchedulerError;

/// Repository interface for per-project tile-status rows.
///
/// `relative_path` is unique within a project; implementations must enforce
/// it.
#[async_trait]
pub trait TileStatusRepository: Send + Sync {
    /// Loads the full persisted tile vector for a project, in insertion
    /// order
    async fn list_for_project(&self, project_id: ProjectId)
        -> Result<Vec<TileStatusRecord>, SchedulerError>;

    /// Inserts a batch of fresh rows in one transaction
    async fn insert_batch(
        &self,
        project_id: ProjectId,
        rows: &[TileStatusRecord],
    ) -> Result<(), SchedulerError>;

    /// Rewrites a batch of existing rows in one transaction
    async fn update_batch(
        &self,
        project_id: ProjectId,
        rows: &[TileStatusRecord],
    ) -> Result<(), SchedulerError>;

    /// Deletes a batch of rows by relative path in one transaction
    async fn delete_batch(
        &self,
        project_id: ProjectId,
        paths: &[TileRelativePath],
    ) -> Result<(), SchedulerError>;
}
