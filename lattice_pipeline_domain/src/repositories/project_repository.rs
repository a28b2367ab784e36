// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Project Repository Interface
//!
//! Read/update access to the project table. Projects are created by the
//! control plane (out of scope here); the scheduling core lists them to
//! spawn ingestors, re-reads them at tick boundaries to observe
//! `exit_requested` and root-path changes, and flushes sample extents
//! parsed from inventories.

use async_trait::async_trait;

use crate::entities::Project;
use crate::value_objects::{ProjectId, SampleExtents};
use crate::SchedulerError;

/// Repository interface for project persistence.
///
/// Implementations must be thread-safe (`Send + Sync`); the pool is shared
/// across ingestors.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Lists every registered project
    async fn list_all(&self) -> Result<Vec<Project>, SchedulerError>;

    /// Finds a project by id
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, SchedulerError>;

    /// Flushes freshly parsed sample extents for a project
    async fn update_sample_extents(
        &self,
        id: ProjectId,
        extents: &SampleExtents,
    ) -> Result<(), SchedulerError>;
}
