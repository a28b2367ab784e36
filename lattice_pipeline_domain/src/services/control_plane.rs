// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Port to the project control plane. The scheduling core calls exactly one
//! method: publishing the input-source classification produced by an
//! ingestor pass. Everything else about projects is read from the local
//! database.

use async_trait::async_trait;

use crate::value_objects::{InputSourceState, ProjectId};
use crate::SchedulerError;

/// Write-side port to the control plane owning project records.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Persists the input-source classification for a project
    async fn update_project(
        &self,
        project_id: ProjectId,
        state: InputSourceState,
    ) -> Result<(), SchedulerError>;
}
