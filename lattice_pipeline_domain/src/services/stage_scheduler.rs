// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Scheduler Capability Set
//!
//! Every per-stage scheduler shares this interface. The stage-zero
//! implementation (the project input ingestor) is one variant among several;
//! downstream stages implement the same contract around task dispatch.
//!
//! The scheduler hub routes completion records through
//! `on_task_execution_complete`; the supervisor drives `refresh_tile_status`
//! on the stage's cadence.

use async_trait::async_trait;

use crate::entities::{TaskExecutionReport, Tile, TileStatusRecord};
use crate::services::tile_mux::MuxOutcome;
use crate::SchedulerError;

/// Capability set shared by all per-stage schedulers.
#[async_trait]
pub trait StageScheduler: Send + Sync {
    /// The pipeline stage this scheduler owns
    fn pipeline_stage_id(&self) -> i64;

    /// Refreshes the stage's persisted tile-status table from its input
    /// source. For stage zero this is one full ingestor tick.
    async fn refresh_tile_status(&self) -> Result<(), SchedulerError>;

    /// Diffs parsed input tiles against the stage's persisted output vector.
    ///
    /// Pure; implementations must not touch storage here.
    fn mux_input_output_tiles(&self, input: &[Tile], output: &[TileStatusRecord]) -> MuxOutcome;

    /// Handles one task-execution completion record.
    ///
    /// Returns `Ok(true)` when the record was handled and may be
    /// acknowledged, `Ok(false)` when the scheduler refuses it for now (the
    /// dispatcher retries later). Must be idempotent per
    /// (record id, stage id): broker redelivery can present the same record
    /// more than once.
    async fn on_task_execution_complete(
        &self,
        report: &TaskExecutionReport,
    ) -> Result<bool, SchedulerError>;
}
