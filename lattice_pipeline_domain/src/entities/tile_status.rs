// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tile Status Record
//!
//! The persisted per-tile row of the stage-zero status table. It extends the
//! canonical tile with the stage status pair, cumulative execution
//! aggregates, and the timestamps the mux maintains.
//!
//! ## Lifecycle
//!
//! Rows are created on first observation of a tile in an inventory
//! (`TileStatusRecord::from_inventory`), merged with later inventory state
//! when the mux detects a status change (`merge_inventory`), and deleted
//! only when absent from inventory and the mass-deletion guard permits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Tile;
use crate::value_objects::{LatticeCoordinates, StageStatus, TileRelativePath};

/// One persisted stage-zero tile-status row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileStatusRecord {
    pub relative_path: TileRelativePath,
    pub index: Option<i64>,
    pub tile_name: String,
    pub prev_stage_status: StageStatus,
    pub this_stage_status: StageStatus,
    pub lattice_position: LatticeCoordinates,
    pub lattice_step: LatticeCoordinates,
    /// Cumulative wall-clock seconds spent executing tasks for this tile
    pub duration: f64,
    /// High-water CPU percentage across executions
    pub cpu_high: f64,
    /// High-water memory in megabytes across executions
    pub memory_high: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TileStatusRecord {
    /// Creates a fresh row for a tile observed for the first time.
    ///
    /// Aggregates start at zero and both timestamps are set to `now`.
    pub fn from_inventory(tile: &Tile, now: DateTime<Utc>) -> Self {
        let status = tile.stage_status();
        Self {
            relative_path: tile.relative_path().clone(),
            index: tile.index(),
            tile_name: tile.tile_name().to_string(),
            prev_stage_status: status,
            this_stage_status: status,
            lattice_position: *tile.lattice_position(),
            lattice_step: *tile.lattice_step(),
            duration: 0.0,
            cpu_high: 0.0,
            memory_high: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges fresh inventory state into an existing row.
    ///
    /// Overwrites the tile name, index, status pair, and lattice
    /// position/step from the inventory tile and advances `updated_at`.
    /// Aggregates and `created_at` are preserved.
    pub fn merge_inventory(&self, tile: &Tile, now: DateTime<Utc>) -> Self {
        let status = tile.stage_status();
        Self {
            relative_path: self.relative_path.clone(),
            index: tile.index(),
            tile_name: tile.tile_name().to_string(),
            prev_stage_status: status,
            this_stage_status: status,
            lattice_position: *tile.lattice_position(),
            lattice_step: *tile.lattice_step(),
            duration: self.duration,
            cpu_high: self.cpu_high,
            memory_high: self.memory_high,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}
