// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Inventory Writer
//!
//! Persists the last-accepted canonical tile vector as a recovery snapshot
//! at the project root. After every successful parse (including an empty
//! inventory from a present document) the writer rotates:
//!
//! 1. Existing `pipeline-storage.json` is copied over
//!    `pipeline-storage.json.last`, overwriting any prior backup
//! 2. `pipeline-storage.json` is removed
//! 3. The fresh tile vector is written as `pipeline-storage.json`
//!
//! The steps are not atomic as a group; after a crash either file may be
//! present, and the next successful tick makes the latest state observable
//! again.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use lattice_pipeline_domain::value_objects::{LatticeCoordinates, StageStatus};
use lattice_pipeline_domain::{SchedulerError, Tile};

/// Most recent canonical inventory snapshot
pub const STORAGE_FILENAME: &str = "pipeline-storage.json";
/// Previous snapshot, retained across rotations
pub const STORAGE_BACKUP_FILENAME: &str = "pipeline-storage.json.last";

/// One snapshot record; the on-disk shape of a canonical tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotTile {
    relative_path: String,
    index: Option<i64>,
    tile_name: String,
    prev_stage_status: StageStatus,
    this_stage_status: StageStatus,
    lat_x: Option<f64>,
    lat_y: Option<f64>,
    lat_z: Option<f64>,
    step_x: Option<f64>,
    step_y: Option<f64>,
    step_z: Option<f64>,
}

impl From<&Tile> for SnapshotTile {
    fn from(tile: &Tile) -> Self {
        let status = tile.stage_status();
        Self {
            relative_path: tile.relative_path().as_str().to_string(),
            index: tile.index(),
            tile_name: tile.tile_name().to_string(),
            prev_stage_status: status,
            this_stage_status: status,
            lat_x: tile.lattice_position().x,
            lat_y: tile.lattice_position().y,
            lat_z: tile.lattice_position().z,
            step_x: tile.lattice_step().x,
            step_y: tile.lattice_step().y,
            step_z: tile.lattice_step().z,
        }
    }
}

impl From<SnapshotTile> for Tile {
    fn from(record: SnapshotTile) -> Self {
        Tile::new(
            &record.relative_path,
            record.index,
            LatticeCoordinates::new(record.lat_x, record.lat_y, record.lat_z),
            LatticeCoordinates::new(record.step_x, record.step_y, record.step_z),
            record.this_stage_status == StageStatus::Complete,
        )
    }
}

/// Rotates and writes the per-project inventory snapshot.
pub struct InventoryWriter;

impl InventoryWriter {
    /// Writes `tiles` as the fresh snapshot at `root`, rotating the
    /// previous snapshot to the backup file first.
    pub async fn write_snapshot(root: &Path, tiles: &[Tile]) -> Result<(), SchedulerError> {
        let storage = root.join(STORAGE_FILENAME);
        let backup = root.join(STORAGE_BACKUP_FILENAME);

        if tokio::fs::metadata(&storage).await.is_ok() {
            tokio::fs::copy(&storage, &backup).await.map_err(|e| {
                SchedulerError::io_error(format!("failed to rotate snapshot to {}: {}", backup.display(), e))
            })?;
            tokio::fs::remove_file(&storage).await.map_err(|e| {
                SchedulerError::io_error(format!("failed to remove stale snapshot {}: {}", storage.display(), e))
            })?;
        }

        let records: Vec<SnapshotTile> = tiles.iter().map(SnapshotTile::from).collect();
        let payload = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(&storage, payload).await.map_err(|e| {
            SchedulerError::io_error(format!("failed to write snapshot {}: {}", storage.display(), e))
        })?;

        debug!(path = %storage.display(), tiles = tiles.len(), "wrote inventory snapshot");
        Ok(())
    }

    /// Reads a previously written snapshot back into the canonical tile
    /// vector. Used for recovery after restarts.
    pub async fn read_snapshot(root: &Path) -> Result<Vec<Tile>, SchedulerError> {
        let storage = root.join(STORAGE_FILENAME);
        let payload = tokio::fs::read(&storage).await.map_err(|e| {
            SchedulerError::io_error(format!("failed to read snapshot {}: {}", storage.display(), e))
        })?;
        let records: Vec<SnapshotTile> = serde_json::from_slice(&payload)
            .map_err(|e| SchedulerError::parse_error(format!("malformed snapshot: {}", e)))?;
        Ok(records.into_iter().map(Tile::from).collect())
    }
}
