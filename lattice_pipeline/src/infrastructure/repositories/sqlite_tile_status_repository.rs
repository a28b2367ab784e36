// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Tile Status Repository
//!
//! SQLite implementation of the `TileStatusRepository` port. Each batch
//! method runs inside one transaction, so a failed ingestor tick leaves no
//! half-applied bucket; the composite primary key
//! `(project_id, relative_path)` enforces the per-project path uniqueness
//! invariant at the storage layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use lattice_pipeline_domain::value_objects::{
    LatticeCoordinates, ProjectId, StageStatus, TileRelativePath,
};
use lattice_pipeline_domain::{SchedulerError, TileStatusRepository, TileStatusRecord};

/// SQLite-backed tile-status repository.
pub struct SqliteTileStatusRepository {
    pool: SqlitePool,
}

impl SqliteTileStatusRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TileStatusRecord, SchedulerError> {
        let db_err = |e: sqlx::Error| SchedulerError::database_error(format!("Failed to read tile row: {}", e));

        let relative_path: String = row.try_get("relative_path").map_err(db_err)?;
        let prev_code: i32 = row.try_get("prev_stage_status").map_err(db_err)?;
        let this_code: i32 = row.try_get("this_stage_status").map_err(db_err)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_err)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(db_err)?;

        Ok(TileStatusRecord {
            relative_path: TileRelativePath::new(relative_path),
            index: row.try_get("tile_index").map_err(db_err)?,
            tile_name: row.try_get("tile_name").map_err(db_err)?,
            prev_stage_status: StageStatus::from_code(prev_code)?,
            this_stage_status: StageStatus::from_code(this_code)?,
            lattice_position: LatticeCoordinates::new(
                row.try_get("lat_x").map_err(db_err)?,
                row.try_get("lat_y").map_err(db_err)?,
                row.try_get("lat_z").map_err(db_err)?,
            ),
            lattice_step: LatticeCoordinates::new(
                row.try_get("step_x").map_err(db_err)?,
                row.try_get("step_y").map_err(db_err)?,
                row.try_get("step_z").map_err(db_err)?,
            ),
            duration: row.try_get("duration").map_err(db_err)?,
            cpu_high: row.try_get("cpu_high").map_err(db_err)?,
            memory_high: row.try_get("memory_high").map_err(db_err)?,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl TileStatusRepository for SqliteTileStatusRepository {
    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TileStatusRecord>, SchedulerError> {
        let rows = sqlx::query("SELECT * FROM tile_status WHERE project_id = ? ORDER BY rowid")
            .bind(project_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to list tile status: {}", e)))?;

        rows.iter().map(Self::record_from_row).collect()
    }

    async fn insert_batch(
        &self,
        project_id: ProjectId,
        rows: &[TileStatusRecord],
    ) -> Result<(), SchedulerError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to begin insert transaction: {}", e)))?;

        for record in rows {
            sqlx::query(
                "INSERT INTO tile_status (project_id, relative_path, tile_index, tile_name, \
                 prev_stage_status, this_stage_status, lat_x, lat_y, lat_z, step_x, step_y, step_z, \
                 duration, cpu_high, memory_high, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(project_id.to_string())
            .bind(record.relative_path.as_str())
            .bind(record.index)
            .bind(&record.tile_name)
            .bind(record.prev_stage_status.code())
            .bind(record.this_stage_status.code())
            .bind(record.lattice_position.x)
            .bind(record.lattice_position.y)
            .bind(record.lattice_position.z)
            .bind(record.lattice_step.x)
            .bind(record.lattice_step.y)
            .bind(record.lattice_step.z)
            .bind(record.duration)
            .bind(record.cpu_high)
            .bind(record.memory_high)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                SchedulerError::database_error(format!(
                    "Failed to insert tile {}: {}",
                    record.relative_path, e
                ))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to commit insert batch: {}", e)))
    }

    async fn update_batch(
        &self,
        project_id: ProjectId,
        rows: &[TileStatusRecord],
    ) -> Result<(), SchedulerError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to begin update transaction: {}", e)))?;

        for record in rows {
            sqlx::query(
                "UPDATE tile_status SET tile_index = ?, tile_name = ?, prev_stage_status = ?, \
                 this_stage_status = ?, lat_x = ?, lat_y = ?, lat_z = ?, step_x = ?, step_y = ?, \
                 step_z = ?, updated_at = ? WHERE project_id = ? AND relative_path = ?",
            )
            .bind(record.index)
            .bind(&record.tile_name)
            .bind(record.prev_stage_status.code())
            .bind(record.this_stage_status.code())
            .bind(record.lattice_position.x)
            .bind(record.lattice_position.y)
            .bind(record.lattice_position.z)
            .bind(record.lattice_step.x)
            .bind(record.lattice_step.y)
            .bind(record.lattice_step.z)
            .bind(record.updated_at)
            .bind(project_id.to_string())
            .bind(record.relative_path.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                SchedulerError::database_error(format!(
                    "Failed to update tile {}: {}",
                    record.relative_path, e
                ))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to commit update batch: {}", e)))
    }

    async fn delete_batch(
        &self,
        project_id: ProjectId,
        paths: &[TileRelativePath],
    ) -> Result<(), SchedulerError> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to begin delete transaction: {}", e)))?;

        for path in paths {
            sqlx::query("DELETE FROM tile_status WHERE project_id = ? AND relative_path = ?")
                .bind(project_id.to_string())
                .bind(path.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| SchedulerError::database_error(format!("Failed to delete tile {}: {}", path, e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| SchedulerError::database_error(format!("Failed to commit delete batch: {}", e)))
    }
}
