// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ingestor Integration Tests
//!
//! Drives full ingestor ticks against real inventory files in temporary
//! directories and in-memory persistence ports: source classification,
//! both inventory formats, the mass-deletion guard, snapshot rotation, and
//! loop termination.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use lattice_pipeline_bootstrap::CancellationToken;
use lattice_pipeline_domain::value_objects::{InputSourceState, LatticeCoordinates, StageStatus};
use lattice_pipeline_domain::{
    Clock, FixedClock, Project, ProjectId, StageScheduler, Tile, TileStatusRecord,
};

use lattice_pipeline::application::services::ProjectIngestor;
use lattice_pipeline::infrastructure::adapters::PathMapper;
use lattice_pipeline::infrastructure::config::PathMapping;
use lattice_pipeline::infrastructure::metrics::MetricsService;

use super::common::{InMemoryProjectRepository, InMemoryTileStatusRepository, RecordingControlPlane};

const STORAGE_FILENAME: &str = "pipeline-storage.json";
const STORAGE_BACKUP_FILENAME: &str = "pipeline-storage.json.last";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn t1() -> DateTime<Utc> {
    t0() + chrono::Duration::minutes(10)
}

struct Harness {
    ingestor: ProjectIngestor,
    projects: Arc<InMemoryProjectRepository>,
    tiles: Arc<InMemoryTileStatusRepository>,
    control_plane: Arc<RecordingControlPlane>,
    project_id: ProjectId,
}

impl Harness {
    fn new(root_path: &str, mappings: Vec<PathMapping>) -> Self {
        let project_id = ProjectId::new();
        let project = Project::new(project_id, "integration-sample", root_path);

        let projects = Arc::new(InMemoryProjectRepository::with_project(project));
        let tiles = Arc::new(InMemoryTileStatusRepository::default());
        let control_plane = Arc::new(RecordingControlPlane::default());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(t1()));

        let ingestor = ProjectIngestor::new(
            project_id,
            projects.clone(),
            tiles.clone(),
            control_plane.clone(),
            Arc::new(PathMapper::new(mappings)),
            clock,
            Arc::new(MetricsService::new().unwrap()),
            Duration::from_millis(10),
            CancellationToken::standalone(),
        );

        Self {
            ingestor,
            projects,
            tiles,
            control_plane,
            project_id,
        }
    }

    fn at_root(root: &Path) -> Self {
        Self::new(root.to_str().unwrap(), Vec::new())
    }

    async fn tick(&self) {
        let project = self.projects.get(self.project_id).unwrap();
        self.ingestor.tick(&project).await.unwrap();
    }

    fn seed_incomplete(&self, paths: &[&str]) {
        let rows: Vec<TileStatusRecord> = paths
            .iter()
            .map(|p| {
                let tile = Tile::new(*p, None, LatticeCoordinates::empty(), LatticeCoordinates::empty(), false);
                TileStatusRecord::from_inventory(&tile, t0())
            })
            .collect();
        self.tiles.seed(self.project_id, rows);
    }
}

async fn write_inventory(root: &Path, name: &str, payload: String) {
    tokio::fs::write(root.join(name), payload).await.unwrap();
}

fn pipeline_inventory_of(count: usize) -> String {
    let tiles: Vec<serde_json::Value> = (0..count)
        .map(|i| serde_json::json!({"id": i, "relativePath": format!("t/{}.tif", i), "isComplete": false}))
        .collect();
    serde_json::json!({"pipelineFormat": 1, "tiles": tiles}).to_string()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_first_ingest_inserts_and_snapshots() {
    let dir = TempDir::new().unwrap();
    write_inventory(
        dir.path(),
        "pipeline-input.json",
        serde_json::json!({
            "pipelineFormat": 1,
            "tiles": [
                {"id": 1, "relativePath": "a\\b.tif", "isComplete": false},
                {"id": 2, "relativePath": "c/d.tif", "isComplete": true}
            ]
        })
        .to_string(),
    )
    .await;

    let harness = Harness::at_root(dir.path());
    harness.tick().await;

    assert_eq!(
        harness.control_plane.published(),
        vec![(harness.project_id, InputSourceState::Pipeline)]
    );

    let rows = harness.tiles.snapshot(harness.project_id);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].relative_path.as_str(), "a/b.tif");
    assert_eq!(rows[0].prev_stage_status, StageStatus::Incomplete);
    assert_eq!(rows[0].this_stage_status, StageStatus::Incomplete);
    assert_eq!(rows[1].relative_path.as_str(), "c/d.tif");
    assert_eq!(rows[1].prev_stage_status, StageStatus::Complete);
    assert_eq!(rows[0].created_at, t1());

    assert!(dir.path().join(STORAGE_FILENAME).exists());
}

#[tokio::test]
async fn test_delta_update_advances_status_and_timestamp() {
    let dir = TempDir::new().unwrap();
    write_inventory(
        dir.path(),
        "pipeline-input.json",
        serde_json::json!({
            "pipelineFormat": 1,
            "tiles": [{"id": 1, "relativePath": "x/1.tif", "isComplete": true}]
        })
        .to_string(),
    )
    .await;

    let harness = Harness::at_root(dir.path());
    harness.seed_incomplete(&["x/1.tif"]);
    harness.tick().await;

    let rows = harness.tiles.snapshot(harness.project_id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prev_stage_status, StageStatus::Complete);
    assert_eq!(rows[0].this_stage_status, StageStatus::Complete);
    assert_eq!(rows[0].created_at, t0());
    assert_eq!(rows[0].updated_at, t1());
}

#[tokio::test]
async fn test_missing_root_reclassifies_and_leaves_table_untouched() {
    let harness = Harness::new("/nonexistent/sample/root", Vec::new());
    harness.seed_incomplete(&["kept/1.tif"]);
    harness.tick().await;

    assert_eq!(
        harness.control_plane.last_state(harness.project_id),
        Some(InputSourceState::BadLocation)
    );
    let rows = harness.tiles.snapshot(harness.project_id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].updated_at, t0());
}

#[tokio::test]
async fn test_empty_root_is_missing_without_snapshot() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::at_root(dir.path());
    harness.tick().await;

    assert_eq!(
        harness.control_plane.last_state(harness.project_id),
        Some(InputSourceState::Missing)
    );
    assert!(!dir.path().join(STORAGE_FILENAME).exists());
}

#[tokio::test]
async fn test_guard_trip_leaves_table_and_snapshot_untouched() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path(), "pipeline-input.json", pipeline_inventory_of(100)).await;

    let harness = Harness::at_root(dir.path());
    // Seed 1101 distinct paths disjoint from the inventory.
    let paths: Vec<String> = (0..1101).map(|i| format!("old/{}.tif", i)).collect();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    harness.seed_incomplete(&path_refs);

    harness.tick().await;

    // 1101 - 100 = 1001 > 1000: the pass is refused outright.
    assert_eq!(harness.tiles.snapshot(harness.project_id).len(), 1101);
    assert!(!dir.path().join(STORAGE_FILENAME).exists());
}

#[tokio::test]
async fn test_guard_boundary_shrink_of_exactly_1000_applies() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path(), "pipeline-input.json", pipeline_inventory_of(100)).await;

    let harness = Harness::at_root(dir.path());
    let paths: Vec<String> = (0..1100).map(|i| format!("old/{}.tif", i)).collect();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    harness.seed_incomplete(&path_refs);

    harness.tick().await;

    // 1100 - 100 = 1000: applied. Table now mirrors the inventory.
    let rows = harness.tiles.snapshot(harness.project_id);
    assert_eq!(rows.len(), 100);
    assert!(rows.iter().all(|r| r.relative_path.as_str().starts_with("t/")));
    assert!(dir.path().join(STORAGE_FILENAME).exists());
}

#[tokio::test]
async fn test_legacy_dashboard_updates_extents_and_inserts() {
    let dir = TempDir::new().unwrap();
    write_inventory(
        dir.path(),
        "dashboard.json",
        serde_json::json!({
            "monitor": {
                "extents": {"minimumX": 0.0, "maximumX": 50.0, "minimumY": 0.0, "maximumY": 60.0, "minimumZ": 0.0, "maximumZ": 70.0}
            },
            "tileMap": {
                "group": [
                    {"id": 4, "relativePath": "g/t.tif", "contents": {"latticePosition": {"x": 1, "y": 2, "z": 3}, "latticeStep": {"x": 1, "y": 1, "z": 1}}, "isComplete": false}
                ]
            }
        })
        .to_string(),
    )
    .await;

    let harness = Harness::at_root(dir.path());
    harness.tick().await;

    assert_eq!(
        harness.control_plane.last_state(harness.project_id),
        Some(InputSourceState::Dashboard)
    );

    let project = harness.projects.get(harness.project_id).unwrap();
    assert_eq!(project.sample_extents().maximum_y, 60.0);

    let rows = harness.tiles.snapshot(harness.project_id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].index, Some(4));
    assert_eq!(rows[0].lattice_position.z, Some(3.0));
}

#[tokio::test]
async fn test_malformed_inventory_skips_tick() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path(), "pipeline-input.json", "{ definitely not json".to_string()).await;

    let harness = Harness::at_root(dir.path());
    harness.seed_incomplete(&["kept/1.tif"]);
    harness.tick().await;

    // Classification still published, but table and snapshot untouched.
    assert_eq!(
        harness.control_plane.last_state(harness.project_id),
        Some(InputSourceState::Pipeline)
    );
    assert_eq!(harness.tiles.snapshot(harness.project_id).len(), 1);
    assert!(!dir.path().join(STORAGE_FILENAME).exists());
}

#[tokio::test]
async fn test_path_mapping_resolves_remote_root() {
    let dir = TempDir::new().unwrap();
    write_inventory(
        dir.path(),
        "pipeline-input.json",
        serde_json::json!({
            "pipelineFormat": 1,
            "tiles": [{"relativePath": "m/1.tif", "isComplete": false}]
        })
        .to_string(),
    )
    .await;

    let harness = Harness::new(
        "/remote/sample",
        vec![PathMapping {
            remote: "/remote/sample".to_string(),
            local: dir.path().to_str().unwrap().to_string(),
        }],
    );
    harness.tick().await;

    assert_eq!(
        harness.control_plane.last_state(harness.project_id),
        Some(InputSourceState::Pipeline)
    );
    assert_eq!(harness.tiles.snapshot(harness.project_id).len(), 1);
}

#[tokio::test]
async fn test_second_tick_rotates_snapshot() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path(), "pipeline-input.json", pipeline_inventory_of(2)).await;

    let harness = Harness::at_root(dir.path());
    harness.tick().await;
    assert!(dir.path().join(STORAGE_FILENAME).exists());
    assert!(!dir.path().join(STORAGE_BACKUP_FILENAME).exists());

    write_inventory(dir.path(), "pipeline-input.json", pipeline_inventory_of(3)).await;
    harness.tick().await;

    assert!(dir.path().join(STORAGE_FILENAME).exists());
    assert!(dir.path().join(STORAGE_BACKUP_FILENAME).exists());
    assert_eq!(harness.tiles.snapshot(harness.project_id).len(), 3);
}

#[tokio::test]
async fn test_tick_is_idempotent_for_unchanged_inventory() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path(), "pipeline-input.json", pipeline_inventory_of(5)).await;

    let harness = Harness::at_root(dir.path());
    harness.tick().await;
    let first = harness.tiles.snapshot(harness.project_id);

    harness.tick().await;
    let second = harness.tiles.snapshot(harness.project_id);

    // Mux minimality: nothing changed, so nothing was rewritten.
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_run_stops_when_exit_requested() {
    let dir = TempDir::new().unwrap();
    let harness = Harness::at_root(dir.path());

    let mut project = harness.projects.get(harness.project_id).unwrap();
    project.request_exit();
    harness.projects.put(project);

    tokio::time::timeout(Duration::from_secs(1), harness.ingestor.run())
        .await
        .expect("run must return at the tick boundary")
        .unwrap();
}

#[tokio::test]
async fn test_refresh_tile_status_through_scheduler_interface() {
    let dir = TempDir::new().unwrap();
    write_inventory(dir.path(), "pipeline-input.json", pipeline_inventory_of(1)).await;

    let harness = Harness::at_root(dir.path());
    let scheduler: &dyn StageScheduler = &harness.ingestor;

    scheduler.refresh_tile_status().await.unwrap();
    assert_eq!(harness.tiles.snapshot(harness.project_id).len(), 1);
}
