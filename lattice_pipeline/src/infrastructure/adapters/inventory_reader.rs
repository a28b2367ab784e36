// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Inventory Reader
//!
//! Locates a project's tile-inventory document, classifies the input
//! source, and parses the document into the canonical tile vector.
//!
//! ## Source selection
//!
//! Selection is by file name at the mapped project root, in preference
//! order:
//!
//! 1. Root missing → `BadLocation`, empty inventory
//! 2. `pipeline-input.json` present → `Pipeline`
//! 3. `dashboard.json` present → `Dashboard`
//! 4. Neither present → `Missing`, empty inventory
//!
//! ## Format dispatch
//!
//! Parsing dispatch is by **content**, not by file name: a document with a
//! `pipelineFormat` field parses as the pipeline format, anything else as
//! the legacy dashboard format. The two shapes are made explicit as the
//! [`InventoryDocument`] tagged variant.
//!
//! ## Normalization
//!
//! Every parsed tile gets a POSIX-normalized relative path (identity), the
//! basename as its tile name, all-null defaults for missing position/step
//! objects, and a status pair derived from `isComplete`. Tiles are yielded
//! in document order without deduplication; the mux deduplicates by
//! relative path. Dashboard tile groups are concatenated in lexicographic
//! key order.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use lattice_pipeline_domain::value_objects::{InputSourceState, LatticeCoordinates, SampleExtents};
use lattice_pipeline_domain::{SchedulerError, Tile};

/// Preferred inventory file, produced by the acquisition pipeline
pub const PIPELINE_INPUT_FILENAME: &str = "pipeline-input.json";
/// Legacy inventory file, produced by the acquisition dashboard
pub const DASHBOARD_FILENAME: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtentsDoc {
    minimum_x: f64,
    maximum_x: f64,
    minimum_y: f64,
    maximum_y: f64,
    minimum_z: f64,
    maximum_z: f64,
}

impl From<ExtentsDoc> for SampleExtents {
    fn from(doc: ExtentsDoc) -> Self {
        SampleExtents::new(
            doc.minimum_x,
            doc.maximum_x,
            doc.minimum_y,
            doc.maximum_y,
            doc.minimum_z,
            doc.maximum_z,
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CoordinatesDoc {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

fn coordinates_from_doc(doc: Option<CoordinatesDoc>) -> LatticeCoordinates {
    match doc {
        Some(c) => LatticeCoordinates::new(c.x, c.y, c.z),
        None => LatticeCoordinates::empty(),
    }
}

/// One tile record of the pipeline format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelineTileDoc {
    #[serde(default)]
    id: Option<i64>,
    relative_path: String,
    #[serde(default)]
    position: Option<CoordinatesDoc>,
    #[serde(default)]
    step: Option<CoordinatesDoc>,
    #[serde(default)]
    is_complete: bool,
}

/// Pipeline-format inventory document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDocument {
    /// Presence of this field is the dispatch sentinel; its value is unused
    #[allow(dead_code)]
    pipeline_format: serde_json::Value,
    #[serde(default)]
    extents: Option<ExtentsDoc>,
    #[serde(default)]
    tiles: Vec<PipelineTileDoc>,
}

/// One tile record of the dashboard format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardTileDoc {
    #[serde(default)]
    id: Option<i64>,
    relative_path: String,
    #[serde(default)]
    contents: Option<DashboardTileContentsDoc>,
    #[serde(default)]
    is_complete: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardTileContentsDoc {
    #[serde(default)]
    lattice_position: Option<CoordinatesDoc>,
    #[serde(default)]
    lattice_step: Option<CoordinatesDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MonitorDoc {
    #[serde(default)]
    extents: Option<ExtentsDoc>,
}

/// Legacy dashboard-format inventory document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDocument {
    #[serde(default)]
    monitor: MonitorDoc,
    #[serde(default)]
    tile_map: BTreeMap<String, Vec<DashboardTileDoc>>,
}

/// An inventory document in one of the two supported formats.
#[derive(Debug, Clone)]
pub enum InventoryDocument {
    Pipeline(PipelineDocument),
    Dashboard(DashboardDocument),
}

impl InventoryDocument {
    /// Parses raw JSON, dispatching on the presence of the
    /// `pipelineFormat` sentinel field.
    pub fn from_json(payload: &[u8]) -> Result<Self, SchedulerError> {
        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| SchedulerError::parse_error(format!("invalid inventory JSON: {}", e)))?;

        if value.get("pipelineFormat").is_some() {
            serde_json::from_value(value)
                .map(InventoryDocument::Pipeline)
                .map_err(|e| SchedulerError::parse_error(format!("malformed pipeline inventory: {}", e)))
        } else {
            serde_json::from_value(value)
                .map(InventoryDocument::Dashboard)
                .map_err(|e| SchedulerError::parse_error(format!("malformed dashboard inventory: {}", e)))
        }
    }

    /// Normalizes the document into extents plus the canonical tile vector
    /// in document order.
    pub fn into_parsed(self) -> ParsedInventory {
        match self {
            InventoryDocument::Pipeline(doc) => {
                let tiles = doc
                    .tiles
                    .into_iter()
                    .map(|t| {
                        Tile::new(
                            &t.relative_path,
                            t.id,
                            coordinates_from_doc(t.position),
                            coordinates_from_doc(t.step),
                            t.is_complete,
                        )
                    })
                    .collect();
                ParsedInventory {
                    extents: doc.extents.map(Into::into),
                    tiles,
                }
            }
            InventoryDocument::Dashboard(doc) => {
                let tiles = doc
                    .tile_map
                    .into_values()
                    .flatten()
                    .map(|t| {
                        let contents = t.contents.unwrap_or_default();
                        Tile::new(
                            &t.relative_path,
                            t.id,
                            coordinates_from_doc(contents.lattice_position),
                            coordinates_from_doc(contents.lattice_step),
                            t.is_complete,
                        )
                    })
                    .collect();
                ParsedInventory {
                    extents: doc.monitor.extents.map(Into::into),
                    tiles,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Normalized result of parsing one inventory document.
#[derive(Debug, Clone, Default)]
pub struct ParsedInventory {
    /// Fresh sample extents, flushed to persistence before tile processing
    pub extents: Option<SampleExtents>,
    /// Canonical tiles in document order, duplicates preserved
    pub tiles: Vec<Tile>,
}

/// Outcome of the source-selection step.
#[derive(Debug, Clone)]
pub struct SourceClassification {
    pub state: InputSourceState,
    /// The selected document, present only for `Pipeline` and `Dashboard`
    pub document: Option<PathBuf>,
}

/// Classification plus parsed inventory, for callers that want both steps
/// at once.
#[derive(Debug, Clone)]
pub struct InventoryScan {
    pub state: InputSourceState,
    pub inventory: ParsedInventory,
}

/// Locates and parses tile-inventory documents at a mapped project root.
pub struct InventoryReader;

impl InventoryReader {
    /// Classifies a project's input source without parsing anything.
    pub async fn classify(root: &Path) -> SourceClassification {
        let root_exists = tokio::fs::metadata(root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !root_exists {
            return SourceClassification {
                state: InputSourceState::BadLocation,
                document: None,
            };
        }

        let pipeline_input = root.join(PIPELINE_INPUT_FILENAME);
        if tokio::fs::metadata(&pipeline_input).await.is_ok() {
            return SourceClassification {
                state: InputSourceState::Pipeline,
                document: Some(pipeline_input),
            };
        }

        let dashboard = root.join(DASHBOARD_FILENAME);
        if tokio::fs::metadata(&dashboard).await.is_ok() {
            return SourceClassification {
                state: InputSourceState::Dashboard,
                document: Some(dashboard),
            };
        }

        SourceClassification {
            state: InputSourceState::Missing,
            document: None,
        }
    }

    /// Reads and parses one inventory document.
    pub async fn parse_document(path: &Path) -> Result<ParsedInventory, SchedulerError> {
        debug!(path = %path.display(), "parsing inventory document");
        let payload = tokio::fs::read(path)
            .await
            .map_err(|e| SchedulerError::io_error(format!("failed to read {}: {}", path.display(), e)))?;
        Ok(InventoryDocument::from_json(&payload)?.into_parsed())
    }

    /// Classifies and, when a document was selected, parses it. Yields an
    /// empty inventory for `BadLocation` and `Missing`.
    pub async fn scan(root: &Path) -> Result<InventoryScan, SchedulerError> {
        let classification = Self::classify(root).await;
        let inventory = match &classification.document {
            Some(path) => Self::parse_document(path).await?,
            None => ParsedInventory::default(),
        };
        Ok(InventoryScan {
            state: classification.state,
            inventory,
        })
    }
}
