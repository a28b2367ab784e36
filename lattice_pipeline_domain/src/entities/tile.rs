// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Canonical Tile
//!
//! One tile as parsed from an inventory document, after normalization:
//! the relative path is POSIX-normalized, the tile name is the basename of
//! the normalized path, and missing position/step objects default to
//! all-null coordinates.
//!
//! A `Tile` is identified within its project by `relative_path`. The
//! inventory reader yields tiles in document order without deduplicating;
//! the mux deduplicates by relative path.

use serde::{Deserialize, Serialize};

use crate::value_objects::{LatticeCoordinates, StageStatus, TileRelativePath};

/// A canonical tile derived from an inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    relative_path: TileRelativePath,
    index: Option<i64>,
    tile_name: String,
    lattice_position: LatticeCoordinates,
    lattice_step: LatticeCoordinates,
    is_complete: bool,
}

impl Tile {
    /// Builds a canonical tile from raw inventory fields.
    ///
    /// The raw path is normalized on construction and the tile name is
    /// derived from the normalized form, never from the raw input.
    pub fn new(
        raw_relative_path: impl AsRef<str>,
        index: Option<i64>,
        lattice_position: LatticeCoordinates,
        lattice_step: LatticeCoordinates,
        is_complete: bool,
    ) -> Self {
        let relative_path = TileRelativePath::new(raw_relative_path);
        let tile_name = relative_path.tile_name().to_string();
        Self {
            relative_path,
            index,
            tile_name,
            lattice_position,
            lattice_step,
            is_complete,
        }
    }

    pub fn relative_path(&self) -> &TileRelativePath {
        &self.relative_path
    }

    pub fn index(&self) -> Option<i64> {
        self.index
    }

    pub fn tile_name(&self) -> &str {
        &self.tile_name
    }

    pub fn lattice_position(&self) -> &LatticeCoordinates {
        &self.lattice_position
    }

    pub fn lattice_step(&self) -> &LatticeCoordinates {
        &self.lattice_step
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Stage-zero status derived from the completeness flag; stage zero sets
    /// both the previous-stage and this-stage status to this value.
    pub fn stage_status(&self) -> StageStatus {
        StageStatus::from_is_complete(self.is_complete)
    }
}
