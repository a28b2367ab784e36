// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Value Objects
//!
//! Immutable, self-validating objects defined by their attributes rather
//! than by identity. Two value objects with the same attributes are equal.
//!
//! - `ProjectId`: type-safe, ULID-backed project identifier
//! - `StageStatus`: per-stage tile processing status with stable wire codes
//! - `InputSourceState`: classification of a project's inventory source
//! - `SampleExtents`: six min/max bounds over the sample volume
//! - `LatticeCoordinates`: nullable x/y/z lattice position or step
//! - `TileRelativePath`: POSIX-normalized tile identity within a project

pub mod input_source;
pub mod lattice;
pub mod project_id;
pub mod sample_extents;
pub mod stage_status;
pub mod tile_path;

pub use input_source::InputSourceState;
pub use lattice::LatticeCoordinates;
pub use project_id::ProjectId;
pub use sample_extents::SampleExtents;
pub use stage_status::StageStatus;
pub use tile_path::TileRelativePath;
