// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Lattice Pipeline Domain
//!
//! Core business logic of the lattice pipeline scheduling core, independent
//! of databases, file systems, brokers, and user interfaces. It follows
//! Domain-Driven Design patterns:
//!
//! ## Entities
//!
//! Objects with identity that persists through state changes:
//!
//! - `Project`: a tiled-microscopy acquisition under scheduling
//! - `Tile`: one canonical tile parsed from an inventory document
//! - `TileStatusRecord`: a persisted per-tile stage-zero status row
//! - `TaskExecutionReport`: a transient worker completion record
//!
//! ## Value Objects
//!
//! Immutable, self-validating, equal by attributes:
//!
//! - `ProjectId`: ULID-backed type-safe project identifier
//! - `TileRelativePath`: POSIX-normalized tile identity
//! - `StageStatus`, `InputSourceState`: stable-coded state enums
//! - `SampleExtents`, `LatticeCoordinates`: numeric geometry
//!
//! ## Domain Services
//!
//! - `TileMuxer`: the pure diff-and-plan reconciliation with the
//!   mass-deletion guard
//! - `Clock`: injected time source
//!
//! ## Ports
//!
//! Async infrastructure interfaces implemented outside the domain:
//! repositories (`ProjectRepository`, `TileStatusRepository`), the
//! `ControlPlane` write port, the `TaskMetricsSink`, and the
//! `StageScheduler` capability set shared by per-stage schedulers.
//!
//! ## Business Rules
//!
//! - Within one project's table, `relative_path` is unique
//! - Stage-zero rows mirror the latest successfully parsed inventory,
//!   modulo the mass-deletion guard
//! - The muxer never touches storage; plans are applied by the ingestor
//! - Completion handling is at-least-once with idempotent effects

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::SchedulerError;

pub use entities::{Project, TaskExecutionReport, Tile, TileStatusRecord};
pub use repositories::{ProjectRepository, TileStatusRepository};
pub use services::{
    Clock, ControlPlane, FixedClock, MuxOutcome, StageScheduler, SystemClock, TaskMetricsSink,
    TileMuxer, TilePlan, MASS_DELETION_GUARD,
};
pub use value_objects::{
    InputSourceState, LatticeCoordinates, ProjectId, SampleExtents, StageStatus, TileRelativePath,
};
