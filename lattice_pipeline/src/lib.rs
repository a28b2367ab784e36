// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Lattice Pipeline
//!
//! Scheduling core of a tiled-microscopy image-processing pipeline. A
//! *project* is a root directory holding a 2D/3D lattice of image tiles;
//! each tile traverses a linear sequence of processing stages executed on
//! remote workers. This crate keeps the persistent per-tile status table of
//! stage zero accurate against two moving sources of truth:
//!
//! - **The tile inventory on disk**: one periodic ingestor per project
//!   locates and parses `pipeline-input.json` (or the legacy
//!   `dashboard.json`), muxes the canonical tile set against the persisted
//!   table behind a mass-deletion guard, applies the resulting plan
//!   transactionally, and rotates a recovery snapshot.
//! - **Worker completion reports**: a durable AMQP queue consumer receives
//!   task-execution completion records, records them to the metrics sink,
//!   and dispatches them to the owning per-stage scheduler with
//!   redelivery-safe acknowledgement.
//!
//! ## Architecture
//!
//! The crate follows the workspace's layered layout:
//!
//! - [`application`] - the ingestor loop, completion dispatcher, and
//!   scheduler hub
//! - [`infrastructure`] - path mapping, inventory parsing and snapshots,
//!   SQLite repositories, the AMQP consumer, Prometheus metrics,
//!   configuration, and supervised task spawning
//!
//! Domain types, the pure tile mux, and the ports live in
//! `lattice-pipeline-domain`; process lifecycle (CLI, signals, shutdown) in
//! `lattice-pipeline-bootstrap`.
//!
//! ## Delivery semantics
//!
//! The completion path is at-least-once with idempotent effects: a record
//! may be redelivered and re-recorded, but each delivery is acknowledged
//! exactly once and only after the metrics write and a confirmed hub
//! dispatch.

pub mod application;
pub mod infrastructure;

// Re-export commonly used domain types
pub use lattice_pipeline_domain::{
    InputSourceState, MuxOutcome, Project, ProjectId, SchedulerError, StageStatus,
    TaskExecutionReport, Tile, TileMuxer, TilePlan, TileStatusRecord,
};
