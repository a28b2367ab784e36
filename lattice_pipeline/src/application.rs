// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! Use-case orchestration over the domain, wired against infrastructure
//! through the domain's ports:
//!
//! - `services::project_ingestor` - the stage-zero scheduler and its
//!   periodic loop
//! - `services::completion_dispatcher` - metrics-then-dispatch with the
//!   10-second retry policy
//! - `services::scheduler_hub` - routing completion records to the owning
//!   per-stage scheduler

pub mod services;
