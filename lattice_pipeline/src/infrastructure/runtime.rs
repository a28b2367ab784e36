// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Runtime Utilities
//!
//! Supervised concurrent task execution: every long-running worker is
//! spawned through `spawn_supervised` and joined through `join_supervised`,
//! so task panics and errors surface in logs and propagate to the
//! composition root instead of vanishing.

pub mod supervisor;

pub use supervisor::{join_supervised, spawn_supervised, AppResult};
