// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Application services of the scheduling core.

pub mod completion_dispatcher;
pub mod project_ingestor;
pub mod scheduler_hub;

pub use completion_dispatcher::CompletionDispatcher;
pub use project_ingestor::{ProjectIngestor, STAGE_ZERO_ID};
pub use scheduler_hub::SchedulerHub;
