// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Input Source State Value Object
//!
//! Classification of a project's inventory source, produced by each ingestor
//! pass and published to the control plane. This is the primary externally
//! visible failure signal: `Missing` and `BadLocation` tell an operator that
//! the project root needs attention without digging through logs.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::SchedulerError;

/// Where (and whether) a project's tile inventory was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSourceState {
    /// No ingestor pass has classified this project yet
    Unknown,
    /// `pipeline-input.json` was found at the project root
    Pipeline,
    /// Legacy `dashboard.json` was found at the project root
    Dashboard,
    /// The root exists but carries no inventory document
    Missing,
    /// The mapped root directory does not exist
    BadLocation,
}

impl InputSourceState {
    /// Stable name used for TEXT persistence and log output
    pub fn as_str(&self) -> &'static str {
        match self {
            InputSourceState::Unknown => "unknown",
            InputSourceState::Pipeline => "pipeline",
            InputSourceState::Dashboard => "dashboard",
            InputSourceState::Missing => "missing",
            InputSourceState::BadLocation => "bad_location",
        }
    }
}

impl Display for InputSourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputSourceState {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(InputSourceState::Unknown),
            "pipeline" => Ok(InputSourceState::Pipeline),
            "dashboard" => Ok(InputSourceState::Dashboard),
            "missing" => Ok(InputSourceState::Missing),
            "bad_location" => Ok(InputSourceState::BadLocation),
            other => Err(SchedulerError::validation_error(format!(
                "unknown input source state: {}",
                other
            ))),
        }
    }
}

impl Default for InputSourceState {
    fn default() -> Self {
        InputSourceState::Unknown
    }
}
