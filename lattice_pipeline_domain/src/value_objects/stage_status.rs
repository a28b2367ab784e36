// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Status Value Object
//!
//! Per-stage processing status of a tile. The numeric codes are part of the
//! persisted table format and the snapshot wire format and must remain
//! stable: Incomplete=1, Queued=2, Processing=3, Complete=4, Failed=5,
//! Canceled=6.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::SchedulerError;

/// Processing status of a tile at a pipeline stage.
///
/// Serialized as its numeric code so the snapshot JSON and the database
/// rows share one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum StageStatus {
    Incomplete = 1,
    Queued = 2,
    Processing = 3,
    Complete = 4,
    Failed = 5,
    Canceled = 6,
}

impl StageStatus {
    /// Stable numeric code used in persistence and on the wire
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Maps an inventory completeness flag to the stage-zero status pair
    /// value: `Complete` when the inventory marks the tile complete,
    /// `Incomplete` otherwise.
    pub fn from_is_complete(is_complete: bool) -> Self {
        if is_complete {
            StageStatus::Complete
        } else {
            StageStatus::Incomplete
        }
    }

    /// Parses a stable numeric code
    pub fn from_code(code: i32) -> Result<Self, SchedulerError> {
        match code {
            1 => Ok(StageStatus::Incomplete),
            2 => Ok(StageStatus::Queued),
            3 => Ok(StageStatus::Processing),
            4 => Ok(StageStatus::Complete),
            5 => Ok(StageStatus::Failed),
            6 => Ok(StageStatus::Canceled),
            other => Err(SchedulerError::validation_error(format!(
                "unknown stage status code: {}",
                other
            ))),
        }
    }
}

impl TryFrom<i32> for StageStatus {
    type Error = SchedulerError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<StageStatus> for i32 {
    fn from(status: StageStatus) -> Self {
        status.code()
    }
}

impl Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageStatus::Incomplete => "incomplete",
            StageStatus::Queued => "queued",
            StageStatus::Processing => "processing",
            StageStatus::Complete => "complete",
            StageStatus::Failed => "failed",
            StageStatus::Canceled => "canceled",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(StageStatus::Incomplete.code(), 1);
        assert_eq!(StageStatus::Queued.code(), 2);
        assert_eq!(StageStatus::Processing.code(), 3);
        assert_eq!(StageStatus::Complete.code(), 4);
        assert_eq!(StageStatus::Failed.code(), 5);
        assert_eq!(StageStatus::Canceled.code(), 6);
    }

    #[test]
    fn test_from_code_round_trip() {
        for code in 1..=6 {
            let status = StageStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert!(StageStatus::from_code(0).is_err());
        assert!(StageStatus::from_code(7).is_err());
        assert!(StageStatus::from_code(-1).is_err());
    }

    #[test]
    fn test_from_is_complete() {
        assert_eq!(StageStatus::from_is_complete(true), StageStatus::Complete);
        assert_eq!(StageStatus::from_is_complete(false), StageStatus::Incomplete);
    }

    #[test]
    fn test_serde_as_code() {
        let json = serde_json::to_string(&StageStatus::Complete).unwrap();
        assert_eq!(json, "4");
        let back: StageStatus = serde_json::from_str("4").unwrap();
        assert_eq!(back, StageStatus::Complete);
    }
}
