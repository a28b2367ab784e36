// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Project Identifier Value Object
//!
//! Type-safe project identification for the scheduling core.
//!
//! ## Overview
//!
//! `ProjectId` is a ULID-backed newtype that provides:
//!
//! - **Compile-Time Safety**: Cannot be confused with other entity ids
//! - **Temporal Ordering**: ULID-based time-ordered creation sequence
//! - **Serialization**: String representation for JSON, TEXT columns, and
//!   log output
//! - **Validation**: Parsing rejects malformed identifiers
//!
//! Projects are created by the control plane; the scheduling core only ever
//! parses ids it receives and generates fresh ones in tests.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use ulid::Ulid;

use crate::SchedulerError;

/// Project entity identifier.
///
/// Immutable value object wrapping a ULID. Equality, ordering, and hashing
/// delegate to the underlying ULID, so ids sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Ulid);

impl ProjectId {
    /// Generates a new time-ordered project id
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parses a project id from its canonical string form
    pub fn parse(value: &str) -> Result<Self, SchedulerError> {
        Ulid::from_string(value)
            .map(Self)
            .map_err(|e| SchedulerError::validation_error(format!("invalid project id '{}': {}", value, e)))
    }

    /// Returns the underlying ULID
    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Ulid> for ProjectId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}
