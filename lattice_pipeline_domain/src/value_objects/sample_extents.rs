// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Six numeric min/max bounds describing the sample volume a project's
//! lattice covers. Inventory documents may carry fresh extents; when they
//! do, the ingestor flushes them to persistence before tile processing.

use serde::{Deserialize, Serialize};

/// Min/max bounds of the sample volume over x, y, and z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleExtents {
    pub minimum_x: f64,
    pub maximum_x: f64,
    pub minimum_y: f64,
    pub maximum_y: f64,
    pub minimum_z: f64,
    pub maximum_z: f64,
}

impl SampleExtents {
    pub fn new(
        minimum_x: f64,
        maximum_x: f64,
        minimum_y: f64,
        maximum_y: f64,
        minimum_z: f64,
        maximum_z: f64,
    ) -> Self {
        Self {
            minimum_x,
            maximum_x,
            minimum_y,
            maximum_y,
            minimum_z,
            maximum_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let extents = SampleExtents::default();
        assert_eq!(extents.minimum_x, 0.0);
        assert_eq!(extents.maximum_z, 0.0);
    }

    #[test]
    fn test_equality_by_value() {
        let a = SampleExtents::new(0.0, 10.0, 0.0, 20.0, 0.0, 30.0);
        let b = SampleExtents::new(0.0, 10.0, 0.0, 20.0, 0.0, 30.0);
        assert_eq!(a, b);
    }
}
