// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tile Relative Path Value Object
//!
//! The POSIX-normalized path of a tile relative to its project root. This is
//! the tile's identity within a project: the mux keys every diff on it, and
//! the persisted table enforces per-project uniqueness over it.
//!
//! ## Normalization
//!
//! Inventory documents produced on Windows acquisition machines carry
//! backslash separators. Construction replaces every backslash with a
//! forward slash; all identity comparisons use the normalized form, so
//! `a\b.tif` and `a/b.tif` name the same tile.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// POSIX-normalized tile path, the tile's primary key within a project.
///
/// Invariant: the stored string never contains a backslash character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileRelativePath(String);

impl TileRelativePath {
    /// Normalizes and wraps a raw relative path from an inventory document
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().replace('\\', "/"))
    }

    /// The normalized path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Basename of the normalized path, used as the tile's display name
    pub fn tile_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl Display for TileRelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TileRelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TileRelativePath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TileRelativePath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_backslashes_become_forward_slashes() {
        let path = TileRelativePath::new("a\\b\\c.tif");
        assert_eq!(path.as_str(), "a/b/c.tif");
    }

    #[test]
    fn test_mixed_separators() {
        let path = TileRelativePath::new("a\\b/c.tif");
        assert_eq!(path.as_str(), "a/b/c.tif");
    }

    #[test]
    fn test_identity_uses_normalized_form() {
        assert_eq!(TileRelativePath::new("x\\1.tif"), TileRelativePath::new("x/1.tif"));
    }

    #[test]
    fn test_tile_name_is_basename() {
        assert_eq!(TileRelativePath::new("a/b/c.tif").tile_name(), "c.tif");
        assert_eq!(TileRelativePath::new("a\\b.tif").tile_name(), "b.tif");
        assert_eq!(TileRelativePath::new("bare.tif").tile_name(), "bare.tif");
    }

    proptest! {
        #[test]
        fn prop_normalized_path_has_no_backslash(raw in ".*") {
            let path = TileRelativePath::new(&raw);
            prop_assert!(!path.as_str().contains('\\'));
        }

        #[test]
        fn prop_normalization_is_idempotent(raw in ".*") {
            let once = TileRelativePath::new(&raw);
            let twice = TileRelativePath::new(once.as_str());
            prop_assert_eq!(once, twice);
        }
    }
}
