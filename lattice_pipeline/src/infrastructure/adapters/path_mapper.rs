// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Path Mapper
//!
//! Translates remote-style mount paths registered by the control plane into
//! paths visible on this machine. Acquisition and scheduling hosts mount the
//! same shares at different locations; configuration supplies an ordered
//! list of `{remote, local}` prefix pairs.
//!
//! Matching is literal prefix on bytes. Pairs are tried in order and no
//! pair is tried after the first match; unmatched paths pass through
//! unchanged.

use crate::infrastructure::config::PathMapping;

/// Ordered prefix-rewriting path translator.
#[derive(Debug, Clone, Default)]
pub struct PathMapper {
    mappings: Vec<PathMapping>,
}

impl PathMapper {
    pub fn new(mappings: Vec<PathMapping>) -> Self {
        Self { mappings }
    }

    /// Translates `path` using the first matching prefix pair, or returns
    /// it unchanged.
    pub fn map(&self, path: &str) -> String {
        for mapping in &self.mappings {
            if let Some(remainder) = path.strip_prefix(mapping.remote.as_str()) {
                return format!("{}{}", mapping.local, remainder);
            }
        }
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new(vec![
            PathMapping {
                remote: "/groups/mousebrainmicro".to_string(),
                local: "/nrs/local".to_string(),
            },
            PathMapping {
                remote: "/groups".to_string(),
                local: "/mnt/groups".to_string(),
            },
        ])
    }

    #[test]
    fn test_first_match_wins() {
        // Both pairs match; only the first is applied.
        assert_eq!(
            mapper().map("/groups/mousebrainmicro/sample-1"),
            "/nrs/local/sample-1"
        );
    }

    #[test]
    fn test_later_pair_applies_when_first_misses() {
        assert_eq!(mapper().map("/groups/other/sample-2"), "/mnt/groups/other/sample-2");
    }

    #[test]
    fn test_unmatched_path_passes_through() {
        assert_eq!(mapper().map("/scratch/sample-3"), "/scratch/sample-3");
    }

    #[test]
    fn test_empty_mapper_is_identity() {
        let mapper = PathMapper::new(Vec::new());
        assert_eq!(mapper.map("/anything"), "/anything");
    }

    #[test]
    fn test_prefix_match_is_literal_bytes() {
        // No path-component awareness: a prefix match inside a component
        // still rewrites.
        let mapper = PathMapper::new(vec![PathMapping {
            remote: "/data".to_string(),
            local: "/d".to_string(),
        }]);
        assert_eq!(mapper.map("/database/x"), "/dbase/x");
    }
}
