// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tile Muxer
//!
//! The diff-and-plan operation at the heart of stage zero: reconcile a
//! freshly parsed inventory against the persisted tile-status table and
//! produce an ordered insert/update/delete plan.
//!
//! ## Contract
//!
//! The muxer is pure given its inputs and the injected clock. It never
//! touches storage; the ingestor applies the plan.
//!
//! - **Identity** is the POSIX-normalized `relative_path`.
//! - **Deduplication** of the inventory follows insertion-map semantics: the
//!   first occurrence of a path fixes its position in the plan, the last
//!   occurrence wins the value.
//! - **Ordering** within each bucket follows the input order of the
//!   inventory (inserts, updates) or of the persisted table (deletes).
//! - **Update predicate**: a row is rewritten only when the persisted
//!   `prev_stage_status` differs from the status the new inventory derives.
//!   The comparison of the *old* previous-stage status against the *new*
//!   status is intentional (it detects stage completion) and authoritative.
//! - `to_reset` stays empty at stage zero; it is reserved for cross-stage
//!   reset cascades driven by surrounding schedulers.
//!
//! ## Mass-Deletion Guard
//!
//! An inventory that suddenly shrinks by more than [`MASS_DELETION_GUARD`]
//! tiles is treated as a transient anomaly (truncated file, half-mounted
//! share) rather than a real deletion. The muxer refuses the entire pass
//! and the caller must leave persistence untouched for this tick.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Tile, TileStatusRecord};
use crate::services::Clock;
use crate::value_objects::TileRelativePath;

/// Largest tolerated shrink of the persisted table in one pass. A parse
/// yielding `persisted − parsed > MASS_DELETION_GUARD` refuses the pass.
pub const MASS_DELETION_GUARD: i64 = 1000;

/// Ordered mutation plan produced by one mux pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TilePlan {
    /// Tiles present in inventory but not in the persisted table
    pub to_insert: Vec<TileStatusRecord>,
    /// Persisted rows merged with inventory state where the update
    /// predicate held
    pub to_update: Vec<TileStatusRecord>,
    /// Paths of persisted rows absent from inventory
    pub to_delete: Vec<TileRelativePath>,
    /// Reserved for cross-stage reset cascades; empty at stage zero
    pub to_reset: Vec<TileStatusRecord>,
}

impl TilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty()
            && self.to_update.is_empty()
            && self.to_delete.is_empty()
            && self.to_reset.is_empty()
    }
}

/// Result of one mux pass.
#[derive(Debug, Clone, PartialEq)]
pub enum MuxOutcome {
    /// The pass produced a plan (possibly empty)
    Plan(TilePlan),
    /// The mass-deletion guard refused the pass; persistence must stay
    /// untouched
    GuardTripped { persisted: usize, parsed: usize },
}

/// Pure diff-and-plan service reconciling inventory against persistence.
pub struct TileMuxer {
    clock: Arc<dyn Clock>,
}

impl TileMuxer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Diffs the parsed inventory `inventory` against the persisted
    /// stage-zero vector `persisted` and produces a mutation plan.
    ///
    /// Returns [`MuxOutcome::GuardTripped`] without computing any buckets
    /// when the table would shrink by more than [`MASS_DELETION_GUARD`]
    /// rows.
    pub fn mux(&self, inventory: &[Tile], persisted: &[TileStatusRecord]) -> MuxOutcome {
        if persisted.len() as i64 - inventory.len() as i64 > MASS_DELETION_GUARD {
            return MuxOutcome::GuardTripped {
                persisted: persisted.len(),
                parsed: inventory.len(),
            };
        }

        let now = self.clock.now();

        // Insertion-map dedup: first occurrence fixes position, last wins.
        let mut deduped: Vec<&Tile> = Vec::with_capacity(inventory.len());
        let mut position: HashMap<&TileRelativePath, usize> = HashMap::with_capacity(inventory.len());
        for tile in inventory {
            match position.get(tile.relative_path()) {
                Some(&idx) => deduped[idx] = tile,
                None => {
                    position.insert(tile.relative_path(), deduped.len());
                    deduped.push(tile);
                }
            }
        }

        let persisted_by_path: HashMap<&TileRelativePath, &TileStatusRecord> =
            persisted.iter().map(|row| (&row.relative_path, row)).collect();

        let mut to_insert = Vec::new();
        let mut to_update = Vec::new();

        for tile in &deduped {
            match persisted_by_path.get(tile.relative_path()) {
                None => to_insert.push(TileStatusRecord::from_inventory(tile, now)),
                Some(existing) => {
                    if existing.prev_stage_status != tile.stage_status() {
                        to_update.push(existing.merge_inventory(tile, now));
                    }
                }
            }
        }

        let to_delete = persisted
            .iter()
            .filter(|row| !position.contains_key(&row.relative_path))
            .map(|row| row.relative_path.clone())
            .collect();

        MuxOutcome::Plan(TilePlan {
            to_insert,
            to_update,
            to_delete,
            to_reset: Vec::new(),
        })
    }
}
