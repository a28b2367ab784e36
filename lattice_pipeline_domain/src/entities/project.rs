// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Project Entity
//!
//! A project defines a root directory holding one lattice of image tiles and
//! carries the scheduling state the core maintains for it: the sample
//! extents, the classification of its inventory source, and the cooperative
//! `exit_requested` stop flag.
//!
//! Projects are created and owned by the control plane; the scheduling core
//! reads them from the local database, updates their extents when an
//! inventory carries fresh ones, and publishes the input-source
//! classification after every ingestor pass.

use serde::{Deserialize, Serialize};

use crate::value_objects::{InputSourceState, ProjectId, SampleExtents};

/// A tiled-microscopy project under scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    /// Remote-style root path as registered by the control plane; mapped to
    /// a locally visible path before any filesystem access.
    root_path: String,
    sample_extents: SampleExtents,
    input_source_state: InputSourceState,
    exit_requested: bool,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, root_path: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            root_path: root_path.into(),
            sample_extents: SampleExtents::default(),
            input_source_state: InputSourceState::Unknown,
            exit_requested: false,
        }
    }

    /// Rehydrates a project from persisted state
    pub fn from_persistence(
        id: ProjectId,
        name: String,
        root_path: String,
        sample_extents: SampleExtents,
        input_source_state: InputSourceState,
        exit_requested: bool,
    ) -> Self {
        Self {
            id,
            name,
            root_path,
            sample_extents,
            input_source_state,
            exit_requested,
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn sample_extents(&self) -> &SampleExtents {
        &self.sample_extents
    }

    pub fn input_source_state(&self) -> InputSourceState {
        self.input_source_state
    }

    /// True when the control plane has asked this project's ingestor to stop
    /// at the next tick boundary.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Replaces the sample extents with values parsed from an inventory
    pub fn set_sample_extents(&mut self, extents: SampleExtents) {
        self.sample_extents = extents;
    }

    /// Records the classification produced by the most recent ingestor pass
    pub fn set_input_source_state(&mut self, state: InputSourceState) {
        self.input_source_state = state;
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}
