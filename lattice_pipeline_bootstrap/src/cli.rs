// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! Argument parsing for the scheduler binary. The CLI stays deliberately
//! small: everything operational lives in the configuration file, and the
//! flags here only say where that file is and how loud to be.

use clap::Parser;
use std::path::PathBuf;

/// Scheduling core for tiled-microscopy processing pipelines.
#[derive(Debug, Clone, Parser)]
#[command(name = "lattice_pipeline", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "lattice-pipeline.toml")]
    pub config: PathBuf,

    /// Log filter directive (overrides RUST_LOG), e.g. "info" or
    /// "lattice_pipeline=debug"
    #[arg(long)]
    pub log_level: Option<String>,

    /// Validate the configuration and exit without starting workers
    #[arg(long, default_value_t = false)]
    pub check_config: bool,
}

impl Cli {
    /// Parses arguments from the process environment
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
