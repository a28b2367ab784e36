// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Lattice Pipeline Bootstrap
//!
//! Startup concerns of the scheduling core, kept apart from both domain
//! logic and infrastructure wiring:
//!
//! - `cli` - Command-line argument parsing
//! - `logger` - Bootstrap-phase logging abstraction
//! - `shutdown` - Cancellation tokens and shutdown coordination
//! - `signals` - Unix signal handling (SIGTERM, SIGINT, SIGHUP)
//!
//! The bootstrap crate has no dependency on the domain: it deals purely in
//! process lifecycle. `main` parses the CLI here, installs signal handlers
//! here, and hands cancellation tokens from here to the ingestor supervisor
//! and the queue consumer.

pub mod cli;
pub mod logger;
pub mod shutdown;
pub mod signals;

pub use cli::Cli;
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};
pub use shutdown::{CancellationToken, ShutdownCoordinator};
