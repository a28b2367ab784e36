// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! This module provides the hierarchical error system for the lattice
//! pipeline scheduling domain. It categorizes failures, provides actionable
//! error messages, and supports both automated recovery decisions and
//! human-readable diagnostics.
//!
//! ## Error Categories
//!
//! ### Configuration Errors
//! - **InvalidConfiguration**: Malformed or missing configuration settings
//! - **ValidationError**: Data validation failures
//!
//! ### Ingestion Errors
//! - **ParseError**: Malformed inventory or snapshot documents
//! - **IoError**: File system failures while reading or writing inventories
//!
//! ### Infrastructure Errors
//! - **DatabaseError**: Tile-status and project table operation failures
//! - **BrokerError**: AMQP connection, declaration, and delivery failures
//! - **MetricsError**: Metrics sink write failures
//! - **SerializationError**: JSON encode/decode failures
//!
//! ### System Errors
//! - **ProjectNotFound**: Lookup of an unknown project
//! - **Cancelled**: Shutdown-initiated interruption of an operation
//! - **InternalError**: Unexpected failures with no better category
//!
//! ## Recovery Strategy
//!
//! Some errors indicate temporary conditions that the schedulers retry on
//! the next tick or redelivery (`IoError`, `DatabaseError`, `BrokerError`,
//! `MetricsError`); others require operator intervention
//! (`InvalidConfiguration`, `ValidationError`). `is_recoverable` encodes the
//! distinction so callers can pick a policy without matching every variant.

use thiserror::Error;

/// Domain-specific errors for the lattice pipeline scheduling core.
///
/// Each variant includes a descriptive message and is designed to provide
/// clear information about what went wrong and potentially how to fix it.
///
/// ## Design Principles
///
/// - **Specific**: Each error type represents a specific failure mode
/// - **Actionable**: Error messages provide enough context for debugging
/// - **Categorized**: Errors are grouped by type for systematic handling
/// - **Recoverable**: Some errors indicate retry-able conditions
#[derive(Error, Debug, Clone)]
pub enum SchedulerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Broker error: {0}")]
    BrokerError(String),

    #[error("Metrics error: {0}")]
    MetricsError(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SchedulerError {
    /// Creates a new configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new validation error
    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Creates a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Creates a new IO error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::IoError(msg.into())
    }

    /// Creates a new database error
    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Creates a new serialization error
    pub fn serialization_error(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Creates a new broker error
    pub fn broker_error(msg: impl Into<String>) -> Self {
        Self::BrokerError(msg.into())
    }

    /// Creates a new metrics error
    pub fn metrics_error(msg: impl Into<String>) -> Self {
        Self::MetricsError(msg.into())
    }

    /// Creates a new cancellation error
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Creates a new internal error
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Checks if the error is recoverable
    ///
    /// Recoverable errors indicate transient conditions: the ingestor retries
    /// them on the next tick, the consumer relies on broker redelivery.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SchedulerError::IoError(_)
                | SchedulerError::DatabaseError(_)
                | SchedulerError::BrokerError(_)
                | SchedulerError::MetricsError(_)
        )
    }
}

impl From<std::io::Error> for SchedulerError {
    fn from(err: std::io::Error) -> Self {
        SchedulerError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for SchedulerError {
    fn from(err: serde_json::Error) -> Self {
        SchedulerError::SerializationError(err.to_string())
    }
}
