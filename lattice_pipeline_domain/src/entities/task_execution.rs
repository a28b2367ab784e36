// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Task Execution Report
//!
//! A completion record describing the terminal state of one task execution
//! for one (stage, tile) pair, as reported by a remote worker over the
//! durable queue.
//!
//! Reports are transient: consumed from the broker, written to the metrics
//! sink, dispatched to the owning stage scheduler, and acknowledged. They
//! are never persisted by this core. Dispatch must stay idempotent at the
//! granularity of (`id`, `pipeline_stage_id`) because broker redelivery can
//! present the same report more than once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal state of one task execution, reported by a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskExecutionReport {
    pub id: i64,
    pub worker_id: i64,
    pub tile_id: i64,
    pub pipeline_stage_id: i64,
    pub execution_status_code: i32,
    pub completion_status_code: i32,
    pub submitted_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub cpu_time_seconds: f64,
    pub max_cpu_percent: f64,
    pub max_memory_mb: f64,
    pub exit_code: i32,
}

impl TaskExecutionReport {
    /// Wall-clock duration of the execution, clamped to zero for clock skew
    pub fn execution_duration(&self) -> chrono::Duration {
        (self.completed_at - self.started_at).max(chrono::Duration::zero())
    }
}
