// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Write-only port to the task-execution metrics backend. The dispatcher
//! must complete this write before a completion message may be
//! acknowledged; a failed write propagates as a dispatch failure so the
//! broker redelivers.

use async_trait::async_trait;

use crate::entities::TaskExecutionReport;
use crate::SchedulerError;

/// Concurrent-safe, write-only metrics sink for task executions.
#[async_trait]
pub trait TaskMetricsSink: Send + Sync {
    /// Persists one task-execution time-series point
    async fn write_task_execution(&self, report: &TaskExecutionReport) -> Result<(), SchedulerError>;
}
