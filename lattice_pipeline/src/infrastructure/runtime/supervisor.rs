// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Task Supervision Utilities
//!
//! Wrappers around `tokio::spawn` that prevent spawn-and-forget: task
//! outcomes are always logged, and the returned handle must be awaited so
//! errors and panics propagate to the caller.

use tokio::task::JoinHandle;
use tracing::{debug, error};

use lattice_pipeline_domain::SchedulerError;

/// Result type alias for application operations
pub type AppResult<T> = Result<T, SchedulerError>;

/// Spawns a supervised task with lifecycle logging.
///
/// The returned `JoinHandle` must be awaited by the caller (use
/// [`join_supervised`]); dropping it silently discards failures.
pub fn spawn_supervised<F, T>(name: &'static str, fut: F) -> JoinHandle<AppResult<T>>
where
    F: std::future::Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    debug!(task = name, "task starting");

    tokio::spawn(async move {
        let result = fut.await;

        match &result {
            Ok(_) => debug!(task = name, "task completed successfully"),
            Err(e) => error!(task = name, error = ?e, "task failed"),
        }

        result
    })
}

/// Awaits a supervised task handle, converting panics and cancellations
/// into typed errors.
pub async fn join_supervised<T>(handle: JoinHandle<AppResult<T>>) -> AppResult<T> {
    match handle.await {
        Ok(task_result) => task_result,
        Err(e) => {
            if e.is_panic() {
                Err(SchedulerError::internal_error(format!("task panicked: {}", e)))
            } else if e.is_cancelled() {
                Err(SchedulerError::cancelled("task cancelled"))
            } else {
                Err(SchedulerError::internal_error(format!("task join failed: {}", e)))
            }
        }
    }
}
