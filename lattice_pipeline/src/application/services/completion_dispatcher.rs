// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Completion Dispatcher
//!
//! Processes one task-execution completion record end to end:
//!
//! 1. Write the record to the metrics sink. A sink failure propagates; the
//!    message stays unacknowledged and the broker redelivers.
//! 2. Hand the record to the scheduler hub. A refusal (`false`, typically an
//!    unregistered stage) is retried indefinitely with a fixed delay; the
//!    message stays unacknowledged through all retries so a dying consumer
//!    releases it back to the broker.
//!
//! The retry sleep selects against the shutdown token, so teardown
//! interrupts in-flight retries promptly.
//!
//! At-least-once semantics: a redelivered record may produce repeated
//! metrics writes (the sink tolerates them); the caller acknowledges
//! exactly once, only after `dispatch` returns `Ok`.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use lattice_pipeline_bootstrap::CancellationToken;
use lattice_pipeline_domain::{SchedulerError, TaskExecutionReport, TaskMetricsSink};

use crate::application::services::SchedulerHub;
use crate::infrastructure::metrics::MetricsService;

/// Delay between dispatch retries while a stage scheduler is unregistered
pub const DISPATCH_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Metrics-then-dispatch processor for completion records.
pub struct CompletionDispatcher {
    metrics_sink: Arc<dyn TaskMetricsSink>,
    hub: Arc<SchedulerHub>,
    metrics: Arc<MetricsService>,
    shutdown: CancellationToken,
}

impl CompletionDispatcher {
    pub fn new(
        metrics_sink: Arc<dyn TaskMetricsSink>,
        hub: Arc<SchedulerHub>,
        metrics: Arc<MetricsService>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            metrics_sink,
            hub,
            metrics,
            shutdown,
        }
    }

    /// Processes one record to confirmed handling.
    ///
    /// Returns `Ok(())` only after the metrics write succeeded and the hub
    /// confirmed handling; the caller may then acknowledge the delivery.
    /// Any `Err` means the delivery must stay unacknowledged.
    pub async fn dispatch(&self, report: &TaskExecutionReport) -> Result<(), SchedulerError> {
        self.metrics_sink.write_task_execution(report).await?;

        loop {
            if self.hub.on_task_execution_complete(report).await? {
                debug!(
                    execution_id = report.id,
                    stage_id = report.pipeline_stage_id,
                    "completion record handled"
                );
                return Ok(());
            }

            warn!(
                execution_id = report.id,
                stage_id = report.pipeline_stage_id,
                retry_in_secs = DISPATCH_RETRY_DELAY.as_secs(),
                "stage scheduler refused completion record, retrying"
            );
            self.metrics.increment_dispatch_retries();

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Err(SchedulerError::cancelled("dispatch retry interrupted by shutdown"));
                }
                _ = tokio::time::sleep(DISPATCH_RETRY_DELAY) => {}
            }
        }
    }
}
