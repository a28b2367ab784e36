// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Task Metrics Sink
//!
//! Prometheus-backed implementation of the `TaskMetricsSink` port. The
//! dispatcher writes every completion record here before the broker message
//! may be acknowledged; failures propagate so the message is redelivered.
//!
//! Writes are idempotency-tolerant rather than idempotent: a redelivered
//! record produces a second observation, which the at-least-once contract
//! explicitly permits (≥1 write, exactly one ack).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use lattice_pipeline_domain::{SchedulerError, TaskExecutionReport, TaskMetricsSink};

use crate::infrastructure::metrics::MetricsService;

/// `TaskMetricsSink` implementation recording to the Prometheus registry.
pub struct PrometheusTaskMetricsSink {
    metrics: Arc<MetricsService>,
}

impl PrometheusTaskMetricsSink {
    pub fn new(metrics: Arc<MetricsService>) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl TaskMetricsSink for PrometheusTaskMetricsSink {
    async fn write_task_execution(&self, report: &TaskExecutionReport) -> Result<(), SchedulerError> {
        let duration = report.execution_duration().num_milliseconds() as f64 / 1000.0;
        self.metrics.record_task_execution(duration);
        debug!(
            execution_id = report.id,
            stage_id = report.pipeline_stage_id,
            tile_id = report.tile_id,
            exit_code = report.exit_code,
            "recorded task execution"
        );
        Ok(())
    }
}
