// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics Service
//!
//! Prometheus metrics for the scheduling core itself: ingestor activity,
//! mux outcomes, and the completion intake path. Worker task-execution
//! points go through the [`crate::infrastructure::metrics::task_sink`]
//! instead.
//!
//! Each service instance owns its own registry, so tests can construct
//! services freely without global-registry collisions.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;
use tracing::debug;

use lattice_pipeline_domain::SchedulerError;

const NAMESPACE: &str = "lattice_pipeline";

/// Prometheus metrics registry and instruments for the scheduling core.
#[derive(Clone)]
pub struct MetricsService {
    registry: Arc<Registry>,

    // Ingestor
    ingestor_ticks_total: IntCounter,
    guard_trips_total: IntCounter,
    tiles_inserted_total: IntCounter,
    tiles_updated_total: IntCounter,
    tiles_deleted_total: IntCounter,
    active_ingestors: IntGauge,

    // Completion intake
    completion_messages_total: IntCounter,
    completion_acks_total: IntCounter,
    completion_rejects_total: IntCounter,
    decode_failures_total: IntCounter,
    dispatch_retries_total: IntCounter,

    // Task executions (written by the sink)
    task_executions_total: IntCounter,
    task_execution_duration_seconds: Histogram,
}

impl MetricsService {
    pub fn new() -> Result<Self, SchedulerError> {
        let registry = Registry::new();

        let ingestor_ticks_total = IntCounter::with_opts(
            Opts::new("ingestor_ticks_total", "Total ingestor ticks across all projects").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create ingestor_ticks_total metric: {}", e)))?;

        let guard_trips_total = IntCounter::with_opts(
            Opts::new("guard_trips_total", "Total mux passes refused by the mass-deletion guard")
                .namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create guard_trips_total metric: {}", e)))?;

        let tiles_inserted_total = IntCounter::with_opts(
            Opts::new("tiles_inserted_total", "Total tile-status rows inserted").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create tiles_inserted_total metric: {}", e)))?;

        let tiles_updated_total = IntCounter::with_opts(
            Opts::new("tiles_updated_total", "Total tile-status rows updated").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create tiles_updated_total metric: {}", e)))?;

        let tiles_deleted_total = IntCounter::with_opts(
            Opts::new("tiles_deleted_total", "Total tile-status rows deleted").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create tiles_deleted_total metric: {}", e)))?;

        let active_ingestors = IntGauge::with_opts(
            Opts::new("active_ingestors", "Number of currently running project ingestors").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create active_ingestors metric: {}", e)))?;

        let completion_messages_total = IntCounter::with_opts(
            Opts::new("completion_messages_total", "Total completion messages received from the broker")
                .namespace(NAMESPACE),
        )
        .map_err(|e| {
            SchedulerError::metrics_error(format!("Failed to create completion_messages_total metric: {}", e))
        })?;

        let completion_acks_total = IntCounter::with_opts(
            Opts::new("completion_acks_total", "Total completion messages acknowledged").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create completion_acks_total metric: {}", e)))?;

        let completion_rejects_total = IntCounter::with_opts(
            Opts::new("completion_rejects_total", "Total completion messages rejected without requeue")
                .namespace(NAMESPACE),
        )
        .map_err(|e| {
            SchedulerError::metrics_error(format!("Failed to create completion_rejects_total metric: {}", e))
        })?;

        let decode_failures_total = IntCounter::with_opts(
            Opts::new("decode_failures_total", "Total completion payloads that failed to decode")
                .namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create decode_failures_total metric: {}", e)))?;

        let dispatch_retries_total = IntCounter::with_opts(
            Opts::new("dispatch_retries_total", "Total dispatch retries while a stage was unregistered")
                .namespace(NAMESPACE),
        )
        .map_err(|e| {
            SchedulerError::metrics_error(format!("Failed to create dispatch_retries_total metric: {}", e))
        })?;

        let task_executions_total = IntCounter::with_opts(
            Opts::new("task_executions_total", "Total worker task executions recorded").namespace(NAMESPACE),
        )
        .map_err(|e| SchedulerError::metrics_error(format!("Failed to create task_executions_total metric: {}", e)))?;

        let task_execution_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "task_execution_duration_seconds",
                "Wall-clock duration of worker task executions",
            )
            .namespace(NAMESPACE),
        )
        .map_err(|e| {
            SchedulerError::metrics_error(format!("Failed to create task_execution_duration_seconds metric: {}", e))
        })?;

        registry
            .register(Box::new(ingestor_ticks_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register ingestor_ticks_total: {}", e)))?;
        registry
            .register(Box::new(guard_trips_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register guard_trips_total: {}", e)))?;
        registry
            .register(Box::new(tiles_inserted_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register tiles_inserted_total: {}", e)))?;
        registry
            .register(Box::new(tiles_updated_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register tiles_updated_total: {}", e)))?;
        registry
            .register(Box::new(tiles_deleted_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register tiles_deleted_total: {}", e)))?;
        registry
            .register(Box::new(active_ingestors.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register active_ingestors: {}", e)))?;
        registry
            .register(Box::new(completion_messages_total.clone()))
            .map_err(|e| {
                SchedulerError::metrics_error(format!("Failed to register completion_messages_total: {}", e))
            })?;
        registry
            .register(Box::new(completion_acks_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register completion_acks_total: {}", e)))?;
        registry
            .register(Box::new(completion_rejects_total.clone()))
            .map_err(|e| {
                SchedulerError::metrics_error(format!("Failed to register completion_rejects_total: {}", e))
            })?;
        registry
            .register(Box::new(decode_failures_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register decode_failures_total: {}", e)))?;
        registry
            .register(Box::new(dispatch_retries_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register dispatch_retries_total: {}", e)))?;
        registry
            .register(Box::new(task_executions_total.clone()))
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to register task_executions_total: {}", e)))?;
        registry
            .register(Box::new(task_execution_duration_seconds.clone()))
            .map_err(|e| {
                SchedulerError::metrics_error(format!("Failed to register task_execution_duration_seconds: {}", e))
            })?;

        debug!("MetricsService initialized with Prometheus registry");

        Ok(Self {
            registry: Arc::new(registry),
            ingestor_ticks_total,
            guard_trips_total,
            tiles_inserted_total,
            tiles_updated_total,
            tiles_deleted_total,
            active_ingestors,
            completion_messages_total,
            completion_acks_total,
            completion_rejects_total,
            decode_failures_total,
            dispatch_retries_total,
            task_executions_total,
            task_execution_duration_seconds,
        })
    }

    pub fn increment_ingestor_ticks(&self) {
        self.ingestor_ticks_total.inc();
    }

    pub fn increment_guard_trips(&self) {
        self.guard_trips_total.inc();
    }

    /// Records the applied sizes of one mux plan
    pub fn record_plan_applied(&self, inserted: usize, updated: usize, deleted: usize) {
        self.tiles_inserted_total.inc_by(inserted as u64);
        self.tiles_updated_total.inc_by(updated as u64);
        self.tiles_deleted_total.inc_by(deleted as u64);
    }

    pub fn increment_active_ingestors(&self) {
        self.active_ingestors.inc();
    }

    pub fn decrement_active_ingestors(&self) {
        self.active_ingestors.dec();
    }

    pub fn increment_completion_messages(&self) {
        self.completion_messages_total.inc();
    }

    pub fn increment_completion_acks(&self) {
        self.completion_acks_total.inc();
    }

    pub fn increment_completion_rejects(&self) {
        self.completion_rejects_total.inc();
    }

    pub fn increment_decode_failures(&self) {
        self.decode_failures_total.inc();
    }

    pub fn increment_dispatch_retries(&self) {
        self.dispatch_retries_total.inc();
    }

    /// Records one worker task execution
    pub fn record_task_execution(&self, duration_seconds: f64) {
        self.task_executions_total.inc();
        self.task_execution_duration_seconds.observe(duration_seconds);
    }

    /// Prometheus metrics in text exposition format
    pub fn gather(&self) -> Result<String, SchedulerError> {
        let encoder = prometheus::TextEncoder::new();
        encoder
            .encode_to_string(&self.registry.gather())
            .map_err(|e| SchedulerError::metrics_error(format!("Failed to encode metrics: {}", e)))
    }
}
