// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Completion Queue Consumer
//!
//! Consumes task-execution completion records from the durable AMQP queue
//! `TaskExecutionUpdateQueue` with manual acknowledgement and a prefetch of
//! 50, so at most 50 deliveries are in flight at any moment.
//!
//! ## Delivery handling
//!
//! - Decoded records go through the completion dispatcher; the delivery is
//!   acknowledged only after the dispatcher confirms handling. A dispatch
//!   failure leaves the delivery unacknowledged and the broker redelivers
//!   once the channel closes.
//! - Undecodable payloads are rejected without requeue: with a dead-letter
//!   exchange configured on the queue the broker parks them, otherwise they
//!   are dropped. Requeueing poison payloads would loop forever.
//!
//! ## Reconnect policy
//!
//! One exponential-backoff policy covers both initial connect and
//! reconnect: start at 5 seconds, double up to a 60-second cap, reset after
//! a successful connect. Every reconnect re-declares the queue, restores
//! the QoS window, and re-registers the consumer.

use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicQosOptions, BasicRejectOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use lattice_pipeline_bootstrap::CancellationToken;
use lattice_pipeline_domain::{SchedulerError, TaskExecutionReport};

use crate::application::services::CompletionDispatcher;
use crate::infrastructure::metrics::MetricsService;

/// Durable queue carrying task-execution completion records
pub const TASK_EXECUTION_UPDATE_QUEUE: &str = "TaskExecutionUpdateQueue";
/// Maximum unacknowledged deliveries held at once
pub const PREFETCH_COUNT: u16 = 50;
/// Consumer tag announced to the broker
pub const CONSUMER_TAG: &str = "lattice-pipeline-scheduler";

/// First reconnect delay after a connection failure
pub const RECONNECT_BACKOFF_INITIAL: Duration = Duration::from_secs(5);
/// Upper bound of the exponential reconnect backoff
pub const RECONNECT_BACKOFF_CAP: Duration = Duration::from_secs(60);

fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(RECONNECT_BACKOFF_CAP)
}

// ---------------------------------------------------------------------------
// Wire decoding
// ---------------------------------------------------------------------------

/// Completion record as it appears on the wire: timestamps are epoch
/// milliseconds and are re-materialized into absolute timestamps on decode.
#[derive(Debug, Clone, Deserialize)]
struct TaskExecutionWire {
    id: i64,
    worker_id: i64,
    tile_id: i64,
    pipeline_stage_id: i64,
    execution_status_code: i32,
    completion_status_code: i32,
    submitted_at: i64,
    started_at: i64,
    completed_at: i64,
    cpu_time_seconds: f64,
    max_cpu_percent: f64,
    max_memory_mb: f64,
    exit_code: i32,
}

fn timestamp_from_millis(millis: i64, field: &str) -> Result<DateTime<Utc>, SchedulerError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| SchedulerError::parse_error(format!("{} out of range: {}", field, millis)))
}

impl TaskExecutionWire {
    fn into_report(self) -> Result<TaskExecutionReport, SchedulerError> {
        Ok(TaskExecutionReport {
            id: self.id,
            worker_id: self.worker_id,
            tile_id: self.tile_id,
            pipeline_stage_id: self.pipeline_stage_id,
            execution_status_code: self.execution_status_code,
            completion_status_code: self.completion_status_code,
            submitted_at: timestamp_from_millis(self.submitted_at, "submitted_at")?,
            started_at: timestamp_from_millis(self.started_at, "started_at")?,
            completed_at: timestamp_from_millis(self.completed_at, "completed_at")?,
            cpu_time_seconds: self.cpu_time_seconds,
            max_cpu_percent: self.max_cpu_percent,
            max_memory_mb: self.max_memory_mb,
            exit_code: self.exit_code,
        })
    }
}

/// Decodes a UTF-8 JSON completion payload into a domain report.
pub fn decode_report(payload: &[u8]) -> Result<TaskExecutionReport, SchedulerError> {
    let wire: TaskExecutionWire = serde_json::from_slice(payload)
        .map_err(|e| SchedulerError::parse_error(format!("undecodable completion payload: {}", e)))?;
    wire.into_report()
}

// ---------------------------------------------------------------------------
// Consumer
// ---------------------------------------------------------------------------

/// Durable-queue consumer feeding the completion dispatcher.
pub struct CompletionConsumer {
    amqp_url: String,
    dispatcher: Arc<CompletionDispatcher>,
    metrics: Arc<MetricsService>,
    shutdown: CancellationToken,
}

impl CompletionConsumer {
    pub fn new(
        amqp_url: String,
        dispatcher: Arc<CompletionDispatcher>,
        metrics: Arc<MetricsService>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            amqp_url,
            dispatcher,
            metrics,
            shutdown,
        }
    }

    /// Runs the consumer until shutdown, reconnecting with exponential
    /// backoff on any connection failure.
    pub async fn run(&self) -> Result<(), SchedulerError> {
        let mut backoff = RECONNECT_BACKOFF_INITIAL;

        loop {
            if self.shutdown.is_cancelled() {
                return Ok(());
            }

            match self.consume_until_disconnect(&mut backoff).await {
                Ok(()) => {
                    info!("completion consumer stopped");
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, retry_in = ?backoff, "broker connection failed, reconnecting");
                }
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = next_backoff(backoff);
        }
    }

    /// Connects, declares the queue, and drains deliveries until the
    /// connection drops or shutdown is initiated. Resets `backoff` once the
    /// consumer is established.
    async fn consume_until_disconnect(&self, backoff: &mut Duration) -> Result<(), SchedulerError> {
        let connection = Connection::connect(&self.amqp_url, ConnectionProperties::default())
            .await
            .map_err(|e| SchedulerError::broker_error(format!("connect failed: {}", e)))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| SchedulerError::broker_error(format!("channel open failed: {}", e)))?;

        channel
            .queue_declare(
                TASK_EXECUTION_UPDATE_QUEUE,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| SchedulerError::broker_error(format!("queue declare failed: {}", e)))?;

        channel
            .basic_qos(PREFETCH_COUNT, BasicQosOptions::default())
            .await
            .map_err(|e| SchedulerError::broker_error(format!("qos failed: {}", e)))?;

        let consumer = channel
            .basic_consume(
                TASK_EXECUTION_UPDATE_QUEUE,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| SchedulerError::broker_error(format!("consume failed: {}", e)))?;

        info!(
            queue = TASK_EXECUTION_UPDATE_QUEUE,
            prefetch = PREFETCH_COUNT,
            "connected to broker, consuming"
        );
        *backoff = RECONNECT_BACKOFF_INITIAL;

        let shutdown = self.shutdown.clone();
        consumer
            .take_until(Box::pin(async move { shutdown.cancelled().await }))
            .for_each_concurrent(usize::from(PREFETCH_COUNT), |delivery| async move {
                match delivery {
                    Ok(delivery) => self.handle_delivery(delivery).await,
                    Err(e) => warn!(error = %e, "delivery stream error"),
                }
            })
            .await;

        if self.shutdown.is_cancelled() {
            // Unacked in-flight deliveries return to the queue when the
            // connection closes.
            Ok(())
        } else {
            Err(SchedulerError::broker_error("consumer stream closed"))
        }
    }

    /// Processes one delivery: decode, dispatch, acknowledge.
    async fn handle_delivery(&self, delivery: Delivery) {
        self.metrics.increment_completion_messages();

        let report = match decode_report(&delivery.data) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "rejecting undecodable completion message");
                self.metrics.increment_decode_failures();
                if let Err(e) = delivery.acker.reject(BasicRejectOptions { requeue: false }).await {
                    warn!(error = %e, "failed to reject delivery");
                } else {
                    self.metrics.increment_completion_rejects();
                }
                return;
            }
        };

        match self.dispatcher.dispatch(&report).await {
            Ok(()) => {
                if let Err(e) = delivery.acker.ack(BasicAckOptions::default()).await {
                    warn!(execution_id = report.id, error = %e, "failed to acknowledge delivery");
                } else {
                    self.metrics.increment_completion_acks();
                    debug!(execution_id = report.id, "completion message acknowledged");
                }
            }
            Err(e) => {
                // No ack: the broker redelivers after the channel closes.
                warn!(execution_id = report.id, error = %e, "dispatch failed, leaving delivery unacked");
            }
        }
    }
}
