// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Completion Intake Integration Tests
//!
//! Exercises the completion path below the broker socket: payload decode,
//! metrics-then-dispatch ordering, the 10-second retry policy against a
//! slow-to-register stage, and the at-least-once accounting the consumer
//! relies on.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lattice_pipeline_bootstrap::CancellationToken;
use lattice_pipeline_domain::services::tile_mux::MuxOutcome;
use lattice_pipeline_domain::{
    SchedulerError, StageScheduler, TaskExecutionReport, TaskMetricsSink, Tile, TilePlan,
    TileStatusRecord,
};

use lattice_pipeline::application::services::{CompletionDispatcher, SchedulerHub};
use lattice_pipeline::infrastructure::messaging::decode_report;
use lattice_pipeline::infrastructure::metrics::{MetricsService, PrometheusTaskMetricsSink};

/// Sink double counting writes and optionally failing.
struct CountingSink {
    writes: AtomicUsize,
}

#[async_trait]
impl TaskMetricsSink for CountingSink {
    async fn write_task_execution(&self, _report: &TaskExecutionReport) -> Result<(), SchedulerError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Stage scheduler double that refuses until `accept_after` calls happened.
struct SlowToRegister {
    stage_id: i64,
    accept_after: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl StageScheduler for SlowToRegister {
    fn pipeline_stage_id(&self) -> i64 {
        self.stage_id
    }

    async fn refresh_tile_status(&self) -> Result<(), SchedulerError> {
        Ok(())
    }

    fn mux_input_output_tiles(&self, _input: &[Tile], _output: &[TileStatusRecord]) -> MuxOutcome {
        MuxOutcome::Plan(TilePlan::default())
    }

    async fn on_task_execution_complete(
        &self,
        _report: &TaskExecutionReport,
    ) -> Result<bool, SchedulerError> {
        Ok(self.calls.fetch_add(1, Ordering::SeqCst) >= self.accept_after)
    }
}

fn report(stage_id: i64) -> TaskExecutionReport {
    let submitted = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
    TaskExecutionReport {
        id: 1001,
        worker_id: 7,
        tile_id: 31,
        pipeline_stage_id: stage_id,
        execution_status_code: 1,
        completion_status_code: 4,
        submitted_at: submitted,
        started_at: submitted + chrono::Duration::seconds(1),
        completed_at: submitted + chrono::Duration::seconds(61),
        cpu_time_seconds: 55.0,
        max_cpu_percent: 280.0,
        max_memory_mb: 2048.0,
        exit_code: 0,
    }
}

#[tokio::test]
async fn test_wire_payload_flows_through_dispatch() {
    // A decoded wire payload drives the dispatcher exactly like a handmade
    // report: one metrics write, one confirmed dispatch.
    let payload = serde_json::json!({
        "id": 1001, "worker_id": 7, "tile_id": 31, "pipeline_stage_id": 3,
        "execution_status_code": 1, "completion_status_code": 4,
        "submitted_at": 1748768400000i64,
        "started_at": 1748768401000i64,
        "completed_at": 1748768461000i64,
        "cpu_time_seconds": 55.0, "max_cpu_percent": 280.0,
        "max_memory_mb": 2048.0, "exit_code": 0
    })
    .to_string();

    let decoded = decode_report(payload.as_bytes()).unwrap();
    assert_eq!(decoded.execution_duration(), chrono::Duration::seconds(60));

    let sink = Arc::new(CountingSink {
        writes: AtomicUsize::new(0),
    });
    let hub = Arc::new(SchedulerHub::new());
    hub.register(Arc::new(SlowToRegister {
        stage_id: 3,
        accept_after: 0,
        calls: AtomicUsize::new(0),
    }));

    let dispatcher = CompletionDispatcher::new(
        sink.clone(),
        hub,
        Arc::new(MetricsService::new().unwrap()),
        CancellationToken::standalone(),
    );

    dispatcher.dispatch(&decoded).await.unwrap();
    assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refused_twice_then_accepted_after_retry_delays() {
    // S6: the hub refuses twice and accepts on the third call, 10 s apart.
    // Success (and hence the single ack upstream) happens only after the
    // third call; the metrics write is not repeated by retries.
    let sink = Arc::new(CountingSink {
        writes: AtomicUsize::new(0),
    });
    let scheduler = Arc::new(SlowToRegister {
        stage_id: 5,
        accept_after: 2,
        calls: AtomicUsize::new(0),
    });
    let hub = Arc::new(SchedulerHub::new());
    hub.register(scheduler.clone());

    let dispatcher = CompletionDispatcher::new(
        sink.clone(),
        hub,
        Arc::new(MetricsService::new().unwrap()),
        CancellationToken::standalone(),
    );

    let started = tokio::time::Instant::now();
    dispatcher.dispatch(&report(5)).await.unwrap();

    assert_eq!(scheduler.calls.load(Ordering::SeqCst), 3);
    assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
    // Two retry delays of 10 s each elapsed on the paused clock.
    assert!(started.elapsed() >= Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_unregistered_stage_retries_until_registration() {
    // A record arrives before the control plane registered its stage; the
    // dispatcher keeps retrying, and succeeds once registration happens.
    let sink = Arc::new(CountingSink {
        writes: AtomicUsize::new(0),
    });
    let hub = Arc::new(SchedulerHub::new());
    let dispatcher = Arc::new(CompletionDispatcher::new(
        sink,
        hub.clone(),
        Arc::new(MetricsService::new().unwrap()),
        CancellationToken::standalone(),
    ));

    let registering_hub = hub.clone();
    let registration = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(35)).await;
        registering_hub.register(Arc::new(SlowToRegister {
            stage_id: 9,
            accept_after: 0,
            calls: AtomicUsize::new(0),
        }));
    });

    dispatcher.dispatch(&report(9)).await.unwrap();
    registration.await.unwrap();
}

#[tokio::test]
async fn test_prometheus_sink_end_to_end() {
    let metrics = Arc::new(MetricsService::new().unwrap());
    let sink = Arc::new(PrometheusTaskMetricsSink::new(metrics.clone()));
    let hub = Arc::new(SchedulerHub::new());
    hub.register(Arc::new(SlowToRegister {
        stage_id: 2,
        accept_after: 0,
        calls: AtomicUsize::new(0),
    }));

    let dispatcher = CompletionDispatcher::new(sink, hub, metrics.clone(), CancellationToken::standalone());
    dispatcher.dispatch(&report(2)).await.unwrap();
    dispatcher.dispatch(&report(2)).await.unwrap();

    let text = metrics.gather().unwrap();
    assert!(text.contains("lattice_pipeline_task_executions_total 2"));
}
