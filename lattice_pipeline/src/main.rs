// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Scheduler Entry Point
//!
//! Composition root of the scheduling core: parses the CLI, loads
//! configuration, bootstraps the database, wires the collaborators (all
//! injected, no ambient globals), spawns one supervised ingestor per
//! project plus the completion consumer, and coordinates graceful shutdown
//! on Unix signals.

use anyhow::Result;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use lattice_pipeline_bootstrap::signals::{SystemSignals, UnixSignalHandler};
use lattice_pipeline_bootstrap::{Cli, ShutdownCoordinator};
use lattice_pipeline_domain::{
    Clock, ControlPlane, ProjectRepository, SystemClock, TaskMetricsSink, TileStatusRepository,
};

use lattice_pipeline::application::services::{
    CompletionDispatcher, ProjectIngestor, SchedulerHub,
};
use lattice_pipeline::infrastructure::adapters::PathMapper;
use lattice_pipeline::infrastructure::config::AppConfig;
use lattice_pipeline::infrastructure::messaging::CompletionConsumer;
use lattice_pipeline::infrastructure::metrics::{MetricsService, PrometheusTaskMetricsSink};
use lattice_pipeline::infrastructure::repositories::{
    schema, LocalControlPlane, SqliteProjectRepository, SqliteTileStatusRepository,
};
use lattice_pipeline::infrastructure::runtime::{join_supervised, spawn_supervised};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize tracing
    let level = match &cli.log_level {
        Some(directive) => tracing::Level::from_str(directive)
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", directive, e))?,
        None => tracing::Level::INFO,
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Starting lattice pipeline scheduler");

    let config = AppConfig::load(&cli.config)?;
    if cli.check_config {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }

    // Infrastructure
    let metrics = Arc::new(MetricsService::new()?);
    let pool = schema::initialize_database(&config.database.url).await?;

    let projects: Arc<dyn ProjectRepository> = Arc::new(SqliteProjectRepository::new(pool.clone()));
    let tiles: Arc<dyn TileStatusRepository> = Arc::new(SqliteTileStatusRepository::new(pool.clone()));
    let control_plane: Arc<dyn ControlPlane> = Arc::new(LocalControlPlane::new(pool.clone()));
    let path_mapper = Arc::new(PathMapper::new(config.path_mappings.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    let coordinator = ShutdownCoordinator::default();

    // Completion intake path. Per-stage schedulers are registered into the
    // hub by the control-plane integration; until a stage is registered,
    // records for it are refused and retried.
    let hub = Arc::new(SchedulerHub::new());
    let sink: Arc<dyn TaskMetricsSink> = Arc::new(PrometheusTaskMetricsSink::new(metrics.clone()));
    let dispatcher = Arc::new(CompletionDispatcher::new(
        sink,
        hub.clone(),
        metrics.clone(),
        coordinator.token(),
    ));
    let consumer = CompletionConsumer::new(
        config.broker.url.clone(),
        dispatcher,
        metrics.clone(),
        coordinator.token(),
    );

    // One supervised ingestor per registered project
    let tick_interval = Duration::from_secs(config.ingestor.tick_interval_secs);
    let registered = projects.list_all().await?;
    info!(projects = registered.len(), "spawning project ingestors");

    let mut ingestor_handles = Vec::with_capacity(registered.len());
    for project in &registered {
        let ingestor = ProjectIngestor::new(
            project.id(),
            projects.clone(),
            tiles.clone(),
            control_plane.clone(),
            path_mapper.clone(),
            clock.clone(),
            metrics.clone(),
            tick_interval,
            coordinator.token(),
        );
        info!(project = %project.id(), name = project.name(), "starting ingestor");
        ingestor_handles.push(spawn_supervised("project-ingestor", async move {
            ingestor.run().await
        }));
    }

    let consumer_handle = spawn_supervised("completion-consumer", async move { consumer.run().await });

    // Block until a shutdown signal arrives
    let signal_coordinator = coordinator.clone();
    UnixSignalHandler::new()
        .wait_for_signal(Box::new(move || signal_coordinator.initiate_shutdown()))
        .await;

    // Workers observe the cancelled tokens and finish their in-flight work
    for handle in ingestor_handles {
        if let Err(e) = join_supervised(handle).await {
            error!(error = %e, "ingestor terminated with error");
        }
    }
    if let Err(e) = join_supervised(consumer_handle).await {
        error!(error = %e, "consumer terminated with error");
    }

    coordinator.complete_shutdown();
    info!("scheduler shut down");
    Ok(())
}
