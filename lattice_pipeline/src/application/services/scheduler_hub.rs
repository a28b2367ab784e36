// /////////////////////////////////////////////////////////////////////////////
// Lattice Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Scheduler Hub
//!
//! Routes task-execution completion records to the per-stage scheduler
//! owning the record's `pipeline_stage_id`. A record for an unregistered
//! stage is refused (`false`) rather than failed: the dispatcher retries
//! after a delay, giving the control plane time to register the stage.
//!
//! Registration is dynamic; the control plane adds and removes stage
//! schedulers at runtime while the consumer keeps delivering.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use lattice_pipeline_domain::{SchedulerError, StageScheduler, TaskExecutionReport};

/// Facade over the registry of per-stage schedulers.
#[derive(Default)]
pub struct SchedulerHub {
    schedulers: RwLock<HashMap<i64, Arc<dyn StageScheduler>>>,
}

impl SchedulerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scheduler under its own stage id, replacing any previous
    /// registration for that stage.
    pub fn register(&self, scheduler: Arc<dyn StageScheduler>) {
        let stage_id = scheduler.pipeline_stage_id();
        self.schedulers.write().insert(stage_id, scheduler);
        debug!(stage_id, "registered stage scheduler");
    }

    /// Removes the scheduler for a stage, if any.
    pub fn deregister(&self, stage_id: i64) -> bool {
        let removed = self.schedulers.write().remove(&stage_id).is_some();
        if removed {
            debug!(stage_id, "deregistered stage scheduler");
        }
        removed
    }

    /// Hands a completion record to the scheduler owning its stage.
    ///
    /// Returns `Ok(false)` when no scheduler owns the stage; the caller is
    /// expected to retry later.
    pub async fn on_task_execution_complete(
        &self,
        report: &TaskExecutionReport,
    ) -> Result<bool, SchedulerError> {
        let scheduler = self.schedulers.read().get(&report.pipeline_stage_id).cloned();

        match scheduler {
            None => {
                debug!(
                    stage_id = report.pipeline_stage_id,
                    execution_id = report.id,
                    "no scheduler registered for stage"
                );
                Ok(false)
            }
            Some(scheduler) => scheduler.on_task_execution_complete(report).await,
        }
    }
}
