//! Conversion orchestration, scale fitting and post-run cleanup.
//!
//! This module serves as the central hub for the processing logic of
//! mp4utils-core: it decides output geometry, drives the external tools
//! entity by entity, and reconciles the source directory afterwards.

/// Per-entity conversion and join state machine
pub mod orchestrator;

/// Letterbox/scale-fit filter selection
pub mod scale;

/// Reconciliation of originals after a run
pub mod cleanup;

pub use cleanup::{CleanupPlan, apply_cleanup, plan_cleanup, reconcile};
pub use orchestrator::ConversionOrchestrator;
pub use scale::{Dimensions, ScaleFit, compute_fit};

use std::time::Instant;

use crate::config::CoreConfig;
use crate::external::{FileSystem, Joiner, MediaProber, Transcoder};
use crate::reporting::RunSummary;
use crate::video::VideoEntity;

/// Converts and joins every entity, then reconciles the source directory.
///
/// Per-entity failures end up in the entities' statuses and in the
/// returned summary. An unlistable source directory is logged and treated
/// as empty, so only originals of successful conversions are deleted.
pub fn process_batch<P, T, J, F>(
    orchestrator: &ConversionOrchestrator<P, T, J, F>,
    entities: &mut [VideoEntity],
    config: &CoreConfig,
) -> RunSummary
where
    P: MediaProber,
    T: Transcoder,
    J: Joiner,
    F: FileSystem,
{
    let start = Instant::now();
    orchestrator.process_all(entities);

    let fs = orchestrator.file_system();
    let run = orchestrator.run_config();
    let plan = match reconcile(entities, config, run, fs) {
        Ok(plan) => plan,
        Err(e) => {
            log::warn!(
                "Cannot list source directory {}: {}",
                config.source_dir.display(),
                e
            );
            plan_cleanup(entities, &[], run, fs)
        }
    };
    apply_cleanup(&plan, &config.source_dir, fs);

    RunSummary::from_run(entities, &plan, start.elapsed())
}
