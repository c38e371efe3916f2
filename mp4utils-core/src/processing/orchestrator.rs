// ============================================================================
// mp4utils-core/src/processing/orchestrator.rs
// ============================================================================
//
// CONVERSION ORCHESTRATOR: Per-Entity State Machine
//
// Drives every entity of a batch through conversion and joining, strictly
// sequentially and in list order. Outcomes are written to the entity's
// status; nothing here returns an error to the caller.
//
// LEAF (standalone file or join child):
//   input missing          -> InputMissing   (no subprocess)
//   probe fails            -> TranscodeError (no transcode)
//   ffmpeg fails to start  -> TranscodeError
//   ffmpeg exits non-zero  -> TranscodeError
//   ffmpeg exits zero      -> Successful
//
// JOIN TARGET:
//   no children            -> JoinError
//   any child fails        -> JoinError      (joiner never runs; converted
//                                             siblings become JoinError too)
//   joiner fails           -> JoinError      (cascaded to the children)
//   joiner succeeds        -> Successful     (cascaded to the children)
//
// In legacy-join mode children are not converted again. Each child's
// participation is decided by whether the join target's own output already
// exists; a missing one counts as a child failure.

use std::path::PathBuf;

use log::{error, info, warn};

use crate::config::RunConfig;
use crate::error::command_failed_error;
use crate::external::{FileSystem, Joiner, MediaProber, TranscodeJob, Transcoder};
use crate::processing::scale::compute_fit;
use crate::video::{VideoEntity, VideoStatus};

/// Runs conversions and joins through the injected collaborators.
pub struct ConversionOrchestrator<P, T, J, F>
where
    P: MediaProber,
    T: Transcoder,
    J: Joiner,
    F: FileSystem,
{
    prober: P,
    transcoder: T,
    joiner: J,
    fs: F,
    run: RunConfig,
}

impl<P, T, J, F> ConversionOrchestrator<P, T, J, F>
where
    P: MediaProber,
    T: Transcoder,
    J: Joiner,
    F: FileSystem,
{
    pub fn new(prober: P, transcoder: T, joiner: J, fs: F, run: RunConfig) -> Self {
        Self {
            prober,
            transcoder,
            joiner,
            fs,
            run,
        }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run
    }

    /// Processes every entity in order.
    pub fn process_all(&self, entities: &mut [VideoEntity]) {
        let total = entities.len();
        for (index, entity) in entities.iter_mut().enumerate() {
            info!("----------------------------------------");
            info!(
                "[{}/{}] {}",
                index + 1,
                total,
                if entity.is_join_target() {
                    format!("Joining into {}", entity.output_path().display())
                } else {
                    format!("Converting {}", entity.input_path().display())
                }
            );
            self.process_entity(entity);
        }
    }

    /// Processes one top-level entity, including its children.
    pub fn process_entity(&self, entity: &mut VideoEntity) {
        if entity.is_join_target() {
            self.process_join(entity);
        } else {
            let status = self.process_leaf(entity);
            entity.apply_status(status, false);
        }
    }

    fn process_leaf(&self, leaf: &VideoEntity) -> VideoStatus {
        let input_path = leaf.input_path();
        if !self.fs.exists(&input_path) {
            error!("Input not found: {}", input_path.display());
            return VideoStatus::InputMissing;
        }

        let dimensions = match self.prober.probe(&input_path) {
            Ok(dimensions) => dimensions,
            Err(e) => {
                error!(
                    "Cannot obtain video dimensions for {}: {}",
                    input_path.display(),
                    e
                );
                return VideoStatus::TranscodeError;
            }
        };

        let scale = compute_fit(dimensions);
        info!(
            "Converting {} ({}) -> {} [{}]",
            input_path.display(),
            dimensions,
            leaf.output_path().display(),
            scale
        );

        let job = TranscodeJob {
            input_path,
            output_path: leaf.output_path(),
            scale,
            video_bitrate_kbps: leaf.video_bitrate_kbps(),
            audio_bitrate_kbps: leaf.audio_bitrate_kbps(),
        };

        match self.transcoder.transcode(&job) {
            Ok(output) if output.success() => {
                info!("Converted {}", job.output_path.display());
                VideoStatus::Successful
            }
            Ok(output) => {
                error!(
                    "{}",
                    command_failed_error("ffmpeg", output.code, output.stderr.trim())
                );
                VideoStatus::TranscodeError
            }
            Err(e) => {
                error!("{}", e);
                VideoStatus::TranscodeError
            }
        }
    }

    fn process_join(&self, target: &mut VideoEntity) {
        if target.children().is_empty() {
            error!(
                "Join target {} has no children; nothing to join",
                target.output_file_name()
            );
            target.apply_status(VideoStatus::JoinError, false);
            return;
        }

        let target_output = target.output_path();
        let legacy_join = self.run.is_legacy_join();
        let mut failures = 0usize;
        let mut inputs: Vec<PathBuf> = Vec::with_capacity(target.children().len());

        for child in target.children_mut() {
            let status = if legacy_join {
                if self.fs.exists(&target_output) {
                    VideoStatus::Successful
                } else {
                    warn!(
                        "Skipping {}: {} does not exist",
                        child.input_file_name(),
                        target_output.display()
                    );
                    VideoStatus::Blank
                }
            } else {
                self.process_leaf(child)
            };
            child.apply_status(status, false);

            if status == VideoStatus::Successful {
                inputs.push(child.output_path());
            } else {
                failures += 1;
            }
        }

        if failures > 0 {
            error!(
                "Not joining {}: {} child conversion(s) failed; originals are kept",
                target_output.display(),
                failures
            );
            target.apply_status(VideoStatus::JoinError, false);
            for child in target.children_mut() {
                if child.is_successful() {
                    child.apply_status(VideoStatus::JoinError, false);
                }
            }
            return;
        }

        self.fs.remove_file(&target_output);

        match self.joiner.join(&inputs, &target_output) {
            Ok(output) if output.success() => {
                info!("Joined {} file(s) into {}", inputs.len(), target_output.display());
                target.apply_status(VideoStatus::Successful, true);
            }
            Ok(output) => {
                error!(
                    "{}",
                    command_failed_error("avidemux", output.code, output.stderr.trim())
                );
                target.apply_status(VideoStatus::JoinError, true);
            }
            Err(e) => {
                error!("Join into {} failed: {}", target_output.display(), e);
                target.apply_status(VideoStatus::JoinError, true);
            }
        }
    }
}
