// ============================================================================
// mp4utils-core/src/processing/cleanup.rs
// ============================================================================
//
// CLEANUP RECONCILER: Which Originals Are Safe to Delete
//
// After orchestration, each leaf decides the fate of its source file:
//
// - successful leaf: its original goes to `delete`; a join child's own
//   intermediate output is removed too, the joined file supersedes it
// - any other leaf: its original is kept and its (partial) output removed,
//   except in legacy-join mode where an existing output is left alone
// - failed join target: its output is removed
//
// Planning only reads the file system, so it can be repeated. `apply_cleanup`
// performs the deletions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{CoreConfig, RunConfig};
use crate::discovery::find_video_files;
use crate::error::CoreResult;
use crate::external::FileSystem;
use crate::video::VideoEntity;

/// The outcome of reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    /// Original file names to delete from the source directory.
    pub delete: Vec<String>,
    /// Original file names left in place.
    pub keep: Vec<String>,
    /// Output files to remove (failed, partial or superseded).
    pub outputs_to_remove: Vec<PathBuf>,
}

/// Computes the cleanup plan for the final entity states.
///
/// `listing` is a fresh listing of video files in the source directory.
pub fn plan_cleanup<F: FileSystem>(
    entities: &[VideoEntity],
    listing: &[String],
    run: &RunConfig,
    fs: &F,
) -> CleanupPlan {
    let mut ledger = Ledger {
        scanned: listing.to_vec(),
        to_delete: Vec::new(),
        outputs_to_remove: Vec::new(),
    };

    for entity in entities {
        if entity.is_join_target() {
            if !entity.is_successful() {
                ledger.outputs_to_remove.push(entity.output_path());
            }
            for child in entity.children() {
                ledger.check_leaf(child, true, run, fs);
            }
        } else {
            ledger.check_leaf(entity, false, run, fs);
        }
    }

    let delete = uniq(ledger.to_delete);
    let keep = uniq(ledger.scanned)
        .into_iter()
        .filter(|name| !delete.contains(name))
        .collect();

    CleanupPlan {
        delete,
        keep,
        outputs_to_remove: uniq(ledger.outputs_to_remove),
    }
}

/// Working sets while walking the entities.
struct Ledger {
    scanned: Vec<String>,
    to_delete: Vec<String>,
    outputs_to_remove: Vec<PathBuf>,
}

impl Ledger {
    fn check_leaf<F: FileSystem>(
        &mut self,
        leaf: &VideoEntity,
        is_child: bool,
        run: &RunConfig,
        fs: &F,
    ) {
        let name = leaf.input_file_name();
        if leaf.is_successful() {
            self.to_delete.push(name.to_string());
            self.scanned.retain(|n| n != name);
            if is_child {
                self.outputs_to_remove.push(leaf.output_path());
            }
            return;
        }

        if !self.scanned.iter().any(|n| n == name) {
            self.scanned.push(name.to_string());
        }
        self.to_delete.retain(|n| n != name);

        let output = leaf.output_path();
        if run.is_legacy_join() && fs.exists(&output) {
            debug!("Keeping earlier output {}", output.display());
        } else {
            self.outputs_to_remove.push(output);
        }
    }
}

/// Lists the source directory and plans cleanup for it.
pub fn reconcile<F: FileSystem>(
    entities: &[VideoEntity],
    config: &CoreConfig,
    run: &RunConfig,
    fs: &F,
) -> CoreResult<CleanupPlan> {
    let listing = find_video_files(fs, &config.source_dir, config)?;
    Ok(plan_cleanup(entities, &listing, run, fs))
}

/// Removes the planned outputs and originals, logging each original.
pub fn apply_cleanup<F: FileSystem>(plan: &CleanupPlan, source_dir: &Path, fs: &F) {
    for output in &plan.outputs_to_remove {
        if fs.exists(output) {
            debug!("Removing output {}", output.display());
            fs.remove_file(output);
        }
    }

    for name in &plan.delete {
        let path = source_dir.join(name);
        fs.remove_file(&path);
        info!("DELETED: {}", path.display());
    }

    for name in &plan.keep {
        info!("KEPT: {}", source_dir.join(name).display());
    }

    info!("Cleanup finished: {} deleted, {} kept", plan.delete.len(), plan.keep.len());
}

/// Removes duplicates, keeping the first occurrence.
fn uniq<T: Clone + Eq + std::hash::Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;
    use crate::external::StdFileSystem;
    use crate::video::{DefaultSettings, VideoStatus};

    fn settings() -> DefaultSettings {
        DefaultSettings {
            audio_bitrate_kbps: 128,
            video_bitrate_kbps: 1200,
            source_dir: PathBuf::from("/nonexistent/src"),
            dest_dir: PathBuf::from("/nonexistent/dst"),
            join_dir: PathBuf::from("/nonexistent/join"),
        }
    }

    fn leaf(name: &str, status: VideoStatus) -> VideoEntity {
        let mut entity = VideoEntity::leaf(name, settings(), false);
        entity.apply_status(status, false);
        entity
    }

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_successful_leaf_is_deleted_unmentioned_is_kept() {
        let entities = vec![leaf("a.avi", VideoStatus::Successful)];
        let plan = plan_cleanup(
            &entities,
            &listing(&["a.avi", "b.avi"]),
            &RunConfig::default(),
            &StdFileSystem,
        );

        assert_eq!(plan.delete, vec!["a.avi"]);
        assert_eq!(plan.keep, vec!["b.avi"]);
        assert!(plan.outputs_to_remove.is_empty());
    }

    #[test]
    fn test_failed_leaf_is_kept_and_output_removed() {
        let entities = vec![leaf("a.avi", VideoStatus::TranscodeError)];
        let plan = plan_cleanup(&entities, &[], &RunConfig::default(), &StdFileSystem);

        assert!(plan.delete.is_empty());
        assert_eq!(plan.keep, vec!["a.avi"]);
        assert_eq!(plan.outputs_to_remove, vec![PathBuf::from("/nonexistent/dst/a.mp4")]);
    }

    #[test]
    fn test_duplicate_success_then_failure_keeps_original() {
        let entities = vec![
            leaf("a.avi", VideoStatus::Successful),
            leaf("a.avi", VideoStatus::TranscodeError),
        ];
        let plan = plan_cleanup(&entities, &listing(&["a.avi"]), &RunConfig::default(), &StdFileSystem);

        assert!(plan.delete.is_empty());
        assert_eq!(plan.keep, vec!["a.avi"]);
    }

    #[test]
    fn test_join_children() {
        let mut target = VideoEntity::join_target("out", settings());
        target.add_child(VideoEntity::leaf("a.avi", settings(), false));
        target.add_child(VideoEntity::leaf("b.avi", settings(), false));
        target.apply_status(VideoStatus::Successful, true);

        let plan = plan_cleanup(
            &[target],
            &listing(&["a.avi", "b.avi"]),
            &RunConfig::default(),
            &StdFileSystem,
        );

        assert_eq!(plan.delete, vec!["a.avi", "b.avi"]);
        assert!(plan.keep.is_empty());
        assert_eq!(
            plan.outputs_to_remove,
            vec![
                PathBuf::from("/nonexistent/dst/a.mp4"),
                PathBuf::from("/nonexistent/dst/b.mp4"),
            ]
        );
    }

    #[test]
    fn test_failed_join_target_output_removed() {
        let mut target = VideoEntity::join_target("out", settings());
        target.add_child(VideoEntity::leaf("a.avi", settings(), false));
        target.apply_status(VideoStatus::JoinError, true);

        let plan = plan_cleanup(&[target], &[], &RunConfig::new(RunMode::Normal), &StdFileSystem);

        assert!(plan.delete.is_empty());
        assert_eq!(plan.keep, vec!["a.avi"]);
        assert!(plan.outputs_to_remove.contains(&PathBuf::from("/nonexistent/join/out.mp4")));
        assert!(plan.outputs_to_remove.contains(&PathBuf::from("/nonexistent/dst/a.mp4")));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let entities = vec![
            leaf("a.avi", VideoStatus::Successful),
            leaf("b.avi", VideoStatus::InputMissing),
        ];
        let scan = listing(&["a.avi", "c.avi"]);
        let run = RunConfig::default();

        let first = plan_cleanup(&entities, &scan, &run, &StdFileSystem);
        let second = plan_cleanup(&entities, &scan, &run, &StdFileSystem);
        assert_eq!(first, second);
        assert_eq!(first.keep, vec!["c.avi", "b.avi"]);
    }

    #[test]
    fn test_uniq_keeps_first_occurrence() {
        assert_eq!(uniq(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
