//! Summary reporting module
//!
//! Tallies the final entity states and cleanup results of a run.

use std::fmt;
use std::time::Duration;

use crate::processing::CleanupPlan;
use crate::video::{VideoEntity, VideoStatus};

/// Display order of statuses, successful first.
const STATUS_ORDER: [VideoStatus; 5] = [
    VideoStatus::Successful,
    VideoStatus::InputMissing,
    VideoStatus::TranscodeError,
    VideoStatus::JoinError,
    VideoStatus::Blank,
];

fn slot(status: VideoStatus) -> usize {
    STATUS_ORDER.iter().position(|s| *s == status).unwrap_or(STATUS_ORDER.len() - 1)
}

/// Counts of one kind of entity by final status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: [usize; 5],
}

impl StatusCounts {
    pub fn record(&mut self, status: VideoStatus) {
        self.counts[slot(status)] += 1;
    }

    pub fn get(&self, status: VideoStatus) -> usize {
        self.counts[slot(status)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Entities that did not end as `Successful`.
    pub fn unsuccessful(&self) -> usize {
        self.total() - self.get(VideoStatus::Successful)
    }

    /// Non-zero counts, successful first.
    pub fn iter(&self) -> impl Iterator<Item = (VideoStatus, usize)> + '_ {
        STATUS_ORDER
            .iter()
            .zip(self.counts.iter())
            .filter(|(_, count)| **count > 0)
            .map(|(status, count)| (*status, *count))
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return f.write_str("none");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(status, count)| format!("{count} {status}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Standalone files and join children.
    pub leaves: StatusCounts,
    pub join_targets: StatusCounts,
    pub deleted: usize,
    pub kept: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn from_run(entities: &[VideoEntity], plan: &CleanupPlan, elapsed: Duration) -> Self {
        let mut summary = RunSummary {
            deleted: plan.delete.len(),
            kept: plan.keep.len(),
            elapsed,
            ..Default::default()
        };
        for entity in entities {
            if entity.is_join_target() {
                summary.join_targets.record(entity.status());
            }
            for leaf in entity.leaves() {
                summary.leaves.record(leaf.status());
            }
        }
        summary
    }

    /// True when every leaf and join target succeeded.
    pub fn all_successful(&self) -> bool {
        self.leaves.unsuccessful() == 0 && self.join_targets.unsuccessful() == 0
    }
}
