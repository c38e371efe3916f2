//! Pre-run overview of what a batch will do.
//!
//! Entities whose input is missing are left out of the rows; they still
//! take part in the run and end up as `InputMissing`.

use std::path::PathBuf;

use crate::external::FileSystem;
use crate::video::VideoEntity;

/// One conversion as shown before the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub video_bitrate_kbps: u32,
    pub audio_bitrate_kbps: u32,
}

impl PlanItem {
    fn from_entity(entity: &VideoEntity) -> Self {
        Self {
            input_path: entity.input_path(),
            output_path: entity.output_path(),
            video_bitrate_kbps: entity.video_bitrate_kbps(),
            audio_bitrate_kbps: entity.audio_bitrate_kbps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRow {
    /// Start of a join group, with the joined output path.
    JoinHeader(PathBuf),
    /// A join child.
    Item(PlanItem),
    JoinFooter,
    /// A standalone conversion.
    Single(PlanItem),
}

/// Builds the overview rows for `entities`, in run order.
pub fn plan_rows<F: FileSystem>(entities: &[VideoEntity], fs: &F) -> Vec<PlanRow> {
    let mut rows = Vec::new();
    for entity in entities {
        if entity.is_join_target() {
            rows.push(PlanRow::JoinHeader(entity.output_path()));
            rows.extend(
                entity
                    .children()
                    .iter()
                    .filter(|child| fs.exists(&child.input_path()))
                    .map(|child| PlanRow::Item(PlanItem::from_entity(child))),
            );
            rows.push(PlanRow::JoinFooter);
        } else if fs.exists(&entity.input_path()) {
            rows.push(PlanRow::Single(PlanItem::from_entity(entity)));
        }
    }
    rows
}
