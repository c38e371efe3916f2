// ============================================================================
// mp4utils-core/src/video/entity.rs
// ============================================================================
//
// VIDEO ENTITY: One Media Item and Its Derived Paths
//
// A VideoEntity is either a standalone file, a join target (the merged
// output of a group), or a child of a join target. Children are owned by
// their parent; the tree is at most two levels deep.
//
// NAMING RULES (applied once, at construction):
// - join target: output name == input name
// - other entity: output name == input name with a random suffix, unless
//   the suffix is disabled
// - every output name is finally forced to a `.mp4` extension
//
// Status is written only by the orchestrator, through `apply_status`.

use std::fmt;
use std::path::{Path, PathBuf};

use super::naming::{append_random_suffix, auto_append_extension, force_mp4_extension};

/// Outcome of processing an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VideoStatus {
    /// Not processed (yet), or skipped without a verdict.
    #[default]
    Blank,
    Successful,
    InputMissing,
    /// Probing or transcoding failed.
    TranscodeError,
    JoinError,
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VideoStatus::Blank => "not processed",
            VideoStatus::Successful => "successful",
            VideoStatus::InputMissing => "input missing",
            VideoStatus::TranscodeError => "transcode error",
            VideoStatus::JoinError => "join error",
        };
        f.write_str(label)
    }
}

/// Bitrates and directories an entity is converted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSettings {
    pub audio_bitrate_kbps: u32,
    pub video_bitrate_kbps: u32,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub join_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntity {
    input_file_name: String,
    output_file_name: String,
    is_join_target: bool,
    children: Vec<VideoEntity>,
    use_random_suffix: bool,
    status: VideoStatus,
    settings: DefaultSettings,
}

impl VideoEntity {
    /// Creates a leaf: a standalone file or a join child.
    pub fn leaf(file_name: &str, settings: DefaultSettings, use_random_suffix: bool) -> Self {
        Self::build(file_name, settings, false, use_random_suffix)
    }

    /// Creates a join target. Join targets never get a random suffix.
    pub fn join_target(file_name: &str, settings: DefaultSettings) -> Self {
        Self::build(file_name, settings, true, false)
    }

    fn build(
        file_name: &str,
        settings: DefaultSettings,
        is_join_target: bool,
        use_random_suffix: bool,
    ) -> Self {
        let input_file_name = auto_append_extension(file_name);
        let output_file_name = if !is_join_target && use_random_suffix {
            append_random_suffix(&input_file_name)
        } else {
            input_file_name.clone()
        };

        Self {
            output_file_name: force_mp4_extension(&output_file_name),
            input_file_name,
            is_join_target,
            children: Vec::new(),
            use_random_suffix,
            status: VideoStatus::Blank,
            settings,
        }
    }

    pub fn input_file_name(&self) -> &str {
        &self.input_file_name
    }

    pub fn output_file_name(&self) -> &str {
        &self.output_file_name
    }

    pub fn is_join_target(&self) -> bool {
        self.is_join_target
    }

    pub fn uses_random_suffix(&self) -> bool {
        self.use_random_suffix
    }

    pub fn settings(&self) -> &DefaultSettings {
        &self.settings
    }

    pub fn audio_bitrate_kbps(&self) -> u32 {
        self.settings.audio_bitrate_kbps
    }

    pub fn video_bitrate_kbps(&self) -> u32 {
        self.settings.video_bitrate_kbps
    }

    /// Source file path, under the source directory.
    pub fn input_path(&self) -> PathBuf {
        self.settings.source_dir.join(&self.input_file_name)
    }

    /// Output path: under the join directory for join targets, else the destination directory.
    pub fn output_path(&self) -> PathBuf {
        let dir: &Path = if self.is_join_target {
            &self.settings.join_dir
        } else {
            &self.settings.dest_dir
        };
        dir.join(&self.output_file_name)
    }

    pub fn add_child(&mut self, child: VideoEntity) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[VideoEntity] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [VideoEntity] {
        &mut self.children
    }

    pub fn status(&self) -> VideoStatus {
        self.status
    }

    pub fn is_successful(&self) -> bool {
        self.status == VideoStatus::Successful
    }

    /// Sets the status, optionally copying it onto every child.
    pub fn apply_status(&mut self, status: VideoStatus, cascade_to_children: bool) {
        self.status = status;
        if cascade_to_children {
            for child in &mut self.children {
                child.status = status;
            }
        }
    }

    /// Iterates over the entities that are actually transcoded from a source file.
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &VideoEntity> + '_> {
        if self.is_join_target {
            Box::new(self.children.iter())
        } else {
            Box::new(std::iter::once(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DefaultSettings {
        DefaultSettings {
            audio_bitrate_kbps: 128,
            video_bitrate_kbps: 1200,
            source_dir: PathBuf::from("/src"),
            dest_dir: PathBuf::from("/dst"),
            join_dir: PathBuf::from("/join"),
        }
    }

    #[test]
    fn test_leaf_output_always_mp4() {
        for input in ["a.avi", "b.mkv", "c.MOV", "d", "e.mp4"] {
            let with_suffix = VideoEntity::leaf(input, settings(), true);
            let without_suffix = VideoEntity::leaf(input, settings(), false);
            assert!(with_suffix.output_file_name().ends_with(".mp4"), "{input}");
            assert!(without_suffix.output_file_name().ends_with(".mp4"), "{input}");
        }
    }

    #[test]
    fn test_leaf_without_suffix_keeps_stem() {
        let entity = VideoEntity::leaf("holiday.avi", settings(), false);
        assert_eq!(entity.input_file_name(), "holiday.avi");
        assert_eq!(entity.output_file_name(), "holiday.mp4");
    }

    #[test]
    fn test_leaf_with_suffix_differs_from_input() {
        let entity = VideoEntity::leaf("holiday.mp4", settings(), true);
        assert_ne!(entity.output_file_name(), entity.input_file_name());
        assert!(entity.output_file_name().starts_with("holiday_"));
        assert_eq!(entity.output_file_name().len(), "holiday_.mp4".len() + 8);
    }

    #[test]
    fn test_join_target_output_equals_input() {
        let target = VideoEntity::join_target("merged.mp4", settings());
        assert_eq!(target.output_file_name(), target.input_file_name());
        assert!(target.is_join_target());
        assert!(!target.uses_random_suffix());

        let bare = VideoEntity::join_target("merged", settings());
        assert_eq!(bare.input_file_name(), "merged.mp4");
        assert_eq!(bare.output_file_name(), "merged.mp4");
    }

    #[test]
    fn test_paths_resolve_against_directories() {
        let leaf = VideoEntity::leaf("a.avi", settings(), false);
        assert_eq!(leaf.input_path(), PathBuf::from("/src/a.avi"));
        assert_eq!(leaf.output_path(), PathBuf::from("/dst/a.mp4"));

        let target = VideoEntity::join_target("out.mp4", settings());
        assert_eq!(target.output_path(), PathBuf::from("/join/out.mp4"));
    }

    #[test]
    fn test_apply_status_cascade() {
        let mut target = VideoEntity::join_target("out.mp4", settings());
        target.add_child(VideoEntity::leaf("a.mp4", settings(), false));
        target.add_child(VideoEntity::leaf("b.mp4", settings(), false));

        target.apply_status(VideoStatus::JoinError, false);
        assert_eq!(target.status(), VideoStatus::JoinError);
        assert!(target.children().iter().all(|c| c.status() == VideoStatus::Blank));

        target.apply_status(VideoStatus::Successful, true);
        assert!(target.is_successful());
        assert!(target.children().iter().all(VideoEntity::is_successful));
    }

    #[test]
    fn test_leaves() {
        let standalone = VideoEntity::leaf("a.mp4", settings(), false);
        assert_eq!(standalone.leaves().count(), 1);

        let mut target = VideoEntity::join_target("out.mp4", settings());
        assert_eq!(target.leaves().count(), 0);
        target.add_child(VideoEntity::leaf("a.mp4", settings(), false));
        target.add_child(VideoEntity::leaf("b.mp4", settings(), false));
        let names: Vec<_> = target.leaves().map(VideoEntity::input_file_name).collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);
    }
}
