// ============================================================================
// mp4utils-core/src/script/interpreter.rs
// ============================================================================
//
// SCRIPT LINE INTERPRETER: Tokens to VideoEntities
//
// Turns the tokens of one line into entities, applying per-line bitrate
// overrides and the run mode's line filter:
//
// - legacy-convert drops lines that name a join target
// - legacy-join drops lines that do not, and only keeps children whose
//   converted output is already on disk
//
// Every child name on a kept line is reported as consumed, so the source
// directory scan does not convert it a second time.

use crate::config::RunConfig;
use crate::external::FileSystem;
use crate::video::{DefaultSettings, VideoEntity};

use super::lexer::ScriptToken;

/// Entities produced by one script line, plus the file names it claims.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineResult {
    pub entities: Vec<VideoEntity>,
    pub consumed_filenames: Vec<String>,
}

/// Interprets the tokens of one line.
///
/// Without a separator every bareword is a standalone file. With one, the
/// last bareword before it names the join target and the words after it
/// are its children.
pub fn interpret_line<F: FileSystem>(
    tokens: &[ScriptToken],
    run: &RunConfig,
    defaults: &DefaultSettings,
    fs: &F,
) -> LineResult {
    let mut settings = defaults.clone();
    let mut join_name: Option<&str> = None;
    let mut main_words: Vec<&str> = Vec::new();
    let mut child_names: Vec<&str> = Vec::new();
    let mut saw_separator = false;

    for token in tokens {
        match token {
            ScriptToken::VideoBitrateOverride(kbps) => settings.video_bitrate_kbps = *kbps,
            ScriptToken::AudioBitrateOverride(kbps) => settings.audio_bitrate_kbps = *kbps,
            ScriptToken::JoinTargetName(name) => {
                join_name = Some(name);
                main_words.push(name);
            }
            ScriptToken::Separator => saw_separator = true,
            ScriptToken::ChildFileName(name) => child_names.push(name),
        }
    }

    if !saw_separator {
        join_name = None;
        child_names = main_words;
    }

    if child_names.is_empty() && join_name.is_none() {
        return LineResult::default();
    }

    if !run.accepts_line(join_name.is_some()) {
        log::debug!(
            "Skipping line in {} mode: {}",
            run.mode,
            tokens.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
        );
        return LineResult::default();
    }

    let use_random_suffix = run.random_suffix_enabled();
    let consumed_filenames: Vec<String> = child_names.iter().map(|n| n.to_string()).collect();

    let entities = match join_name {
        Some(target_name) => {
            let mut target = VideoEntity::join_target(target_name, settings.clone());
            for name in &child_names {
                let child = VideoEntity::leaf(name, settings.clone(), use_random_suffix);
                if run.is_legacy_join() && !fs.exists(&child.output_path()) {
                    log::info!(
                        "Excluding {} from join {}: no converted output at {}",
                        child.input_file_name(),
                        target.output_file_name(),
                        child.output_path().display()
                    );
                    continue;
                }
                target.add_child(child);
            }
            vec![target]
        }
        None => child_names
            .iter()
            .map(|name| VideoEntity::leaf(name, settings.clone(), use_random_suffix))
            .collect(),
    };

    LineResult {
        entities,
        consumed_filenames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;
    use crate::error::CoreResult;
    use crate::script::tokenize_line;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    /// Answers `exists` from a fixed set of paths.
    struct FixedFs(HashSet<PathBuf>);

    impl FileSystem for FixedFs {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
        fn remove_file(&self, _path: &Path) {}
        fn list_files(&self, _dir: &Path) -> CoreResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn defaults() -> DefaultSettings {
        DefaultSettings {
            audio_bitrate_kbps: 128,
            video_bitrate_kbps: 1200,
            source_dir: PathBuf::from("/src"),
            dest_dir: PathBuf::from("/dst"),
            join_dir: PathBuf::from("/join"),
        }
    }

    fn interpret(line: &str, mode: RunMode) -> LineResult {
        let tokens = tokenize_line(line).unwrap();
        interpret_line(&tokens, &RunConfig::new(mode), &defaults(), &FixedFs(HashSet::new()))
    }

    #[test]
    fn test_blank_line_is_noop() {
        assert_eq!(interpret("", RunMode::Normal), LineResult::default());
    }

    #[test]
    fn test_join_line_with_overrides() {
        let result = interpret("bv:3000 ba:96 out.mp4 | a.avi b.mkv", RunMode::Normal);

        assert_eq!(result.entities.len(), 1);
        let target = &result.entities[0];
        assert!(target.is_join_target());
        assert_eq!(target.output_file_name(), "out.mp4");
        assert_eq!(target.video_bitrate_kbps(), 3000);
        assert_eq!(target.audio_bitrate_kbps(), 96);

        let names: Vec<&str> = target.children().iter().map(|c| c.input_file_name()).collect();
        assert_eq!(names, vec!["a.avi", "b.mkv"]);
        for child in target.children() {
            assert_eq!(child.video_bitrate_kbps(), 3000);
            assert!(child.uses_random_suffix());
            assert!(child.output_file_name().ends_with(".mp4"));
        }
        assert_eq!(result.consumed_filenames, vec!["a.avi", "b.mkv"]);
    }

    #[test]
    fn test_single_word_is_standalone() {
        let result = interpret("ba:64 clip.avi", RunMode::Normal);

        assert_eq!(result.entities.len(), 1);
        let entity = &result.entities[0];
        assert!(!entity.is_join_target());
        assert_eq!(entity.input_file_name(), "clip.avi");
        assert_eq!(entity.audio_bitrate_kbps(), 64);
        assert_eq!(entity.video_bitrate_kbps(), 1200);
        assert_eq!(result.consumed_filenames, vec!["clip.avi"]);
    }

    #[test]
    fn test_several_words_without_separator_are_standalone() {
        let result = interpret("a.avi b", RunMode::Normal);
        let names: Vec<&str> = result.entities.iter().map(|e| e.input_file_name()).collect();
        assert_eq!(names, vec!["a.avi", "b.mp4"]);
        assert!(result.entities.iter().all(|e| !e.is_join_target()));
    }

    #[test]
    fn test_last_join_name_wins() {
        let result = interpret("first second | a.avi", RunMode::Normal);
        assert_eq!(result.entities[0].input_file_name(), "second.mp4");
    }

    #[test]
    fn test_only_overrides_is_noop() {
        assert_eq!(interpret("bv:900 ba:64", RunMode::Normal), LineResult::default());
    }

    #[test]
    fn test_legacy_convert_drops_join_lines() {
        assert!(interpret("out | a.avi", RunMode::LegacyConvert).entities.is_empty());

        let result = interpret("a.avi", RunMode::LegacyConvert);
        assert_eq!(result.entities.len(), 1);
        assert!(!result.entities[0].uses_random_suffix());
        assert_eq!(result.entities[0].output_file_name(), "a.mp4");
    }

    #[test]
    fn test_legacy_join_drops_standalone_lines() {
        assert!(interpret("a.avi", RunMode::LegacyJoin).entities.is_empty());
    }

    #[test]
    fn test_legacy_join_keeps_only_converted_children() {
        let tokens = tokenize_line("out | a.avi b.avi").unwrap();
        let fs = FixedFs(HashSet::from([PathBuf::from("/dst/a.mp4")]));
        let result = interpret_line(&tokens, &RunConfig::new(RunMode::LegacyJoin), &defaults(), &fs);

        let target = &result.entities[0];
        let names: Vec<&str> = target.children().iter().map(|c| c.input_file_name()).collect();
        assert_eq!(names, vec!["a.avi"]);
        assert_eq!(result.consumed_filenames, vec!["a.avi", "b.avi"]);
    }
}
