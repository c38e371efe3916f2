// ============================================================================
// mp4utils-core/src/batch.rs
// ============================================================================
//
// BATCH PARSER: Script File and Source Directory to a Work List
//
// Builds the full list of entities for a run:
//
// 1. every line of the script file, through the lexer and interpreter
// 2. every video file in the source directory that no kept script line
//    mentions, as a standalone entity without a random suffix
//
// An unreadable script or source directory is logged and treated as empty.
// A malformed line is logged and skipped. Neither stops the run.

use std::path::Path;

use crate::config::{CoreConfig, RunConfig};
use crate::discovery::find_video_files;
use crate::error::{CoreError, CoreResult};
use crate::external::FileSystem;
use crate::script::{LexError, interpret_line, tokenize_line};
use crate::video::VideoEntity;

/// The work list of a run.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Script-derived entities first, then directory-derived ones.
    pub entities: Vec<VideoEntity>,
    /// Child file names claimed by script lines.
    pub consumed_filenames: Vec<String>,
    /// 1-based line numbers of skipped lines with their lex error.
    pub skipped_lines: Vec<(usize, LexError)>,
}

/// Reads the script file.
pub fn read_script(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|source| CoreError::ScriptUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Interprets script text line by line.
pub fn parse_script<F: FileSystem>(
    content: &str,
    config: &CoreConfig,
    run: &RunConfig,
    fs: &F,
) -> Batch {
    let defaults = config.default_settings();
    let mut batch = Batch::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let tokens = match tokenize_line(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("Skipping script line {}: {} ({:?})", line_number, e, line);
                batch.skipped_lines.push((line_number, e));
                continue;
            }
        };

        let result = interpret_line(&tokens, run, &defaults, fs);
        batch.entities.extend(result.entities);
        batch.consumed_filenames.extend(result.consumed_filenames);
    }

    batch
}

/// Builds the run's work list from the configured script and source directory.
pub fn parse_batch<F: FileSystem>(config: &CoreConfig, run: &RunConfig, fs: &F) -> Batch {
    let content = match read_script(&config.script_file) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("{}; continuing without script entries", e);
            String::new()
        }
    };

    let mut batch = parse_script(&content, config, run, fs);
    log::info!(
        "Script yielded {} entr{}",
        batch.entities.len(),
        if batch.entities.len() == 1 { "y" } else { "ies" }
    );

    if !run.scans_source_dir() {
        return batch;
    }

    let scanned = match find_video_files(fs, &config.source_dir, config) {
        Ok(files) => files,
        Err(e) => {
            log::warn!(
                "Cannot list source directory {}: {}",
                config.source_dir.display(),
                e
            );
            Vec::new()
        }
    };

    let defaults = config.default_settings();
    let unmentioned: Vec<VideoEntity> = scanned
        .iter()
        .filter(|name| !batch.consumed_filenames.contains(name))
        .map(|name| VideoEntity::leaf(name, defaults.clone(), false))
        .collect();

    if !unmentioned.is_empty() {
        log::info!(
            "Adding {} unmentioned file(s) from {}",
            unmentioned.len(),
            config.source_dir.display()
        );
    }
    batch.entities.extend(unmentioned);

    batch
}
