//! File discovery module for finding video files in the source directory.
//!
//! Only the top level of the directory is searched. A file qualifies when it
//! is a regular, non-symlink file whose extension is in the configured
//! allow-list (case-insensitive).

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::FileSystem;

use std::path::Path;

/// Finds the names of video files directly inside `dir`, sorted.
///
/// # Examples
///
/// ```rust,no_run
/// use mp4utils_core::external::StdFileSystem;
/// use mp4utils_core::{CoreConfig, find_video_files};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(
///     PathBuf::from("/data/script.txt"),
///     PathBuf::from("/data/src"),
///     PathBuf::from("/data/out"),
///     PathBuf::from("/data/joined"),
/// );
/// let files = find_video_files(&StdFileSystem, &config.source_dir, &config).unwrap();
/// println!("Found {} video files", files.len());
/// ```
pub fn find_video_files<F: FileSystem>(
    fs: &F,
    dir: &Path,
    config: &CoreConfig,
) -> CoreResult<Vec<String>> {
    let files: Vec<String> = fs
        .list_files(dir)?
        .into_iter()
        .filter(|name| config.is_video_file_name(name))
        .collect();

    log::debug!("Found {} video file(s) in {}", files.len(), dir.display());
    Ok(files)
}
