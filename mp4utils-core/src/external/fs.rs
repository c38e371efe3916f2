//! File system access used by parsing, orchestration and cleanup.
//!
//! Kept behind a trait so the existence checks and deletions can be observed
//! in tests.

use std::path::Path;

use crate::error::CoreResult;

/// The file operations the core needs.
pub trait FileSystem {
    /// True for an existing regular file that is not a symlink.
    fn exists(&self, path: &Path) -> bool;

    /// Best-effort delete. Failures are logged, never returned.
    fn remove_file(&self, path: &Path);

    /// Names of the regular, non-symlink files directly inside `dir`, sorted.
    fn list_files(&self, dir: &Path) -> CoreResult<Vec<String>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_file())
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            log::debug!("Could not delete {}: {}", path.display(), e);
        }
    }

    fn list_files(&self, dir: &Path) -> CoreResult<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(dir)?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }
                entry.file_name().into_string().ok()
            })
            .collect();
        names.sort();
        Ok(names)
    }
}
