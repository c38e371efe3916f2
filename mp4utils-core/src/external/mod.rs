// ============================================================================
// mp4utils-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools and File System
//
// This module encapsulates everything outside the process: ffprobe, ffmpeg,
// avidemux and the file system. Each is reached through a trait so the
// orchestration and cleanup logic can be driven by mocks in tests.
//
// KEY COMPONENTS:
// - CommandRunner / StdCommandRunner: blocking run-to-completion subprocesses
// - MediaProber / FfprobeProber: video dimensions
// - Transcoder / FfmpegTranscoder: per-file conversion (ffmpeg-sidecar)
// - Joiner / AvidemuxJoiner: lossless concatenation
// - FileSystem / StdFileSystem: existence, listing, best-effort deletes
// - check_dependency: pre-flight lookup of the configured binaries

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// SUBMODULES
// ============================================================================

pub mod avidemux;
pub mod command;
pub mod ffmpeg_executor;
pub mod ffprobe_executor;
pub mod fs;

#[cfg(feature = "test-mocks")]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use avidemux::{AvidemuxJoiner, Joiner, build_join_args};
pub use command::{CommandOutput, CommandRunner, StdCommandRunner};
pub use ffmpeg_executor::{FfmpegTranscoder, TranscodeJob, Transcoder, build_transcode_args};
pub use ffprobe_executor::{FfprobeProber, MediaProber};
pub use fs::{FileSystem, StdFileSystem};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Resolves a configured binary (a bare name looked up on `PATH`, or a path).
///
/// Returns [`CoreError::DependencyNotFound`] when it cannot be located.
pub fn check_dependency(program: &Path) -> CoreResult<PathBuf> {
    match which::which(program) {
        Ok(resolved) => {
            log::debug!("Found dependency {} at {}", program.display(), resolved.display());
            Ok(resolved)
        }
        Err(e) => {
            log::warn!("Dependency '{}' not found: {}", program.display(), e);
            Err(CoreError::DependencyNotFound(program.display().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_missing() {
        let result = check_dependency(Path::new("/nonexistent/mp4utils-missing-tool"));
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_dependency_found() {
        assert!(check_dependency(Path::new("sh")).is_ok());
    }
}
