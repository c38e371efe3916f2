// ============================================================================
// mp4utils-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types
//
// Defines the error enum shared by every module of the core library, plus
// small constructor helpers for the subprocess failure cases.
//
// Only configuration problems and I/O on the CLI's own files ever abort a
// run. Per-video failures (missing input, probe, transcode, join) are
// recorded as a `VideoStatus` on the entity instead of bubbling up.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for mp4utils-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot read script file {path}: {source}")]
    ScriptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to obtain video dimensions: {0}")]
    ProbeFailed(String),

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Failed while waiting for command '{0}': {1}")]
    CommandWait(String, #[source] std::io::Error),

    #[error("Command '{cmd}' exited with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: String,
        stderr: String,
    },

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for mp4utils-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a binary that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandWait`] for a process whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] from an exit code (or its absence).
pub fn command_failed_error(
    cmd: impl Into<String>,
    code: Option<i32>,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status: code.map_or_else(|| "terminated by signal".to_string(), |c| c.to_string()),
        stderr: stderr.into(),
    }
}
