//! Lossless concatenation of converted clips with avidemux.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::command::{CommandOutput, CommandRunner, StdCommandRunner};
use crate::error::{CoreError, CoreResult};

/// Concatenates already-converted clips into one output, without re-encoding.
pub trait Joiner {
    fn join(&self, inputs: &[PathBuf], output_path: &Path) -> CoreResult<CommandOutput>;
}

/// avidemux CLI arguments: load the first clip, append the rest, stream-copy to mp4.
pub fn build_join_args(inputs: &[PathBuf], output_path: &Path) -> Vec<OsString> {
    let mut args = Vec::with_capacity(inputs.len() * 2 + 8);
    for (index, input) in inputs.iter().enumerate() {
        args.push(OsString::from(if index == 0 { "--load" } else { "--append" }));
        args.push(input.as_os_str().to_os_string());
    }
    for arg in [
        "--video-codec",
        "copy",
        "--audio-codec",
        "copy",
        "--output-format",
        "mp4",
        "--save",
    ] {
        args.push(OsString::from(arg));
    }
    args.push(output_path.as_os_str().to_os_string());
    args
}

/// [`Joiner`] running the configured avidemux binary.
#[derive(Debug, Clone)]
pub struct AvidemuxJoiner<R: CommandRunner = StdCommandRunner> {
    avidemux_bin: PathBuf,
    runner: R,
}

impl AvidemuxJoiner<StdCommandRunner> {
    pub fn new(avidemux_bin: impl Into<PathBuf>) -> Self {
        Self::with_runner(avidemux_bin, StdCommandRunner::new())
    }
}

impl<R: CommandRunner> AvidemuxJoiner<R> {
    pub fn with_runner(avidemux_bin: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            avidemux_bin: avidemux_bin.into(),
            runner,
        }
    }
}

impl<R: CommandRunner> Joiner for AvidemuxJoiner<R> {
    fn join(&self, inputs: &[PathBuf], output_path: &Path) -> CoreResult<CommandOutput> {
        if inputs.is_empty() {
            return Err(CoreError::OperationFailed(format!(
                "nothing to join into {}",
                output_path.display()
            )));
        }
        self.runner
            .run(&self.avidemux_bin, &build_join_args(inputs, output_path))
    }
}
