//! FFprobe integration for reading video dimensions.
//!
//! Runs the configured ffprobe binary through the `ffprobe` crate and reads
//! the width and height of the first video stream.

use std::path::{Path, PathBuf};

use ffprobe::{Config, FfProbeError, ffprobe_config};

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::processing::scale::Dimensions;

/// Reads the dimensions of a video file.
pub trait MediaProber {
    fn probe(&self, input_path: &Path) -> CoreResult<Dimensions>;
}

/// [`MediaProber`] backed by the configured ffprobe binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_bin: PathBuf,
}

impl FfprobeProber {
    pub fn new(ffprobe_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.ffprobe_bin
    }
}

/// Validates the width/height reported for a video stream.
///
/// Missing, negative, oversized or zero values are a probe failure.
pub fn dimensions_from_stream(width: Option<i64>, height: Option<i64>) -> CoreResult<Dimensions> {
    let width = dimension_value(width, "width")?;
    let height = dimension_value(height, "height")?;
    Dimensions::new(width, height)
        .ok_or_else(|| CoreError::ProbeFailed(format!("invalid dimensions {width}x{height}")))
}

fn dimension_value(value: Option<i64>, name: &str) -> CoreResult<u32> {
    let value = value.ok_or_else(|| CoreError::ProbeFailed(format!("video stream has no {name}")))?;
    u32::try_from(value).map_err(|_| CoreError::ProbeFailed(format!("invalid {name} {value}")))
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("ffprobe", output.status.code(), stderr.trim())
        }
        FfProbeError::Deserialize(err) => CoreError::ProbeFailed(format!(
            "malformed ffprobe output for {}: {}",
            input_path.display(),
            err
        )),
        other => CoreError::ProbeFailed(format!(
            "ffprobe failed for {}: {:?}",
            input_path.display(),
            other
        )),
    }
}

impl MediaProber for FfprobeProber {
    fn probe(&self, input_path: &Path) -> CoreResult<Dimensions> {
        log::debug!(
            "Running {} for dimensions of {}",
            self.ffprobe_bin.display(),
            input_path.display()
        );

        let config = Config::builder().ffprobe_bin(&self.ffprobe_bin).build();
        let metadata =
            ffprobe_config(config, input_path).map_err(|e| map_ffprobe_error(e, input_path))?;

        let stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::ProbeFailed(format!("no video stream in {}", input_path.display()))
            })?;

        dimensions_from_stream(stream.width, stream.height)
    }
}
