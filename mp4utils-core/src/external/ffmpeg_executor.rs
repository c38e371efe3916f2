// ============================================================================
// mp4utils-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Transcoding a Single Source File
//
// Builds the fixed H.264/AAC argument list for one conversion and runs it
// with ffmpeg-sidecar, which parses ffmpeg's stderr into events. Progress is
// logged at debug level; error lines are kept and logged as warnings.
//
// KEY COMPONENTS:
// - TranscodeJob: everything one conversion needs
// - Transcoder: trait seam used by the orchestrator
// - FfmpegTranscoder: ffmpeg-sidecar implementation

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

use super::command::{CommandOutput, format_command_line};
use crate::error::{CoreResult, command_start_error, command_wait_error};
use crate::processing::scale::ScaleFit;

/// Output frame rate.
pub const OUTPUT_FPS: u32 = 24;

/// Output audio sample rate.
pub const OUTPUT_AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Parameters of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub scale: ScaleFit,
    pub video_bitrate_kbps: u32,
    pub audio_bitrate_kbps: u32,
}

/// Converts one source file.
///
/// `Err` means ffmpeg could not be started; a failed conversion is an `Ok`
/// with a non-zero exit code.
pub trait Transcoder {
    fn transcode(&self, job: &TranscodeJob) -> CoreResult<CommandOutput>;
}

/// Full ffmpeg argument list for `job`, output path last.
pub fn build_transcode_args(job: &TranscodeJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(32);
    args.push("-i".into());
    args.push(job.input_path.as_os_str().to_os_string());

    let fixed_and_derived = [
        "-hide_banner".to_string(),
        "-r".to_string(),
        OUTPUT_FPS.to_string(),
        "-vf".to_string(),
        job.scale.filter(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-b:v".to_string(),
        format!("{}k", job.video_bitrate_kbps),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", job.audio_bitrate_kbps),
        "-ar".to_string(),
        OUTPUT_AUDIO_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        "2".to_string(),
        "-filter:a".to_string(),
        "loudnorm".to_string(),
        "-tune".to_string(),
        "zerolatency".to_string(),
        "-preset".to_string(),
        "veryfast".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        "-y".to_string(),
    ];
    args.extend(fixed_and_derived.into_iter().map(OsString::from));
    args.push(job.output_path.as_os_str().to_os_string());
    args
}

/// [`Transcoder`] running the configured ffmpeg binary through ffmpeg-sidecar.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_bin: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.ffmpeg_bin
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, job: &TranscodeJob) -> CoreResult<CommandOutput> {
        let name = self.ffmpeg_bin.display().to_string();
        let args = build_transcode_args(job);
        log::debug!("Running: {}", format_command_line(&self.ffmpeg_bin, &args));

        let mut cmd = FfmpegCommand::new_with_path(&self.ffmpeg_bin);
        cmd.args(&args);
        let mut child = cmd.spawn().map_err(|e| command_start_error(&name, e))?;

        let mut error_lines: Vec<String> = Vec::new();
        match child.iter() {
            Ok(events) => {
                for event in events {
                    match event {
                        FfmpegEvent::Progress(progress) => {
                            log::debug!(
                                "{}: time={} speed={:.2}x",
                                job.output_path.display(),
                                progress.time,
                                progress.speed
                            );
                        }
                        FfmpegEvent::Error(line)
                        | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                            log::warn!("ffmpeg: {}", line);
                            error_lines.push(line);
                        }
                        _ => {}
                    }
                }
            }
            Err(e) => log::warn!("Could not read ffmpeg output: {}", e),
        }

        let status = child.wait().map_err(|e| command_wait_error(&name, e))?;
        Ok(CommandOutput {
            code: status.code(),
            stdout: String::new(),
            stderr: error_lines.join("\n"),
        })
    }
}
