//! Configuration structures and constants for the mp4utils-core library.
//!
//! This module provides the configuration consumed by every stage of a run:
//! directory layout, default bitrates, the video-extension allow-list, the
//! external binaries, and the [`RunConfig`] that selects the execution mode.

mod file;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::video::DefaultSettings;

pub use file::{DEFAULT_CONFIG_LOCATIONS, find_config_file, load_config, parse_config};

// Default constants

/// Default audio bitrate in kbps when the configuration file omits it.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 128;

/// Default video bitrate in kbps when the configuration file omits it.
pub const DEFAULT_VIDEO_BITRATE_KBPS: u32 = 1200;

/// Default ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Default ffprobe binary, resolved through `PATH`.
pub const DEFAULT_FFPROBE_BIN: &str = "ffprobe";

/// Default avidemux command-line binary, resolved through `PATH`.
pub const DEFAULT_AVIDEMUX_BIN: &str = "avidemux3_cli";

/// Extensions shorter than this are dropped from the allow-list.
pub const MIN_EXTENSION_LEN: usize = 3;

/// Main configuration structure for the mp4utils-core library.
///
/// Usually produced by [`load_config`] from a TOML file, but every field is
/// public so tests and embedders can build one directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Batch script describing conversions and joins
    pub script_file: PathBuf,

    /// Directory holding the original video files
    pub source_dir: PathBuf,

    /// Directory receiving standalone and per-child conversions
    pub dest_dir: PathBuf,

    /// Directory receiving joined outputs
    pub join_dir: PathBuf,

    /// Default audio bitrate (kbps), overridable per script line with `ba:`
    pub audio_bitrate_kbps: u32,

    /// Default video bitrate (kbps), overridable per script line with `bv:`
    pub video_bitrate_kbps: u32,

    /// Lower-case extensions (without dot) picked up by the source scan
    pub video_extensions: Vec<String>,

    pub ffmpeg_bin: PathBuf,
    pub ffprobe_bin: PathBuf,
    pub avidemux_bin: PathBuf,
}

impl CoreConfig {
    /// Creates a configuration with default bitrates and binaries.
    pub fn new(
        script_file: PathBuf,
        source_dir: PathBuf,
        dest_dir: PathBuf,
        join_dir: PathBuf,
    ) -> Self {
        Self {
            script_file,
            source_dir,
            dest_dir,
            join_dir,
            audio_bitrate_kbps: DEFAULT_AUDIO_BITRATE_KBPS,
            video_bitrate_kbps: DEFAULT_VIDEO_BITRATE_KBPS,
            video_extensions: parse_video_extensions("mp4,mkv,avi,mov,wmv,flv,webm,mpg,mpeg"),
            ffmpeg_bin: PathBuf::from(DEFAULT_FFMPEG_BIN),
            ffprobe_bin: PathBuf::from(DEFAULT_FFPROBE_BIN),
            avidemux_bin: PathBuf::from(DEFAULT_AVIDEMUX_BIN),
        }
    }

    /// Settings every entity starts from before per-line overrides.
    pub fn default_settings(&self) -> DefaultSettings {
        DefaultSettings {
            audio_bitrate_kbps: self.audio_bitrate_kbps,
            video_bitrate_kbps: self.video_bitrate_kbps,
            source_dir: self.source_dir.clone(),
            dest_dir: self.dest_dir.clone(),
            join_dir: self.join_dir.clone(),
        }
    }

    /// Returns true if `file_name` carries an allow-listed video extension.
    pub fn is_video_file_name(&self, file_name: &str) -> bool {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.video_extensions.iter().any(|allowed| *allowed == ext))
    }

    /// Checks the values a run cannot do without.
    pub fn validate(&self) -> CoreResult<()> {
        if self.audio_bitrate_kbps == 0 {
            return Err(CoreError::Config("audio bitrate must be greater than 0".to_string()));
        }
        if self.video_bitrate_kbps == 0 {
            return Err(CoreError::Config("video bitrate must be greater than 0".to_string()));
        }

        let dirs = [
            ("script_file", &self.script_file),
            ("source_path", &self.source_dir),
            ("dest_path", &self.dest_dir),
            ("join_path", &self.join_dir),
        ];
        for (name, path) in dirs {
            if path.as_os_str().is_empty() {
                return Err(CoreError::Config(format!("{name} must not be empty")));
            }
        }

        if self.video_extensions.is_empty() {
            return Err(CoreError::Config(
                "video_extensions contains no usable extension".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parses a comma-separated extension list.
///
/// Case-insensitive; every character that is not alphanumeric or a comma is
/// stripped, and entries shorter than [`MIN_EXTENSION_LEN`] are discarded.
pub fn parse_video_extensions(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ',')
        .collect::<String>()
        .split(',')
        .filter(|ext| ext.len() >= MIN_EXTENSION_LEN)
        .map(str::to_string)
        .collect()
}

// ============================================================================
// RUN MODE
// ============================================================================

/// Execution mode, selected once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Convert every file, then join groups.
    #[default]
    Normal,
    /// Only convert standalone files; join lines are ignored.
    LegacyConvert,
    /// Only join outputs produced by an earlier `LegacyConvert` run.
    LegacyJoin,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunMode::Normal => "normal",
            RunMode::LegacyConvert => "legacy-convert",
            RunMode::LegacyJoin => "legacy-join",
        };
        f.write_str(name)
    }
}

impl FromStr for RunMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "normal" => Ok(RunMode::Normal),
            "legacy-convert" => Ok(RunMode::LegacyConvert),
            "legacy-join" => Ok(RunMode::LegacyJoin),
            other => Err(CoreError::Config(format!("unknown run mode '{other}'"))),
        }
    }
}

/// Per-invocation settings threaded through parsing, orchestration and cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub mode: RunMode,
}

impl RunConfig {
    pub fn new(mode: RunMode) -> Self {
        Self { mode }
    }

    /// Whether converted outputs get a random disambiguating suffix.
    ///
    /// Legacy passes must find each other's outputs by name, so the suffix
    /// is only used in normal mode.
    pub fn random_suffix_enabled(&self) -> bool {
        self.mode == RunMode::Normal
    }

    /// Whether a script line should be kept, given whether it names a join target.
    pub fn accepts_line(&self, has_join_target: bool) -> bool {
        match self.mode {
            RunMode::Normal => true,
            RunMode::LegacyConvert => !has_join_target,
            RunMode::LegacyJoin => has_join_target,
        }
    }

    /// Whether unmentioned files in the source directory are converted too.
    pub fn scans_source_dir(&self) -> bool {
        self.mode != RunMode::LegacyJoin
    }

    pub fn is_legacy_join(&self) -> bool {
        self.mode == RunMode::LegacyJoin
    }
}
