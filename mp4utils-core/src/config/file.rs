// ============================================================================
// mp4utils-core/src/config/file.rs
// ============================================================================
//
// CONFIGURATION FILE: TOML Loading and Discovery
//
// Reads the on-disk configuration into a CoreConfig. The file layout groups
// directories, bitrates and binaries into tables:
//
//   video_extensions = "mp4, mkv, avi"
//   [dirs]    script_file, source_path, dest_path, join_path
//   [bitrate] audio_kbps, video_kbps          (optional)
//   [bin]     ffmpeg, ffprobe, avidemux       (optional)
//
// Relative directory paths are resolved against the current directory at
// load time so that later path joins are stable.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{
    CoreConfig, DEFAULT_AUDIO_BITRATE_KBPS, DEFAULT_AVIDEMUX_BIN, DEFAULT_FFMPEG_BIN,
    DEFAULT_FFPROBE_BIN, DEFAULT_VIDEO_BITRATE_KBPS, parse_video_extensions,
};
use crate::error::{CoreError, CoreResult};

/// Locations tried, in order, when no configuration path is given.
pub const DEFAULT_CONFIG_LOCATIONS: &[&str] = &["./mp4utils.toml", "./main.toml"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    video_extensions: String,
    dirs: DirsSection,
    #[serde(default)]
    bitrate: BitrateSection,
    #[serde(default)]
    bin: BinSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirsSection {
    script_file: PathBuf,
    source_path: PathBuf,
    dest_path: PathBuf,
    join_path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BitrateSection {
    audio_kbps: u32,
    video_kbps: u32,
}

impl Default for BitrateSection {
    fn default() -> Self {
        Self {
            audio_kbps: DEFAULT_AUDIO_BITRATE_KBPS,
            video_kbps: DEFAULT_VIDEO_BITRATE_KBPS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BinSection {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    avidemux: PathBuf,
}

impl Default for BinSection {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG_BIN),
            ffprobe: PathBuf::from(DEFAULT_FFPROBE_BIN),
            avidemux: PathBuf::from(DEFAULT_AVIDEMUX_BIN),
        }
    }
}

/// Returns the first default location that exists, if any.
pub fn find_config_file() -> Option<PathBuf> {
    DEFAULT_CONFIG_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Loads and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> CoreResult<CoreConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("cannot read config file {}: {}", path.display(), e))
    })?;

    let config = parse_config(&content).map_err(|e| match e {
        CoreError::ConfigParse { source, .. } => CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parses configuration from TOML text. Directory paths are made absolute.
pub fn parse_config(content: &str) -> CoreResult<CoreConfig> {
    let raw: ConfigFile = toml::from_str(content).map_err(|source| CoreError::ConfigParse {
        path: PathBuf::new(),
        source,
    })?;

    let config = CoreConfig {
        script_file: absolutize(raw.dirs.script_file)?,
        source_dir: absolutize(raw.dirs.source_path)?,
        dest_dir: absolutize(raw.dirs.dest_path)?,
        join_dir: absolutize(raw.dirs.join_path)?,
        audio_bitrate_kbps: raw.bitrate.audio_kbps,
        video_bitrate_kbps: raw.bitrate.video_kbps,
        video_extensions: parse_video_extensions(&raw.video_extensions),
        ffmpeg_bin: raw.bin.ffmpeg,
        ffprobe_bin: raw.bin.ffprobe,
        avidemux_bin: raw.bin.avidemux,
    };

    config.validate()?;
    Ok(config)
}

fn absolutize(path: PathBuf) -> CoreResult<PathBuf> {
    if path.as_os_str().is_empty() {
        // Left for validate() to report with the field name.
        return Ok(path);
    }
    Ok(std::path::absolute(&path)?)
}
