//! Core library for batch video conversion and joining with ffmpeg and avidemux.
//!
//! A run reads a line-oriented batch script, converts every listed (and
//! every unmentioned) video in the source directory to a fixed 854x480 mp4,
//! joins grouped clips losslessly, and finally deletes the originals whose
//! conversion verifiably succeeded.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mp4utils_core::config::{RunConfig, RunMode, load_config};
//! use mp4utils_core::external::{AvidemuxJoiner, FfmpegTranscoder, FfprobeProber, StdFileSystem};
//! use mp4utils_core::{ConversionOrchestrator, parse_batch, process_batch};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mp4utils.toml")).unwrap();
//! let run = RunConfig::new(RunMode::Normal);
//!
//! let mut batch = parse_batch(&config, &run, &StdFileSystem);
//! let orchestrator = ConversionOrchestrator::new(
//!     FfprobeProber::new(&config.ffprobe_bin),
//!     FfmpegTranscoder::new(&config.ffmpeg_bin),
//!     AvidemuxJoiner::new(&config.avidemux_bin),
//!     StdFileSystem,
//!     run,
//! );
//!
//! let summary = process_batch(&orchestrator, &mut batch.entities, &config);
//! println!("{} deleted, {} kept", summary.deleted, summary.kept);
//! ```

pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod plan;
pub mod processing;
pub mod reporting;
pub mod script;
pub mod video;

// Re-exports for public API
pub use batch::{Batch, parse_batch, parse_script, read_script};
pub use config::{CoreConfig, RunConfig, RunMode};
pub use discovery::find_video_files;
pub use error::{CoreError, CoreResult};
pub use plan::{PlanItem, PlanRow, plan_rows};
pub use processing::{
    CleanupPlan, ConversionOrchestrator, apply_cleanup, compute_fit, plan_cleanup, process_batch,
    reconcile,
};
pub use reporting::RunSummary;
pub use video::{DefaultSettings, VideoEntity, VideoStatus};
