// ============================================================================
// mp4utils-cli/src/cli.rs
// ============================================================================
//
// COMMAND-LINE INTERFACE: Argument Definitions
//
// Defines the command-line arguments of the `mp4utils` binary using clap's
// derive API. There are no subcommands: one invocation is one batch run.

use clap::Parser;
use mp4utils_core::RunMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "mp4utils: batch video conversion and joining",
    long_about = "Converts the videos of a source directory to 854x480 mp4 with ffmpeg, \
                  joins the groups listed in a batch script with avidemux, and deletes \
                  the originals whose conversion succeeded."
)]
pub struct Cli {
    /// Configuration file (defaults to ./mp4utils.toml, then ./main.toml)
    #[arg(short, long, value_name = "PATH", env = "MP4UTILS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Execution mode: normal, legacy-convert or legacy-join
    #[arg(
        long,
        value_name = "MODE",
        default_value = "normal",
        value_parser = parse_run_mode,
        env = "MP4UTILS_MODE"
    )]
    pub mode: RunMode,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the plan and exit without converting or deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging (subprocess command lines and output)
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_run_mode(value: &str) -> Result<RunMode, String> {
    value.parse().map_err(|e: mp4utils_core::CoreError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mp4utils"]).unwrap();
        assert_eq!(cli.mode, RunMode::Normal);
        assert!(!cli.yes && !cli.dry_run && !cli.verbose);
    }

    #[test]
    fn test_mode_values() {
        let cli = Cli::try_parse_from(["mp4utils", "--mode", "legacy-join", "-y"]).unwrap();
        assert_eq!(cli.mode, RunMode::LegacyJoin);
        assert!(cli.yes);

        let cli = Cli::try_parse_from(["mp4utils", "--mode", "Legacy_Convert"]).unwrap();
        assert_eq!(cli.mode, RunMode::LegacyConvert);

        assert!(Cli::try_parse_from(["mp4utils", "--mode", "sideways"]).is_err());
    }
}
