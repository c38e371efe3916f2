// ============================================================================
// mp4utils-cli/src/commands/run.rs
// ============================================================================
//
// BATCH RUN COMMAND
//
// Wires the core library together for one invocation:
//   1. locate and load the configuration
//   2. parse the batch script plus the source directory listing
//   3. print the plan, then stop (dry run) or ask for confirmation
//   4. convert and join with the real ffmpeg/ffprobe/avidemux adapters
//   5. reconcile the source directory and report the summary

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use console::Term;
use log::{info, warn};
use mp4utils_core::config::{DEFAULT_CONFIG_LOCATIONS, find_config_file, load_config};
use mp4utils_core::external::{
    AvidemuxJoiner, FfmpegTranscoder, FfprobeProber, StdFileSystem, check_dependency,
};
use mp4utils_core::{
    ConversionOrchestrator, CoreConfig, RunConfig, RunSummary, parse_batch, plan_rows,
    process_batch,
};

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::get_timestamp;
use crate::output::{print_plan, print_summary};

const CONFIRM_PROMPT: &str = "Do you want to continue? [y/N] ";

/// Runs one batch. Returns `None` when nothing was executed (dry run or
/// the user declined).
pub fn run_batch(cli: &Cli) -> CliResult<Option<RunSummary>> {
    let config_path = resolve_config_path(cli.config.clone())?;
    let config = load_config(&config_path)?;
    let run = RunConfig::new(cli.mode);

    info!("mp4utils run started {} (mode {})", get_timestamp(), run.mode);
    info!("Configuration: {}", config_path.display());
    info!("Source directory: {}", config.source_dir.display());

    let fs = StdFileSystem;
    let mut batch = parse_batch(&config, &run, &fs);
    for (line, err) in &batch.skipped_lines {
        warn!("Ignored script line {}: {}", line, err);
    }

    print_plan(&plan_rows(&batch.entities, &fs));

    if cli.dry_run {
        info!("Dry run: nothing converted, nothing deleted");
        return Ok(None);
    }
    if !cli.yes && !confirm()? {
        info!("Aborted by user");
        return Ok(None);
    }

    prepare_output_dirs(&config)?;
    check_dependencies(&config);

    let orchestrator = ConversionOrchestrator::new(
        FfprobeProber::new(&config.ffprobe_bin),
        FfmpegTranscoder::new(&config.ffmpeg_bin),
        AvidemuxJoiner::new(&config.avidemux_bin),
        fs,
        run,
    );
    let summary = process_batch(&orchestrator, &mut batch.entities, &config);

    print_summary(&summary, &get_timestamp());
    Ok(Some(summary))
}

fn resolve_config_path(explicit: Option<PathBuf>) -> CliResult<PathBuf> {
    explicit.or_else(find_config_file).cli_context(format!(
        "no configuration file found (tried {}); use --config",
        DEFAULT_CONFIG_LOCATIONS.join(", ")
    ))
}

fn confirm() -> CliResult<bool> {
    print!("{CONFIRM_PROMPT}");
    io::stdout().flush().cli_context("writing prompt")?;

    let term = Term::stdout();
    let answer = if term.is_term() {
        term.read_line().cli_context("reading answer")?
    } else {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .cli_context("reading answer")?;
        line
    };
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn prepare_output_dirs(config: &CoreConfig) -> CliResult<()> {
    for dir in [&config.dest_dir, &config.join_dir] {
        std::fs::create_dir_all(dir)
            .cli_context(format!("creating output directory {}", dir.display()))?;
    }
    Ok(())
}

// Missing tools are only reported; the entities that need them fail
// individually during the run.
fn check_dependencies(config: &CoreConfig) {
    for bin in [&config.ffprobe_bin, &config.ffmpeg_bin, &config.avidemux_bin] {
        if check_dependency(bin).is_err() {
            warn!(
                "{} is not available; files depending on it will fail",
                bin.display()
            );
        }
    }
}
