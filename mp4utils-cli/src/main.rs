// ============================================================================
// mp4utils-cli/src/main.rs
// ============================================================================
//
// Entry point of the `mp4utils` binary.
//
// Exit codes:
// - 0: run completed and every file succeeded (or dry run / declined)
// - 1: the run could not start (configuration, prompt I/O)
// - 2: the run completed but at least one file or join failed

use clap::Parser;
use mp4utils_cli::logging::{init_logging, use_color};
use mp4utils_cli::{Cli, run_batch};
use owo_colors::OwoColorize;
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_batch(&cli) {
        Ok(Some(summary)) if !summary.all_successful() => process::exit(2),
        Ok(_) => {}
        Err(e) => {
            if use_color() {
                eprintln!("{} {}", "Error:".red().bold(), e);
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}
