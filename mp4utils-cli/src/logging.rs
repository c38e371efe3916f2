// ============================================================================
// mp4utils-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP
//
// The application uses the `log` facade with `env_logger` as the backend.
// RUST_LOG overrides the level chosen from the command line:
// - default: info (progress, per-file outcomes, deletions)
// - --verbose: debug (command lines and subprocess output)

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::io::Write;

/// Initializes env_logger with a compact `LEVEL message` format.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    let color = use_color();
    builder
        .format(move |buf, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR",
                log::Level::Warn => "WARN ",
                log::Level::Info => "INFO ",
                log::Level::Debug => "DEBUG",
                log::Level::Trace => "TRACE",
            };
            if !color {
                return writeln!(buf, "{} {}", level_str, record.args());
            }
            let level_colored = match record.level() {
                log::Level::Error => level_str.bright_red().to_string(),
                log::Level::Warn => level_str.yellow().to_string(),
                log::Level::Info => level_str.green().to_string(),
                log::Level::Debug => level_str.blue().to_string(),
                log::Level::Trace => level_str.magenta().to_string(),
            };
            writeln!(buf, "{} {}", level_colored, record.args())
        })
        .init();

    log::debug!("Logger initialized with level: {}", level);
}

/// Respects the NO_COLOR convention.
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Returns the current local time formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
