// ============================================================================
// mp4utils-core/src/external/command.rs
// ============================================================================
//
// COMMAND RUNNER: Blocking Subprocess Execution
//
// Every external binary (ffprobe, avidemux, dependency checks) is run through
// the CommandRunner trait, a single blocking "run to completion" call. The
// standard implementation spawns the process with piped output, drains
// stdout/stderr on reader threads, and polls for exit on a fixed interval.
//
// There is no timeout: a hung subprocess blocks the run.

use std::ffi::{OsStr, OsString};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::error::{CoreResult, command_start_error, command_wait_error};

/// Interval between `try_wait` polls of a running subprocess.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Exit code and captured output of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful exit with the given stdout.
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed exit with the given code.
    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion.
///
/// `Err` means the program could not be started or waited on; a program
/// that ran and failed is an `Ok` with a non-zero [`CommandOutput::code`].
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> CoreResult<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Clone)]
pub struct StdCommandRunner {
    poll_interval: Duration,
}

impl Default for StdCommandRunner {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl StdCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl CommandRunner for StdCommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> CoreResult<CommandOutput> {
        let name = program.display().to_string();
        debug!("Running: {}", format_command_line(program, args));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(&name, e))?;

        let stdout_handle = child.stdout.take().map(|pipe| drain_lines(pipe, "stdout"));
        let stderr_handle = child.stderr.take().map(|pipe| drain_lines(pipe, "stderr"));

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(command_wait_error(&name, e));
                }
            }
        };

        let stdout = stdout_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        debug!("{} exited with {:?}", name, status.code());
        Ok(CommandOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn drain_lines<R>(pipe: R, label: &'static str) -> thread::JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut collected = String::new();
        for line in BufReader::new(pipe).lines().map_while(Result::ok) {
            debug!("{}: {}", label, line);
            collected.push_str(&line);
            collected.push('\n');
        }
        collected
    })
}

/// Renders a command line for logs, quoting arguments that contain spaces.
pub fn format_command_line(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(quote_arg)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &OsStr) -> String {
    let text = arg.to_string_lossy();
    if text.is_empty() || text.contains(char::is_whitespace) {
        format!("\"{text}\"")
    } else {
        text.into_owned()
    }
}
