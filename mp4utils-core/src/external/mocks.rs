// mp4utils-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// This module is only compiled when the "test-mocks" feature is enabled.

use super::*;
use crate::error::{CoreError, CoreResult};
use crate::processing::scale::Dimensions;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// What a mocked subprocess call should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// Exit 0 (and create the output file if the mock is configured to).
    Success,
    /// Exit with the given non-zero code.
    ExitCode(i32),
    /// Fail to start, as if the binary were missing.
    SpawnError,
}

impl MockOutcome {
    fn into_result(self, what: &str, output_path: &Path, create_output: bool) -> CoreResult<CommandOutput> {
        match self {
            MockOutcome::Success => {
                if create_output {
                    create_dummy_file(output_path);
                }
                Ok(CommandOutput::success_with(""))
            }
            MockOutcome::ExitCode(code) => Ok(CommandOutput::failure(code)),
            MockOutcome::SpawnError => Err(CoreError::CommandStart(
                format!("{what} (mock)"),
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            )),
        }
    }
}

fn create_dummy_file(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("Mock failed to create parent dir {:?}: {}", parent, e);
        }
    }
    match std::fs::write(path, b"mock output") {
        Ok(()) => log::info!("Mock created dummy output file: {:?}", path),
        Err(e) => log::error!("Mock failed to create dummy output file {:?}: {}", path, e),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Mock implementation of MediaProber, keyed by input file name.
#[derive(Clone, Default)]
pub struct MockProber {
    results: Rc<RefCell<HashMap<String, Option<Dimensions>>>>,
    default: Rc<RefCell<Option<Dimensions>>>,
    received_calls: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockProber {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every file not configured explicitly reports these dimensions.
    pub fn with_default(width: u32, height: u32) -> Self {
        let prober = Self::new();
        *prober.default.borrow_mut() = Dimensions::new(width, height);
        prober
    }

    pub fn expect_dimensions(&self, file_name: &str, width: u32, height: u32) {
        self.results
            .borrow_mut()
            .insert(file_name.to_string(), Dimensions::new(width, height));
    }

    pub fn expect_failure(&self, file_name: &str) {
        self.results.borrow_mut().insert(file_name.to_string(), None);
    }

    pub fn get_received_calls(&self) -> Vec<PathBuf> {
        self.received_calls.borrow().clone()
    }
}

impl MediaProber for MockProber {
    fn probe(&self, input_path: &Path) -> CoreResult<Dimensions> {
        self.received_calls.borrow_mut().push(input_path.to_path_buf());
        let name = file_name_of(input_path);
        let result = match self.results.borrow().get(&name) {
            Some(configured) => *configured,
            None => *self.default.borrow(),
        };
        result.ok_or_else(|| CoreError::ProbeFailed(format!("mock probe failure for {name}")))
    }
}

/// Mock implementation of Transcoder, keyed by input file name.
#[derive(Clone, Default)]
pub struct MockTranscoder {
    outcomes: Rc<RefCell<HashMap<String, MockOutcome>>>,
    create_dummy_output: bool,
    received_jobs: Rc<RefCell<Vec<TranscodeJob>>>,
}

impl MockTranscoder {
    /// Succeeds for every input unless told otherwise.
    pub fn new(create_dummy_output: bool) -> Self {
        Self {
            create_dummy_output,
            ..Default::default()
        }
    }

    pub fn set_outcome(&self, file_name: &str, outcome: MockOutcome) {
        self.outcomes.borrow_mut().insert(file_name.to_string(), outcome);
    }

    pub fn get_received_jobs(&self) -> Vec<TranscodeJob> {
        self.received_jobs.borrow().clone()
    }
}

impl Transcoder for MockTranscoder {
    fn transcode(&self, job: &TranscodeJob) -> CoreResult<CommandOutput> {
        self.received_jobs.borrow_mut().push(job.clone());
        let outcome = self
            .outcomes
            .borrow()
            .get(&file_name_of(&job.input_path))
            .copied()
            .unwrap_or(MockOutcome::Success);
        log::info!("MockTranscoder: {} -> {:?}", job.input_path.display(), outcome);
        outcome.into_result("ffmpeg", &job.output_path, self.create_dummy_output)
    }
}

/// Mock implementation of Joiner with a single scripted outcome.
#[derive(Clone)]
pub struct MockJoiner {
    outcome: Rc<RefCell<MockOutcome>>,
    create_dummy_output: bool,
    received_calls: Rc<RefCell<Vec<(Vec<PathBuf>, PathBuf)>>>,
}

impl MockJoiner {
    pub fn new(outcome: MockOutcome, create_dummy_output: bool) -> Self {
        Self {
            outcome: Rc::new(RefCell::new(outcome)),
            create_dummy_output,
            received_calls: Rc::default(),
        }
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        *self.outcome.borrow_mut() = outcome;
    }

    pub fn get_received_calls(&self) -> Vec<(Vec<PathBuf>, PathBuf)> {
        self.received_calls.borrow().clone()
    }
}

impl Joiner for MockJoiner {
    fn join(&self, inputs: &[PathBuf], output_path: &Path) -> CoreResult<CommandOutput> {
        self.received_calls
            .borrow_mut()
            .push((inputs.to_vec(), output_path.to_path_buf()));
        let outcome = *self.outcome.borrow();
        log::info!("MockJoiner: {} inputs -> {:?}", inputs.len(), outcome);
        outcome.into_result("avidemux", output_path, self.create_dummy_output)
    }
}

/// Mock CommandRunner returning a fixed output and recording every call.
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    output: Rc<RefCell<CommandOutput>>,
    received_calls: Rc<RefCell<Vec<(PathBuf, Vec<OsString>)>>>,
}

impl MockCommandRunner {
    pub fn new(output: CommandOutput) -> Self {
        Self {
            output: Rc::new(RefCell::new(output)),
            received_calls: Rc::default(),
        }
    }

    pub fn get_received_calls(&self) -> Vec<(PathBuf, Vec<OsString>)> {
        self.received_calls.borrow().clone()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> CoreResult<CommandOutput> {
        self.received_calls
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        Ok(self.output.borrow().clone())
    }
}
