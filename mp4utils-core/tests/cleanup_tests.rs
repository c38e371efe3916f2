// mp4utils-core/tests/cleanup_tests.rs
//
// End-to-end runs over a temporary directory layout: parse, convert/join
// with mock tools, then reconcile the source directory.

mod common;

use common::Workspace;
use mp4utils_core::config::{RunConfig, RunMode};
use mp4utils_core::external::StdFileSystem;
use mp4utils_core::external::mocks::{MockJoiner, MockOutcome, MockProber, MockTranscoder};
use mp4utils_core::{ConversionOrchestrator, VideoStatus, parse_batch, process_batch, reconcile};

fn orchestrator(
    transcoder: &MockTranscoder,
    joiner: &MockJoiner,
    mode: RunMode,
) -> ConversionOrchestrator<MockProber, MockTranscoder, MockJoiner, StdFileSystem> {
    ConversionOrchestrator::new(
        MockProber::with_default(640, 480),
        transcoder.clone(),
        joiner.clone(),
        StdFileSystem,
        RunConfig::new(mode),
    )
}

#[test]
fn test_normal_run_deletes_only_converted_originals() {
    let ws = Workspace::new();
    ws.write_script("out | a.avi b.avi\nsolo.avi\nfails.avi\nghost.avi\n");
    ws.add_sources(&["a.avi", "b.avi", "solo.avi", "fails.avi", "notes.txt"]);

    let transcoder = MockTranscoder::new(true);
    transcoder.set_outcome("fails.avi", MockOutcome::ExitCode(1));
    let joiner = MockJoiner::new(MockOutcome::Success, true);

    let run = RunConfig::new(RunMode::Normal);
    let mut batch = parse_batch(&ws.config, &run, &StdFileSystem);
    let summary = process_batch(
        &orchestrator(&transcoder, &joiner, RunMode::Normal),
        &mut batch.entities,
        &ws.config,
    );

    // Originals: converted ones are gone, the failed one and non-videos remain.
    assert_eq!(Workspace::list(&ws.config.source_dir), vec!["fails.avi", "notes.txt"]);

    // Join children's intermediates are superseded by the joined file.
    assert!(ws.joined("out.mp4").exists());
    let solo_output = batch.entities[1].output_file_name().to_string();
    assert_eq!(Workspace::list(&ws.config.dest_dir), vec![solo_output]);

    assert_eq!(summary.deleted, 3);
    assert_eq!(summary.kept, 2);
    assert_eq!(summary.leaves.get(VideoStatus::Successful), 3);
    assert_eq!(summary.leaves.get(VideoStatus::TranscodeError), 1);
    assert_eq!(summary.leaves.get(VideoStatus::InputMissing), 1);
    assert_eq!(summary.join_targets.get(VideoStatus::Successful), 1);
    assert!(!summary.all_successful());
}

#[test]
fn test_failed_join_keeps_every_original() {
    let ws = Workspace::new();
    ws.write_script("out | a.avi b.avi\n");
    ws.add_sources(&["a.avi", "b.avi"]);

    let transcoder = MockTranscoder::new(true);
    transcoder.set_outcome("b.avi", MockOutcome::ExitCode(1));
    let joiner = MockJoiner::new(MockOutcome::Success, true);

    let mut batch = parse_batch(&ws.config, &RunConfig::default(), &StdFileSystem);
    let summary = process_batch(
        &orchestrator(&transcoder, &joiner, RunMode::Normal),
        &mut batch.entities,
        &ws.config,
    );

    assert_eq!(Workspace::list(&ws.config.source_dir), vec!["a.avi", "b.avi"]);
    assert!(Workspace::list(&ws.config.dest_dir).is_empty());
    assert!(Workspace::list(&ws.config.join_dir).is_empty());
    assert!(joiner.get_received_calls().is_empty());
    assert_eq!(summary.deleted, 0);
}

#[test]
fn test_joiner_failure_removes_partial_outputs() {
    let ws = Workspace::new();
    ws.write_script("out | a.avi b.avi\n");
    ws.add_sources(&["a.avi", "b.avi"]);

    let transcoder = MockTranscoder::new(true);
    let joiner = MockJoiner::new(MockOutcome::ExitCode(1), true);

    let mut batch = parse_batch(&ws.config, &RunConfig::default(), &StdFileSystem);
    process_batch(
        &orchestrator(&transcoder, &joiner, RunMode::Normal),
        &mut batch.entities,
        &ws.config,
    );

    assert_eq!(Workspace::list(&ws.config.source_dir), vec!["a.avi", "b.avi"]);
    assert!(Workspace::list(&ws.config.dest_dir).is_empty());
    assert!(!ws.joined("out.mp4").exists());
}

#[test]
fn test_reconcile_is_idempotent() {
    let ws = Workspace::new();
    ws.write_script("a.avi\nmissing.avi\n");
    ws.add_sources(&["a.avi", "unmentioned.mkv"]);

    let transcoder = MockTranscoder::new(true);
    transcoder.set_outcome("unmentioned.mkv", MockOutcome::ExitCode(1));
    let joiner = MockJoiner::new(MockOutcome::Success, true);

    let run = RunConfig::default();
    let mut batch = parse_batch(&ws.config, &run, &StdFileSystem);
    orchestrator(&transcoder, &joiner, RunMode::Normal).process_all(&mut batch.entities);

    let first = reconcile(&batch.entities, &ws.config, &run, &StdFileSystem).unwrap();
    let second = reconcile(&batch.entities, &ws.config, &run, &StdFileSystem).unwrap();

    assert_eq!(first.delete, second.delete);
    assert_eq!(first.keep, second.keep);
    assert_eq!(first.delete, vec!["a.avi"]);
    assert_eq!(first.keep, vec!["unmentioned.mkv", "missing.avi"]);
}

#[test]
fn test_legacy_convert_then_legacy_join() {
    let ws = Workspace::new();
    ws.write_script("out | a.avi b.avi\nsolo.avi\n");
    ws.add_sources(&["a.avi", "b.avi", "solo.avi"]);

    let transcoder = MockTranscoder::new(true);
    let joiner = MockJoiner::new(MockOutcome::Success, true);

    // Pass 1: plain conversions only, with predictable output names.
    let convert = RunConfig::new(RunMode::LegacyConvert);
    let mut batch = parse_batch(&ws.config, &convert, &StdFileSystem);
    process_batch(
        &orchestrator(&transcoder, &joiner, RunMode::LegacyConvert),
        &mut batch.entities,
        &ws.config,
    );
    assert_eq!(
        Workspace::list(&ws.config.dest_dir),
        vec!["a.mp4", "b.mp4", "solo.mp4"]
    );
    assert!(joiner.get_received_calls().is_empty());

    // Pass 2 without an earlier joined file: nothing is joined and the
    // converted clips survive cleanup.
    let join = RunConfig::new(RunMode::LegacyJoin);
    let mut batch = parse_batch(&ws.config, &join, &StdFileSystem);
    assert_eq!(batch.entities.len(), 1);
    process_batch(
        &orchestrator(&transcoder, &joiner, RunMode::LegacyJoin),
        &mut batch.entities,
        &ws.config,
    );
    assert_eq!(batch.entities[0].status(), VideoStatus::JoinError);
    assert_eq!(
        Workspace::list(&ws.config.dest_dir),
        vec!["a.mp4", "b.mp4", "solo.mp4"]
    );

    // Pass 2 again with an earlier joined file: re-joined from the clips.
    common::create_dummy_file(&ws.config.join_dir, "out.mp4");
    let mut batch = parse_batch(&ws.config, &join, &StdFileSystem);
    process_batch(
        &orchestrator(&transcoder, &joiner, RunMode::LegacyJoin),
        &mut batch.entities,
        &ws.config,
    );
    assert_eq!(batch.entities[0].status(), VideoStatus::Successful);
    let calls = joiner.get_received_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, vec![ws.dest("a.mp4"), ws.dest("b.mp4")]);
    assert_eq!(Workspace::list(&ws.config.dest_dir), vec!["solo.mp4"]);
    assert!(ws.joined("out.mp4").exists());
}
