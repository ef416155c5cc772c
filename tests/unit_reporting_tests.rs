//! # Reporting Module Unit Tests / Reporting 模块单元测试
//!
//! This module contains unit tests for the console reporter and the JSON
//! report writer: progress characters, verbose lines, fault blocks,
//! stream routing, the verdict grammar, and the serialized report shape.
//!
//! 此模块包含控制台报告器和 JSON 报告写入器的单元测试：
//! 进度字符、详细行、故障块、流路由、裁决语法以及序列化报告形态。

mod common;

use common::{SharedBuf, TwoChecks};
use suite_runner::core::case::{Fault, FunctionCase};
use suite_runner::core::loader::Loader;
use suite_runner::core::suite::Suite;
use suite_runner::reporting::console::{
    RunPhase, RunReport, StreamPair, TextRunner, Verbosity,
};
use suite_runner::reporting::json::write_json_report;

/// Runs the suite through a reporter over in-memory streams and returns
/// (progress output, diagnostic output, finished run).
///
/// 通过内存流上的报告器运行套件，返回（进度输出，诊断输出，完成的运行）。
fn run_reporter(suite: &mut Suite, verbosity: Verbosity, explain: bool) -> (String, String, RunReport) {
    // The report grammar is asserted byte-for-byte, so disable coloring.
    colored::control::set_override(false);
    let out = SharedBuf::new();
    let err = SharedBuf::new();
    let streams = StreamPair::new(Box::new(out.clone()), Box::new(err.clone()));
    let runner = TextRunner::with_streams(streams, verbosity, explain);
    let report = runner.run(suite);
    (out.contents(), err.contents(), report)
}

fn two_checks_suite() -> Suite {
    Loader::new().load_tests_from_fixture::<TwoChecks>()
}

#[test]
fn test_terse_run_streams_one_character_per_unit() {
    let mut suite = two_checks_suite();
    let (out, err, report) = run_reporter(&mut suite, Verbosity::Terse, false);

    assert_eq!(out, ".F\n");
    assert!(err.contains("FAIL TwoChecks.testMismatch (A passing and a failing check, The failing check.)"));
    assert!(err.contains("Failure: x != y"));
    assert!(err.contains("Ran 2 tests in"));
    assert!(err.contains("FAILED (failures=1)"));

    assert!(!report.was_successful());
    assert_eq!(report.tally.tests_run, 2);
    assert_eq!(report.tally.failures.len(), 1);
    assert!(report.tally.errors.is_empty());
}

#[test]
fn test_verbose_run_streams_one_line_per_unit() {
    let mut suite = two_checks_suite();
    let (out, _, _) = run_reporter(&mut suite, Verbosity::Verbose, false);

    assert!(out.contains(
        "TwoChecks.testEquality (A passing and a failing check, The passing check.) ... ok\n"
    ));
    assert!(out.contains(
        "TwoChecks.testMismatch (A passing and a failing check, The failing check.) ... FAIL\n"
    ));
}

#[test]
fn test_quiet_run_streams_no_progress_at_all() {
    let mut suite = two_checks_suite();
    let (out, err, _) = run_reporter(&mut suite, Verbosity::Quiet, false);
    assert_eq!(out, "");
    assert!(err.contains("FAILED (failures=1)"));
}

#[test]
fn test_progress_and_diagnostics_use_separate_streams() {
    let mut suite = two_checks_suite();
    let (out, err, _) = run_reporter(&mut suite, Verbosity::Terse, false);

    assert!(!out.contains("Ran"));
    assert!(!out.contains("FAILED"));
    assert!(err.contains(&"*".repeat(70)));
    assert!(err.contains(&"-".repeat(70)));
}

#[test]
fn test_explain_includes_the_long_form_explanation() {
    let mut suite = two_checks_suite();
    let (_, err, _) = run_reporter(&mut suite, Verbosity::Terse, true);
    assert!(err.contains("Fixture Explanation:"));
    assert!(err.contains("The failing check carries a known diagnostic message"));

    let mut suite = two_checks_suite();
    let (_, err, _) = run_reporter(&mut suite, Verbosity::Terse, false);
    assert!(!err.contains("Fixture Explanation:"));
}

#[test]
fn test_error_blocks_render_before_failure_blocks() {
    let mut suite = Suite::new();
    suite.add_test(FunctionCase::new("mismatch", || Err(Fault::failure("x != y"))));
    suite.add_test(FunctionCase::new("boom", || Err(Fault::error("broken pipe"))));
    let (out, err, _) = run_reporter(&mut suite, Verbosity::Terse, false);

    assert_eq!(out, "FE\n");
    let error_at = err.find("ERROR boom").expect("error block missing");
    let failure_at = err.find("FAIL mismatch").expect("failure block missing");
    assert!(error_at < failure_at);
    assert!(err.contains("FAILED (failures=1, errors=1)"));
}

#[test]
fn test_successful_run_ends_with_ok_and_a_singular_count() {
    let mut suite = Suite::new();
    suite.add_test(FunctionCase::new("only", || Ok(())));
    let (out, err, report) = run_reporter(&mut suite, Verbosity::Terse, false);

    assert_eq!(out, ".\n");
    assert!(err.contains("Ran 1 test in"));
    assert!(err.contains("OK\n"));
    assert!(report.was_successful());
}

#[test]
fn test_interrupted_run_still_reaches_the_summary() {
    let mut suite = Suite::new();
    suite.add_test(FunctionCase::new("interrupting", || Err(Fault::Interrupt)));
    suite.add_test(FunctionCase::new("never", || Ok(())));
    let (out, err, report) = run_reporter(&mut suite, Verbosity::Terse, false);

    assert_eq!(out, "E\n");
    assert!(err.contains("Ran 1 test in"));
    assert!(err.contains("FAILED (errors=1)"));
    assert_eq!(report.tally.tests_run, 1);
}

#[test]
fn test_runner_starts_idle() {
    let runner = TextRunner::with_streams(
        StreamPair::new(Box::new(SharedBuf::new()), Box::new(SharedBuf::new())),
        Verbosity::Terse,
        false,
    );
    assert_eq!(runner.phase(), RunPhase::Idle);
}

#[test]
fn test_json_report_matches_the_collector() {
    let mut suite = two_checks_suite();
    let (_, _, report) = run_reporter(&mut suite, Verbosity::Quiet, false);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("run.json");
    write_json_report(&report, &path).unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(body["tests_run"], 2);
    assert_eq!(body["success"], false);
    assert_eq!(body["failures"][0]["case"]["id"], "TwoChecks.testMismatch");
    assert_eq!(body["failures"][0]["fault"]["Failure"]["message"], "x != y");
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
    assert!(body["elapsed_secs"].is_number());
    assert!(body["generated_at"].is_string());
}
