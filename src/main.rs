//! The demo entry point: registers a small set of showcase fixtures and
//! runs whatever the command line selects. The `demo.faults` fixtures are
//! deliberately faulty so the failure and error paths of the reporter can
//! be exercised from a shell.

use std::process::ExitCode;

use suite_runner::cli;
use suite_runner::core::case::{self, Check, CheckResult, Fixture, FunctionCase};
use suite_runner::core::registry::Registry;
use suite_runner::core::suite::TestItem;

fn main() -> ExitCode {
    // Parse command line arguments
    let options = cli::parse_args();

    // The registry is populated here, at startup, and passed down; the
    // engine itself holds no global state.
    let registry = demo_registry();

    match cli::run(&options, &registry) {
        Ok(report) if report.was_successful() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Checks over integer arithmetic; everything here passes.
#[derive(Default)]
struct IntegerArithmetic;

impl Fixture for IntegerArithmetic {
    fn fixture_name() -> &'static str {
        "IntegerArithmetic"
    }

    fn doc() -> &'static str {
        "Integer arithmetic behaves as documented."
    }

    fn checks() -> Vec<Check<Self>> {
        vec![
            Check::with_doc("testAdd", "Addition of small integers.", |_| {
                case::fail_unless_eq(1 + 2, 3, None)?;
                case::fail_unless_eq(0 + 1, 1, None)
            }),
            Check::with_doc("testMultiply", "Multiplication of small integers.", |_| {
                case::fail_unless_eq(0 * 10, 0, None)?;
                case::fail_unless_eq(5 * 8, 40, None)
            }),
        ]
    }
}

/// String handling with a shared sample prepared in set-up.
#[derive(Default)]
struct StringFormatting {
    sample: String,
}

impl Fixture for StringFormatting {
    fn fixture_name() -> &'static str {
        "StringFormatting"
    }

    fn doc() -> &'static str {
        "String formatting keeps its shape."
    }

    fn set_up(&mut self) -> CheckResult {
        self.sample = "  suite-runner  ".to_string();
        Ok(())
    }

    fn checks() -> Vec<Check<Self>> {
        vec![
            Check::with_doc("testRepeat", "Repetition multiplies the length.", |_| {
                case::fail_unless_eq("ab".repeat(3), "ababab".to_string(), None)
            }),
            Check::with_doc("testTrim", "Trimming strips the padding.", |fixture| {
                case::fail_unless_eq(fixture.sample.trim(), "suite-runner", None)
            }),
        ]
    }
}

/// Deliberately faulty checks for demonstrating the reporter.
#[derive(Default)]
struct Showcase;

impl Fixture for Showcase {
    fn fixture_name() -> &'static str {
        "Showcase"
    }

    fn doc() -> &'static str {
        "Deliberately faulty checks for demonstrating the reporter.\n\
         The mismatch check produces a failure block, the boom check an\n\
         error block carrying its cause chain. Run with --explain to see\n\
         this text in the diagnostic output."
    }

    fn checks() -> Vec<Check<Self>> {
        vec![
            Check::with_doc("testBoom", "A check whose input is broken.", |_| {
                let answer: i32 = "not a number".parse().map_err(anyhow::Error::from)?;
                case::fail_unless_eq(answer, 42, None)
            }),
            Check::with_doc("testMismatch", "A check whose expectation is wrong.", |_| {
                case::fail_unless_eq(6 * 9, 42, None)
            }),
        ]
    }
}

fn demo_registry() -> Registry {
    let mut registry = Registry::new();
    registry.add_fixture::<IntegerArithmetic>("demo.arith.IntegerArithmetic");
    registry.add_fixture::<StringFormatting>("demo.strings.StringFormatting");
    registry.add_fixture::<Showcase>("demo.faults.Showcase");
    registry.add_factory("demo.standalone.smoke", || {
        TestItem::from(FunctionCase::with_doc(
            "smoke",
            "A free-standing smoke check.",
            || case::fail_unless(cfg!(any(unix, windows)), "unsupported platform"),
        ))
    });
    registry
}
