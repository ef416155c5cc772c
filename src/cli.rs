// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use crate::core::loader::Loader;
use crate::core::registry::Registry;
use crate::reporting::console::{RunReport, TextRunner, Verbosity};
use crate::reporting::json::write_json_report;

const AFTER_HELP: &str = "\
Examples:
  suite-runner                               - run every registered fixture
  suite-runner MySuite                       - run suite 'MySuite'
  suite-runner pkg.mod.MyFixture             - run all 'test*' checks in MyFixture
  suite-runner pkg.mod.MyFixture.testFoo     - run the single check 'testFoo'
";

/// The validated configuration object handed to the engine. The engine
/// only reads it and never validates or mutates it.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub quiet: bool,
    pub verbose: bool,
    pub explain: bool,
    pub report: Option<PathBuf>,
    pub names: Vec<String>,
}

fn build_cli() -> Command {
    Command::new("suite-runner")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs registered test fixtures in a deterministic order and reports the outcome.")
        .after_help(AFTER_HELP)
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Minimal output: no per-test progress")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output: one line per test")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("explain")
                .short('e')
                .long("explain")
                .help("Include long-form explanations in failure and error blocks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Write a machine-readable JSON report to the given path")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("names")
                .help("Dotted test specifiers; omit to run every registered fixture")
                .value_name("NAME")
                .num_args(0..),
        )
}

/// Parses the process arguments into the configuration object.
pub fn parse_args() -> RunOptions {
    let matches = build_cli().get_matches();
    RunOptions {
        quiet: matches.get_flag("quiet"),
        verbose: matches.get_flag("verbose"),
        explain: matches.get_flag("explain"),
        report: matches.get_one::<PathBuf>("report").cloned(),
        names: matches
            .get_many::<String>("names")
            .map(|names| names.cloned().collect())
            .unwrap_or_default(),
    }
}

/// Loads the selected tests from the registry and runs them against the
/// text reporter on stdout/stderr.
///
/// No names means every registered fixture. Resolution errors propagate
/// and abort the invocation; a finished run is returned either way its
/// verdict went, so the caller maps `was_successful` to the exit status.
pub fn run(options: &RunOptions, registry: &Registry) -> Result<RunReport> {
    let loader = Loader::new();
    let mut suite = if options.names.is_empty() {
        loader.load_all(registry)
    } else {
        loader.load_tests_from_names(&options.names, registry)?
    };

    let verbosity = if options.quiet {
        Verbosity::Quiet
    } else if options.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Terse
    };
    let runner = TextRunner::new(verbosity, options.explain);
    let report = runner.run(&mut suite);

    if let Some(path) = &options.report {
        write_json_report(&report, path)?;
    }
    Ok(report)
}
