//! # Console Reporting Module / 控制台报告模块
//!
//! This module drives a suite against a streaming text collector and
//! renders the human-readable report: per-unit progress on the primary
//! stream, buffered fault blocks, timing and the final verdict on the
//! diagnostic stream, so a caller can route or discard the two
//! independently.
//!
//! 此模块针对流式文本收集器驱动套件并渲染人类可读的报告：
//! 每单元进度在主流上，缓冲的故障块、计时和最终裁决在诊断流上，
//! 因此调用方可以独立地路由或丢弃两者。

use chrono::{DateTime, Local};
use colored::Colorize;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::core::case::{CaseMeta, Fault, Runnable};
use crate::core::collector::{Collector, FaultEntry, RunTally};

const SEPARATOR_WIDTH: usize = 70;
const SEP2: char = '-';
const FAULT_SEP1: char = '*';
const FAULT_SEP2: char = '-';

/// How much per-unit progress the text collector streams.
///
/// 文本收集器流式输出多少每单元进度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// No per-unit output at all.
    Quiet,
    /// One character per unit: `.`, `F`, or `E`.
    Terse,
    /// One full line per unit with id and description.
    Verbose,
}

/// The pair of output streams a report is written to: progress on `out`,
/// diagnostics on `err`. Writes are best-effort; losing a progress dot
/// must not fail a run.
///
/// 报告写入的一对输出流：进度在 `out`，诊断在 `err`。
/// 写入是尽力而为的；丢失一个进度点绝不能使运行失败。
pub struct StreamPair {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl StreamPair {
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        StreamPair { out, err }
    }

    /// Process stdout and stderr, the default routing.
    pub fn stdio() -> Self {
        StreamPair::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    fn write(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    fn writeln(&mut self, line: &str) {
        self.write(line);
        self.write("\n");
    }

    fn write_err(&mut self, text: &str) {
        let _ = self.err.write_all(text.as_bytes());
        let _ = self.err.flush();
    }

    fn writeln_err(&mut self, line: &str) {
        self.write_err(line);
        self.write_err("\n");
    }
}

/// A collector that streams progress as units run and buffers fault
/// records for the summary. Terse mode writes one character per unit,
/// verbose mode a full `id (description) ... outcome` line; fault detail
/// is rendered only at the end, on the diagnostic stream.
///
/// 在单元运行时流式输出进度并为摘要缓冲故障记录的收集器。
/// 简洁模式每单元写一个字符，详细模式写完整的
/// `id (description) ... outcome` 行；故障详情仅在最后渲染到诊断流。
pub struct TextCollector {
    tally: RunTally,
    streams: StreamPair,
    show_all: bool,
    dots: bool,
    explain: bool,
    start: Option<Instant>,
    time_taken: Duration,
}

impl TextCollector {
    pub fn new(streams: StreamPair, verbosity: Verbosity, explain: bool) -> Self {
        TextCollector {
            tally: RunTally::new(),
            streams,
            show_all: verbosity == Verbosity::Verbose,
            dots: verbosity == Verbosity::Terse,
            explain,
            start: None,
            time_taken: Duration::ZERO,
        }
    }

    /// Marks the start of the timed span, just before the first unit.
    pub fn begin_tests(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Marks the end of the timed span, just after the last unit.
    pub fn end_tests(&mut self) {
        if let Some(start) = self.start.take() {
            self.time_taken = start.elapsed();
        }
    }

    pub fn time_taken(&self) -> Duration {
        self.time_taken
    }

    pub fn tally(&self) -> &RunTally {
        &self.tally
    }

    pub fn into_tally(self) -> RunTally {
        self.tally
    }

    pub fn was_successful(&self) -> bool {
        self.tally.was_successful()
    }

    /// Renders the buffered fault blocks, the run line and the verdict,
    /// all on the diagnostic stream.
    ///
    /// 渲染缓冲的故障块、运行行和裁决，全部在诊断流上。
    pub fn summarize(&mut self) {
        self.print_errors();
        self.streams
            .writeln_err(&SEP2.to_string().repeat(SEPARATOR_WIDTH));
        let run = self.tally.tests_run;
        self.streams.writeln_err(&format!(
            "Ran {} test{} in {:.3}s",
            run,
            if run == 1 { "" } else { "s" },
            self.time_taken.as_secs_f64()
        ));
        self.streams.writeln_err("");
        if self.tally.was_successful() {
            self.streams.writeln_err(&"OK".green().to_string());
        } else {
            let failed = self.tally.failures.len();
            let errored = self.tally.errors.len();
            let mut verdict = String::from("FAILED (");
            if failed > 0 {
                verdict.push_str(&format!("failures={failed}"));
            }
            if errored > 0 {
                if failed > 0 {
                    verdict.push_str(", ");
                }
                verdict.push_str(&format!("errors={errored}"));
            }
            verdict.push(')');
            self.streams.writeln_err(&verdict.red().to_string());
        }
    }

    fn print_errors(&mut self) {
        if self.dots || self.show_all {
            // Ends the progress line before the diagnostic blocks.
            self.streams.writeln("");
        }
        let errors = std::mem::take(&mut self.tally.errors);
        self.print_error_list("ERROR", &errors);
        self.tally.errors = errors;
        let failures = std::mem::take(&mut self.tally.failures);
        self.print_error_list("FAIL", &failures);
        self.tally.failures = failures;
    }

    fn print_error_list(&mut self, flavour: &str, entries: &[FaultEntry]) {
        for entry in entries {
            self.streams
                .writeln_err(&FAULT_SEP1.to_string().repeat(SEPARATOR_WIDTH));
            self.streams.writeln_err(&format!(
                "{} {} ({})",
                flavour.red(),
                entry.case.id().cyan(),
                entry.case.describe()
            ));
            if self.explain {
                let explanation = entry.case.explain();
                if !explanation.is_empty() {
                    self.streams
                        .writeln_err(&FAULT_SEP2.to_string().repeat(SEPARATOR_WIDTH));
                    self.streams.write_err(explanation);
                    self.streams.writeln_err("");
                }
            }
            self.streams
                .writeln_err(&FAULT_SEP2.to_string().repeat(SEPARATOR_WIDTH));
            for line in entry.fault.detail_lines() {
                self.streams.writeln_err(&line);
            }
            self.streams.writeln_err("");
        }
    }
}

impl Collector for TextCollector {
    fn start_test(&mut self, case: &CaseMeta) {
        self.tally.start_test(case);
        if self.show_all {
            self.streams
                .write(&format!("{} ({})", case.id(), case.describe()));
            self.streams.write(" ... ");
        }
    }

    fn stop_test(&mut self, case: &CaseMeta) {
        self.tally.stop_test(case);
    }

    fn add_success(&mut self, case: &CaseMeta) {
        self.tally.add_success(case);
        if self.show_all {
            self.streams.writeln(&"ok".green().to_string());
        } else if self.dots {
            self.streams.write(".");
        }
    }

    fn add_failure(&mut self, case: &CaseMeta, fault: Fault) {
        self.tally.add_failure(case, fault);
        if self.show_all {
            self.streams.writeln(&"FAIL".red().to_string());
        } else if self.dots {
            self.streams.write("F");
        }
    }

    fn add_error(&mut self, case: &CaseMeta, fault: Fault) {
        let interrupted = fault.is_interrupt();
        self.tally.add_error(case, fault);
        if self.show_all {
            self.streams.writeln(&"ERROR".red().to_string());
        } else if self.dots {
            self.streams.write("E");
        }
        if interrupted {
            self.stop();
        }
    }

    fn should_stop(&self) -> bool {
        self.tally.should_stop()
    }

    fn stop(&mut self) {
        self.tally.stop();
    }
}

/// The phases a runner moves through; `Done` is terminal.
///
/// 运行器经历的阶段；`Done` 是终止态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Summarizing,
    Done,
}

/// The finished run: final tally, the timed span from first unit to last,
/// and when the run completed. This is what secondary report writers
/// consume.
///
/// 完成的运行：最终计数、从第一个单元到最后一个单元的计时跨度，
/// 以及运行完成的时间。这是次级报告写入器消费的内容。
pub struct RunReport {
    pub tally: RunTally,
    pub elapsed: Duration,
    pub finished_at: DateTime<Local>,
}

impl RunReport {
    /// The process-level verdict.
    pub fn was_successful(&self) -> bool {
        self.tally.was_successful()
    }
}

/// Drives a suite against a fresh text collector and renders the summary.
///
/// The runner is a one-shot state machine: `run` consumes it, moving
/// idle → running → summarizing → done, and returns the finished report.
/// Traversal may have completed or been halted by a stop request; the
/// summary is rendered either way.
///
/// 针对全新的文本收集器驱动套件并渲染摘要。
/// 运行器是一次性状态机：`run` 消费它，经历
/// idle → running → summarizing → done，并返回完成的报告。
/// 遍历可能已完成或被停止请求中止；无论哪种情况都会渲染摘要。
pub struct TextRunner {
    streams: StreamPair,
    verbosity: Verbosity,
    explain: bool,
    phase: RunPhase,
}

impl TextRunner {
    /// A runner over process stdout/stderr.
    pub fn new(verbosity: Verbosity, explain: bool) -> Self {
        Self::with_streams(StreamPair::stdio(), verbosity, explain)
    }

    pub fn with_streams(streams: StreamPair, verbosity: Verbosity, explain: bool) -> Self {
        TextRunner {
            streams,
            verbosity,
            explain,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs the given test, renders the report, and returns the finished
    /// run. `Done` is terminal, so the runner is consumed.
    pub fn run(mut self, test: &mut dyn Runnable) -> RunReport {
        debug_assert_eq!(self.phase, RunPhase::Idle);
        self.phase = RunPhase::Running;
        let mut collector = TextCollector::new(self.streams, self.verbosity, self.explain);
        collector.begin_tests();
        test.run(&mut collector);
        collector.end_tests();
        self.phase = RunPhase::Summarizing;
        collector.summarize();
        self.phase = RunPhase::Done;
        RunReport {
            elapsed: collector.time_taken(),
            finished_at: Local::now(),
            tally: collector.into_tally(),
        }
    }
}
