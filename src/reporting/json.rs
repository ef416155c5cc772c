//! # JSON Reporting Module / JSON 报告模块
//!
//! This module writes a machine-readable report of a finished run. The
//! text reporter remains the primary surface; the JSON file is a secondary
//! target for tooling that wants the counts and fault records without
//! parsing the console grammar.
//!
//! 此模块写入已完成运行的机器可读报告。
//! 文本报告器仍是主要界面；JSON 文件是次级目标，
//! 供希望获得计数和故障记录而无需解析控制台语法的工具使用。

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::collector::FaultEntry;
use crate::reporting::console::RunReport;

/// The serialized shape of a finished run.
/// 已完成运行的序列化形态。
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    elapsed_secs: f64,
    tests_run: usize,
    success: bool,
    failures: &'a [FaultEntry],
    errors: &'a [FaultEntry],
}

/// Serializes the finished run to pretty-printed JSON at the given path,
/// creating parent directories as needed. Failing to write the report is
/// an invocation error, not a test outcome.
///
/// 将已完成的运行序列化为给定路径的格式化 JSON，按需创建父目录。
/// 写入报告失败是调用错误，而不是测试结果。
///
/// # Arguments / 参数
/// * `report` - The finished run to serialize / 要序列化的已完成运行
/// * `output_path` - Where the JSON file is written / JSON 文件的写入位置
pub fn write_json_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let body = JsonReport {
        generated_at: report.finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        elapsed_secs: report.elapsed.as_secs_f64(),
        tests_run: report.tally.tests_run,
        success: report.was_successful(),
        failures: &report.tally.failures,
        errors: &report.tally.errors,
    };
    let body = serde_json::to_string_pretty(&body).context("Failed to serialize run report")?;
    if let Some(parent) = output_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create report directory {}", parent.display())
        })?;
    }
    fs::write(output_path, body)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))
}
