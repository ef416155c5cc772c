//! # Reporting Module / 报告模块
//!
//! This module handles the rendering of run results in multiple formats.
//! It provides the streaming console reporter with its dual-stream
//! routing, and a machine-readable JSON report writer.
//!
//! 此模块处理以多种格式渲染运行结果。
//! 它提供带有双流路由的流式控制台报告器，以及机器可读的 JSON 报告写入器。

pub mod console;
pub mod json;

// Re-export common reporting types
pub use console::{RunReport, StreamPair, TextCollector, TextRunner, Verbosity};
pub use json::write_json_report;
