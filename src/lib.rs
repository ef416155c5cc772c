//! # Suite Runner Library / Suite Runner 库
//!
//! This library provides the core functionality of the Suite Runner tool,
//! a deterministic, single-process test execution engine with composable
//! suites and registry-based discovery.
//!
//! 此库为 Suite Runner 工具提供核心功能，
//! 这是一个确定性的单进程测试执行引擎，具有可组合套件和基于注册表的发现。
//!
//! ## Modules / 模块
//!
//! - `core` - Test unit lifecycle, result collection, suites, loader and registry
//! - `reporting` - Console and JSON rendering of run results
//! - `cli` - Command-line interface driving a run end to end
//!
//! - `core` - 测试单元生命周期、结果收集、套件、加载器和注册表
//! - `reporting` - 运行结果的控制台和 JSON 渲染
//! - `cli` - 端到端驱动一次运行的命令行接口
//!
//! ## Usage / 用法
//!
//! Implement [`core::case::Fixture`] for each group of related checks,
//! register the fixtures in a [`core::registry::Registry`] at startup, and
//! hand the registry to [`cli::run`] (or compose suites by hand with
//! [`core::loader::Loader`] and drive them with
//! [`reporting::console::TextRunner`]).

pub mod cli;
pub mod core;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::case;
pub use crate::core::collector;
pub use crate::core::loader;
pub use crate::core::registry;
pub use crate::core::suite;
