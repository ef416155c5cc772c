//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the engine,
//! including the test unit lifecycle, result collection, suite
//! composition, and registry-based test discovery.
//!
//! 此模块包含引擎的核心功能，
//! 包括测试单元生命周期、结果收集、套件组合和基于注册表的测试发现。

pub mod case;
pub mod collector;
pub mod loader;
pub mod registry;
pub mod suite;

// Re-exports
pub use case::{Fault, FunctionCase, MethodCase, Runnable};
pub use collector::RunTally;
pub use loader::Loader;
pub use registry::Registry;
pub use suite::Suite;
