//! # Result Collector Module / 结果收集器模块
//!
//! This module defines the collector capability that accumulates outcomes
//! while a suite runs, and the plain tally implementation backing every
//! collector in the crate. Collectors are decoupled from both execution
//! and rendering: the traversal calls them, the reporter reads them.
//!
//! 此模块定义在套件运行时累积结果的收集器能力，
//! 以及支撑 crate 中每个收集器的普通计数实现。
//! 收集器与执行和渲染解耦：遍历调用它们，报告器读取它们。

use serde::Serialize;

use crate::core::case::{CaseMeta, Fault};

/// Receives the lifecycle notifications of every unit the traversal runs.
/// Recording methods never fail; the stop flag is the only channel back
/// into the traversal and is honored at unit boundaries only.
///
/// 接收遍历运行的每个单元的生命周期通知。
/// 记录方法绝不失败；停止标志是返回遍历的唯一通道，
/// 仅在单元边界处被遵守。
pub trait Collector {
    /// Called when the given unit is about to run; increments the run
    /// count unconditionally.
    fn start_test(&mut self, case: &CaseMeta);

    /// Called when the given unit has finished, on every exit path.
    fn stop_test(&mut self, case: &CaseMeta);

    fn add_success(&mut self, case: &CaseMeta);

    fn add_failure(&mut self, case: &CaseMeta, fault: Fault);

    fn add_error(&mut self, case: &CaseMeta, fault: Fault);

    fn should_stop(&self) -> bool;

    /// Requests that the traversal cease dispatching further units at the
    /// next unit boundary, never mid-unit.
    fn stop(&mut self);
}

/// One recorded fault: the unit it was recorded against and the fault
/// itself, in recording order.
///
/// 一条记录的故障：记录故障的单元和故障本身，按记录顺序。
#[derive(Debug, Clone, Serialize)]
pub struct FaultEntry {
    pub case: CaseMeta,
    pub fault: Fault,
}

/// Holder for run statistics: total run count and the ordered failure and
/// error records. Every started unit produces exactly one of
/// {success, failure, error}, or the run was explicitly stopped first; a
/// unit whose set-up faults contributes to the run count and the errors
/// only.
///
/// 运行统计的持有者：总运行计数以及有序的失败和错误记录。
/// 每个已启动的单元恰好产生 {成功, 失败, 错误} 之一，
/// 否则运行已被显式停止；准备阶段故障的单元仅计入运行计数和错误。
#[derive(Debug, Default, Serialize)]
pub struct RunTally {
    pub tests_run: usize,
    pub failures: Vec<FaultEntry>,
    pub errors: Vec<FaultEntry>,
    #[serde(skip)]
    should_stop: bool,
}

impl RunTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff both fault sequences are empty.
    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }
}

impl Collector for RunTally {
    fn start_test(&mut self, _case: &CaseMeta) {
        self.tests_run += 1;
    }

    fn stop_test(&mut self, _case: &CaseMeta) {}

    fn add_success(&mut self, _case: &CaseMeta) {}

    fn add_failure(&mut self, case: &CaseMeta, fault: Fault) {
        self.failures.push(FaultEntry {
            case: case.clone(),
            fault,
        });
    }

    fn add_error(&mut self, case: &CaseMeta, fault: Fault) {
        self.errors.push(FaultEntry {
            case: case.clone(),
            fault,
        });
    }

    fn should_stop(&self) -> bool {
        self.should_stop
    }

    fn stop(&mut self) {
        self.should_stop = true;
    }
}
