//! # Suite Module / 套件模块
//!
//! This module defines the ordered composite of test units and nested
//! suites. Insertion order is execution order, and a suite satisfies the
//! same runnable capability as a single unit, so composition is
//! transparent to the traversal.
//!
//! 此模块定义测试单元和嵌套套件的有序组合。
//! 插入顺序即执行顺序，套件满足与单个单元相同的可运行能力，
//! 因此组合对遍历是透明的。

use std::collections::HashMap;

use crate::core::case::{Fixture, FunctionCase, MethodCase, Runnable, TestCase};
use crate::core::collector::Collector;

/// A runnable child of a suite: either an atomic unit or a nested suite.
///
/// 套件的可运行子项：原子单元或嵌套套件。
pub enum TestItem {
    Case(Box<dyn TestCase>),
    Suite(Suite),
}

impl std::fmt::Debug for TestItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestItem::Case(case) => f.debug_tuple("Case").field(case.meta()).finish(),
            TestItem::Suite(suite) => f.debug_tuple("Suite").field(suite).finish(),
        }
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .field("index", &self.index)
            .finish()
    }
}

impl TestItem {
    pub fn run(&mut self, collector: &mut dyn Collector) {
        match self {
            TestItem::Case(case) => case.run(collector),
            TestItem::Suite(suite) => suite.run(collector),
        }
    }

    pub fn count_test_cases(&self) -> usize {
        match self {
            TestItem::Case(case) => case.count_test_cases(),
            TestItem::Suite(suite) => suite.count_test_cases(),
        }
    }

    /// The name this item is indexed under inside its parent: the nested
    /// suite's name when the child is a named suite, else the unit's own
    /// check discriminator. Unnamed nested suites are not indexed.
    fn index_name(&self) -> Option<String> {
        match self {
            TestItem::Case(case) => Some(case.check_name().to_string()),
            TestItem::Suite(suite) => suite.name().map(str::to_string),
        }
    }

    /// Unit ids reachable from this item, in execution order.
    pub fn case_ids(&self) -> Vec<String> {
        match self {
            TestItem::Case(case) => vec![case.meta().id().to_string()],
            TestItem::Suite(suite) => suite.case_ids(),
        }
    }
}

impl From<Suite> for TestItem {
    fn from(suite: Suite) -> Self {
        TestItem::Suite(suite)
    }
}

impl From<FunctionCase> for TestItem {
    fn from(case: FunctionCase) -> Self {
        TestItem::Case(Box::new(case))
    }
}

impl<F: Fixture> From<MethodCase<F>> for TestItem {
    fn from(case: MethodCase<F>) -> Self {
        TestItem::Case(Box::new(case))
    }
}

impl From<Box<dyn TestCase>> for TestItem {
    fn from(case: Box<dyn TestCase>) -> Self {
        TestItem::Case(case)
    }
}

/// An ordered, composable collection of test units and nested suites.
///
/// Children run in the order they were added, against the one collector
/// passed down the traversal, so nested suites flatten their results
/// transparently. A name index over direct children supports addressing a
/// nested item without walking the whole tree.
///
/// 测试单元和嵌套套件的有序可组合集合。
/// 子项按添加顺序运行，使用沿遍历传递的同一个收集器，
/// 因此嵌套套件透明地合并其结果。
/// 直接子项上的名称索引支持在不遍历整棵树的情况下定位嵌套项。
#[derive(Default)]
pub struct Suite {
    name: Option<String>,
    tests: Vec<TestItem>,
    index: HashMap<String, usize>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Suite {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Appends one runnable item, indexing it under its derived name. A
    /// later child with the same derived name shadows the earlier one in
    /// the index; execution order is unaffected.
    pub fn add_test(&mut self, test: impl Into<TestItem>) {
        let test = test.into();
        if let Some(name) = test.index_name() {
            self.index.insert(name, self.tests.len());
        }
        self.tests.push(test);
    }

    pub fn add_tests(&mut self, tests: impl IntoIterator<Item = TestItem>) {
        for test in tests {
            self.add_test(test);
        }
    }

    /// Retrieves a direct child by its indexed name.
    pub fn get_test_for_name(&self, name: &str) -> Option<&TestItem> {
        self.index.get(name).map(|&at| &self.tests[at])
    }

    /// Consumes the suite and extracts the named direct child, used when a
    /// dotted specifier resolves through a freshly built suite.
    pub fn into_test_for_name(mut self, name: &str) -> Option<TestItem> {
        let at = self.index.remove(name)?;
        Some(self.tests.swap_remove(at))
    }

    pub fn tests(&self) -> &[TestItem] {
        &self.tests
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Unit ids reachable from this suite, in execution order.
    pub fn case_ids(&self) -> Vec<String> {
        self.tests.iter().flat_map(TestItem::case_ids).collect()
    }

    /// Runs the children without a collector, propagating the first fault.
    pub fn debug(&mut self) -> crate::core::case::CheckResult {
        for test in &mut self.tests {
            match test {
                TestItem::Case(case) => case.debug()?,
                TestItem::Suite(suite) => suite.debug()?,
            }
        }
        Ok(())
    }
}

impl Runnable for Suite {
    /// Iterates children in insertion order, checking the collector's stop
    /// flag before each child so cancellation takes effect at unit
    /// boundaries only.
    fn run(&mut self, collector: &mut dyn Collector) {
        for test in &mut self.tests {
            if collector.should_stop() {
                break;
            }
            test.run(collector);
        }
    }

    /// Recursive sum over the children, recomputed on every call so it
    /// reflects post-construction mutation of the tree.
    fn count_test_cases(&self) -> usize {
        self.tests.iter().map(TestItem::count_test_cases).sum()
    }
}
