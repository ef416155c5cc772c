//! # Registry Module / 注册表模块
//!
//! This module defines the explicit mapping from fully-qualified dotted
//! names to test construction targets. The entry point populates it at
//! startup and passes it down, so "resolution" is a deterministic lookup
//! plus a small set of composition rules instead of a live-namespace walk,
//! and there is no process-wide singleton state.
//!
//! 此模块定义从完全限定点分名称到测试构造目标的显式映射。
//! 入口点在启动时填充它并向下传递，因此"解析"是确定性查找
//! 加上一小组组合规则，而不是对活动命名空间的遍历，
//! 并且不存在进程级单例状态。

use std::collections::BTreeMap;

use crate::core::case::{Fixture, TestCase};
use crate::core::loader::Loader;
use crate::core::suite::{Suite, TestItem};

/// A fixture registered under a qualified name: it can build the suite of
/// all its checks, or a single named check.
///
/// 在限定名称下注册的夹具：它可以构建其所有检查的套件，或单个命名检查。
pub struct FixtureTarget {
    build_suite: Box<dyn Fn(&Loader) -> Suite>,
    build_check: Box<dyn Fn(&Loader, &str) -> Option<Box<dyn TestCase>>>,
}

impl FixtureTarget {
    pub fn build_suite(&self, loader: &Loader) -> Suite {
        (self.build_suite)(loader)
    }

    pub fn build_check(&self, loader: &Loader, name: &str) -> Option<Box<dyn TestCase>> {
        (self.build_check)(loader, name)
    }
}

/// One registered construction target.
///
/// 一个注册的构造目标。
pub enum Target {
    /// A fixture class of checks; loaded via the loader's fixture rule.
    Fixture(FixtureTarget),
    /// A pre-composed suite, rebuilt fresh on every resolution.
    Suite(Box<dyn Fn() -> Suite>),
    /// A zero-argument factory yielding a unit or a suite; the signature
    /// makes the original's "callable must return a test" check static.
    Factory(Box<dyn Fn() -> TestItem>),
}

/// The deterministic, ordered mapping from fully-qualified dotted names to
/// targets. Dotted prefixes of registered names act as namespaces: the
/// immediate fixture children of a prefix form that namespace's suite.
///
/// 从完全限定点分名称到目标的确定性有序映射。
/// 注册名称的点分前缀充当命名空间：前缀的直接夹具子项构成该命名空间的套件。
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<String, Target>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fixture under a qualified dotted name, e.g.
    /// `"pkg.mod.FixtureX"`. The fixture rule is applied lazily, at
    /// resolution time, so every load builds fresh instances.
    pub fn add_fixture<F: Fixture>(&mut self, qualified: &str) {
        self.entries.insert(
            qualified.to_string(),
            Target::Fixture(FixtureTarget {
                build_suite: Box::new(|loader| loader.load_tests_from_fixture::<F>()),
                build_check: Box::new(|loader, name| {
                    loader
                        .case_for_check::<F>(name)
                        .map(|case| Box::new(case) as Box<dyn TestCase>)
                }),
            }),
        );
    }

    /// Registers a suite thunk under a qualified dotted name.
    pub fn add_suite(&mut self, qualified: &str, build: impl Fn() -> Suite + 'static) {
        self.entries
            .insert(qualified.to_string(), Target::Suite(Box::new(build)));
    }

    /// Registers a zero-argument factory under a qualified dotted name.
    pub fn add_factory(&mut self, qualified: &str, build: impl Fn() -> TestItem + 'static) {
        self.entries
            .insert(qualified.to_string(), Target::Factory(Box::new(build)));
    }

    pub fn get(&self, qualified: &str) -> Option<&Target> {
        self.entries.get(qualified)
    }

    /// True when registered names extend the given dotted prefix.
    pub fn is_namespace(&self, prefix: &str) -> bool {
        let dotted = format!("{prefix}.");
        self.entries
            .range(dotted.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&dotted))
    }

    /// The longest registered entry that is a strict dotted prefix of the
    /// given name, together with the remaining segments.
    pub fn longest_prefix<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> Option<(&'a Target, Vec<&'b str>)> {
        let segments: Vec<&str> = name.split('.').collect();
        for cut in (1..segments.len()).rev() {
            let prefix = segments[..cut].join(".");
            if let Some(target) = self.entries.get(&prefix) {
                return Some((target, segments[cut..].to_vec()));
            }
        }
        None
    }

    /// The immediate fixture children of a namespace prefix, in registry
    /// (sorted) order.
    pub fn fixtures_under(&self, prefix: &str) -> Vec<(&str, &FixtureTarget)> {
        let dotted = format!("{prefix}.");
        self.entries
            .range(dotted.clone()..)
            .take_while(|(key, _)| key.starts_with(&dotted))
            .filter(|(key, _)| !key[dotted.len()..].contains('.'))
            .filter_map(|(key, target)| match target {
                Target::Fixture(fixture) => Some((key.as_str(), fixture)),
                _ => None,
            })
            .collect()
    }

    /// Every registered fixture, in registry (sorted) order. This is the
    /// default-specifier rule: no names means the whole registry.
    pub fn fixtures(&self) -> Vec<(&str, &FixtureTarget)> {
        self.entries
            .iter()
            .filter_map(|(key, target)| match target {
                Target::Fixture(fixture) => Some((key.as_str(), fixture)),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
