//! # Loader Module / 加载器模块
//!
//! This module turns registered names into runnable suites. The fixture
//! rule selects, deduplicates and orders a fixture's checks; the namespace
//! rule composes every fixture directly under a dotted prefix; dotted
//! string specifiers resolve through the registry and the composition
//! rules. An unresolvable specifier is a configuration mistake and is a
//! hard failure, not a partial result.
//!
//! 此模块将注册名称转换为可运行的套件。夹具规则选择、去重并排序夹具的检查；
//! 命名空间规则组合点分前缀正下方的每个夹具；
//! 点分字符串说明符通过注册表和组合规则解析。
//! 无法解析的说明符是配置错误，是硬失败，而不是部分结果。

use anyhow::{Result, bail};
use std::cmp::Ordering;

use crate::core::case::{Check, Fixture, MethodCase};
use crate::core::registry::{Registry, Target};
use crate::core::suite::{Suite, TestItem};

/// Builds suites from fixtures and registered names, applying a naming
/// convention and a deterministic ordering. Construct one per invocation
/// and pass it down; there is no process-wide default loader.
///
/// 从夹具和注册名称构建套件，应用命名约定和确定性排序。
/// 每次调用构造一个并向下传递；不存在进程级默认加载器。
pub struct Loader {
    check_prefix: String,
    sort_checks_with: fn(&str, &str) -> Ordering,
}

impl Default for Loader {
    fn default() -> Self {
        Loader {
            check_prefix: "test".to_string(),
            sort_checks_with: Ord::cmp,
        }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the recognized check prefix (default `"test"`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.check_prefix = prefix.into();
        self
    }

    /// Overrides the ordering applied to selected check names (default
    /// natural string ordering).
    pub fn with_ordering(mut self, sort_checks_with: fn(&str, &str) -> Ordering) -> Self {
        self.sort_checks_with = sort_checks_with;
        self
    }

    /// Selects a fixture's checks: prefix filter, first-occurrence-wins
    /// dedup (an overriding check replaces an embedded one of the same
    /// name), then the configured ordering.
    fn select_checks<F: Fixture>(&self) -> Vec<Check<F>> {
        let mut selected: Vec<Check<F>> = Vec::new();
        for check in F::checks() {
            if !check.name().starts_with(self.check_prefix.as_str()) {
                continue;
            }
            if selected.iter().any(|seen| seen.name() == check.name()) {
                continue;
            }
            selected.push(check);
        }
        selected.sort_by(|a, b| (self.sort_checks_with)(a.name(), b.name()));
        selected
    }

    /// The selected check names of a fixture, in load order.
    pub fn check_names<F: Fixture>(&self) -> Vec<String> {
        self.select_checks::<F>()
            .iter()
            .map(|check| check.name().to_string())
            .collect()
    }

    /// Returns a suite of all checks contained in the fixture, one unit
    /// per selected check, each bound to a fresh fixture instance. The
    /// suite carries the fixture's simple name.
    pub fn load_tests_from_fixture<F: Fixture>(&self) -> Suite {
        let mut suite = Suite::named(F::fixture_name());
        for check in self.select_checks::<F>() {
            suite.add_test(MethodCase::new(check));
        }
        suite
    }

    /// Builds the unit for one named check of the fixture, regardless of
    /// the check prefix.
    pub fn case_for_check<F: Fixture>(&self, name: &str) -> Option<MethodCase<F>> {
        F::checks()
            .into_iter()
            .find(|check| check.name() == name)
            .map(MethodCase::new)
    }

    /// Returns a suite of all fixtures registered directly under the
    /// dotted prefix, each loaded via the fixture rule, in registry order.
    pub fn load_tests_from_namespace(&self, registry: &Registry, prefix: &str) -> Suite {
        let mut suite = Suite::new();
        for (_, fixture) in registry.fixtures_under(prefix) {
            suite.add_test(fixture.build_suite(self));
        }
        suite
    }

    /// Returns every registered fixture's suite composed into one, in
    /// registry order. This is the default when no specifier is given.
    pub fn load_all(&self, registry: &Registry) -> Suite {
        let mut suite = Suite::new();
        for (_, fixture) in registry.fixtures() {
            suite.add_test(fixture.build_suite(self));
        }
        suite
    }

    /// Resolves a dotted string specifier to a runnable item.
    ///
    /// The name may resolve to a registered fixture, suite, or factory, to
    /// a namespace of fixtures, to a single check within a fixture, or to
    /// a named child within a registered suite. Resolution of an
    /// unresolvable name propagates an error.
    ///
    /// 将点分字符串说明符解析为可运行项。
    /// 名称可以解析为注册的夹具、套件或工厂，夹具的命名空间，
    /// 夹具内的单个检查，或注册套件内的命名子项。
    /// 无法解析的名称会传播错误。
    pub fn load_tests_from_name(&self, name: &str, registry: &Registry) -> Result<TestItem> {
        if name.is_empty() {
            bail!("incomplete test name");
        }
        if let Some(target) = registry.get(name) {
            return Ok(self.item_from_target(target));
        }
        if registry.is_namespace(name) {
            return Ok(TestItem::Suite(self.load_tests_from_namespace(registry, name)));
        }
        let Some((target, rest)) = registry.longest_prefix(name) else {
            bail!("cannot resolve test specifier '{name}': no such registered target");
        };
        match target {
            Target::Fixture(fixture) => {
                let [check_name] = rest.as_slice() else {
                    bail!("cannot resolve test specifier '{name}': expected a single check name after the fixture");
                };
                let Some(case) = fixture.build_check(self, check_name) else {
                    bail!("cannot resolve test specifier '{name}': fixture has no check named '{check_name}'");
                };
                // A bound check is wrapped as a single-unit suite.
                let mut suite = Suite::new();
                suite.add_test(case);
                Ok(TestItem::Suite(suite))
            }
            Target::Suite(build) => self.walk(TestItem::Suite(build()), &rest, name),
            Target::Factory(build) => self.walk(build(), &rest, name),
        }
    }

    /// Resolves a dotted specifier relative to an already-resolved
    /// namespace prefix; every name the registry holds is absolute, so the
    /// relative form is the prefixed lookup.
    pub fn load_tests_from_name_under(
        &self,
        namespace: &str,
        name: &str,
        registry: &Registry,
    ) -> Result<TestItem> {
        self.load_tests_from_name(&format!("{namespace}.{name}"), registry)
    }

    /// Resolves each name independently and wraps the results in one outer
    /// suite, preserving input order.
    pub fn load_tests_from_names(&self, names: &[String], registry: &Registry) -> Result<Suite> {
        let mut suite = Suite::new();
        for name in names {
            suite.add_test(self.load_tests_from_name(name, registry)?);
        }
        Ok(suite)
    }

    fn item_from_target(&self, target: &Target) -> TestItem {
        match target {
            Target::Fixture(fixture) => TestItem::Suite(fixture.build_suite(self)),
            Target::Suite(build) => TestItem::Suite(build()),
            Target::Factory(build) => build(),
        }
    }

    /// Walks the remaining dotted segments through nested-suite lookup.
    fn walk(&self, mut item: TestItem, segments: &[&str], name: &str) -> Result<TestItem> {
        for segment in segments {
            item = match item {
                TestItem::Suite(suite) => match suite.into_test_for_name(segment) {
                    Some(child) => child,
                    None => bail!(
                        "cannot resolve test specifier '{name}': no child named '{segment}'"
                    ),
                },
                TestItem::Case(_) => {
                    bail!("cannot resolve test specifier '{name}': '{segment}' is below a single unit")
                }
            };
        }
        Ok(item)
    }
}
