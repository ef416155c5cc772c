//! # Loader Module Unit Tests / Loader 模块单元测试
//!
//! This module contains unit tests for the `loader.rs` module: check
//! selection and ordering, the fixture and namespace rules, dotted-name
//! resolution against a registry, and the hard-failure behavior for
//! unresolvable specifiers.
//!
//! 此模块包含 `loader.rs` 模块的单元测试：检查选择和排序、
//! 夹具和命名空间规则、针对注册表的点分名称解析，
//! 以及无法解析说明符的硬失败行为。

mod common;

use common::{ExtChecks, Scrambled, sample_registry};
use suite_runner::core::case::Runnable;
use suite_runner::core::collector::RunTally;
use suite_runner::core::loader::Loader;
use suite_runner::core::suite::TestItem;

#[test]
fn test_check_names_are_prefix_filtered_and_sorted() {
    let loader = Loader::new();
    assert_eq!(loader.check_names::<Scrambled>(), vec!["testA", "testB", "testC"]);
}

#[test]
fn test_fixture_suite_carries_the_fixture_name_and_order() {
    let loader = Loader::new();
    let suite = loader.load_tests_from_fixture::<Scrambled>();
    assert_eq!(suite.name(), Some("Scrambled"));
    assert_eq!(suite.count_test_cases(), 3);
    assert_eq!(
        suite.case_ids(),
        vec!["Scrambled.testA", "Scrambled.testB", "Scrambled.testC"]
    );
}

#[test]
fn test_ordering_function_is_caller_overridable() {
    let loader = Loader::new().with_ordering(|a, b| b.cmp(a));
    assert_eq!(loader.check_names::<Scrambled>(), vec!["testC", "testB", "testA"]);
}

#[test]
fn test_check_prefix_is_caller_overridable() {
    let loader = Loader::new().with_prefix("helper");
    assert_eq!(loader.check_names::<Scrambled>(), vec!["helperNotACheck"]);
}

#[test]
fn test_embedded_checks_merge_with_override_replacing() {
    let loader = Loader::new();
    let mut suite = loader.load_tests_from_fixture::<ExtChecks>();
    assert_eq!(
        suite.case_ids(),
        vec!["ExtChecks.testBase", "ExtChecks.testExt", "ExtChecks.testOverride"]
    );

    // The base version of testOverride fails; a clean run proves the
    // embedding fixture's version replaced it rather than duplicating it.
    let mut tally = RunTally::new();
    suite.run(&mut tally);
    assert_eq!(tally.tests_run, 3);
    assert!(tally.was_successful());
}

#[test]
fn test_loading_twice_yields_structurally_equal_suites() {
    let loader = Loader::new();
    let first = loader.load_tests_from_fixture::<Scrambled>();
    let second = loader.load_tests_from_fixture::<Scrambled>();
    assert_eq!(first.case_ids(), second.case_ids());
}

#[test]
fn test_name_resolves_a_registered_fixture() {
    let registry = sample_registry();
    let loader = Loader::new();
    let item = loader.load_tests_from_name("pkg.mod.TwoChecks", &registry).unwrap();
    assert_eq!(item.count_test_cases(), 2);
    assert_eq!(
        item.case_ids(),
        vec!["TwoChecks.testEquality", "TwoChecks.testMismatch"]
    );
}

#[test]
fn test_name_resolves_a_single_check_as_a_single_unit_suite() {
    let registry = sample_registry();
    let loader = Loader::new();
    let item = loader
        .load_tests_from_name("pkg.mod.FixtureX.testFoo", &registry)
        .unwrap();
    assert!(matches!(item, TestItem::Suite(_)));
    assert_eq!(item.count_test_cases(), 1);
    let ids = item.case_ids();
    assert!(ids[0].ends_with(".testFoo"), "unexpected id {:?}", ids);
}

#[test]
fn test_name_resolves_a_namespace_to_its_fixtures() {
    let registry = sample_registry();
    let loader = Loader::new();
    let item = loader.load_tests_from_name("pkg.mod", &registry).unwrap();
    // FixtureX, Scrambled and TwoChecks, in registry order.
    assert_eq!(item.count_test_cases(), 1 + 3 + 2);
    let ids = item.case_ids();
    assert!(ids[0].starts_with("FixtureX."));
    assert!(ids[1].starts_with("Scrambled."));
    assert!(ids.last().unwrap().starts_with("TwoChecks."));
}

#[test]
fn test_name_resolves_children_of_a_registered_suite() {
    let registry = sample_registry();
    let loader = Loader::new();

    let nested = loader
        .load_tests_from_name("pkg.bundle.TwoChecks", &registry)
        .unwrap();
    assert_eq!(nested.count_test_cases(), 2);

    let unit = loader
        .load_tests_from_name("pkg.bundle.TwoChecks.testMismatch", &registry)
        .unwrap();
    assert!(matches!(unit, TestItem::Case(_)));
    assert_eq!(unit.case_ids(), vec!["TwoChecks.testMismatch"]);
}

#[test]
fn test_name_resolves_a_factory_target() {
    let registry = sample_registry();
    let loader = Loader::new();
    let item = loader.load_tests_from_name("pkg.made.single", &registry).unwrap();
    assert_eq!(item.count_test_cases(), 1);
    assert_eq!(item.case_ids(), vec!["single"]);
}

#[test]
fn test_names_can_resolve_relative_to_a_namespace() {
    let registry = sample_registry();
    let loader = Loader::new();
    let item = loader
        .load_tests_from_name_under("pkg.mod", "FixtureX.testFoo", &registry)
        .unwrap();
    assert_eq!(item.case_ids(), vec!["FixtureX.testFoo"]);
}

#[test]
fn test_unresolvable_names_are_hard_failures() {
    let registry = sample_registry();
    let loader = Loader::new();

    let err = loader
        .load_tests_from_name("no.such.Thing", &registry)
        .unwrap_err();
    assert!(err.to_string().contains("no.such.Thing"));

    let err = loader
        .load_tests_from_name("pkg.mod.TwoChecks.testMissing", &registry)
        .unwrap_err();
    assert!(err.to_string().contains("testMissing"));

    assert!(loader.load_tests_from_name("", &registry).is_err());
}

#[test]
fn test_names_resolve_independently_and_keep_input_order() {
    let registry = sample_registry();
    let loader = Loader::new();
    let names = vec![
        "pkg.other.ExtChecks".to_string(),
        "pkg.mod.FixtureX.testFoo".to_string(),
        "pkg.mod.Scrambled".to_string(),
    ];
    let suite = loader.load_tests_from_names(&names, &registry).unwrap();
    assert_eq!(suite.count_test_cases(), 3 + 1 + 3);
    let ids = suite.case_ids();
    assert!(ids[0].starts_with("ExtChecks."));
    assert_eq!(ids[3], "FixtureX.testFoo");
    assert!(ids[4].starts_with("Scrambled."));
}

#[test]
fn test_load_all_composes_every_registered_fixture() {
    let registry = sample_registry();
    let loader = Loader::new();
    let suite = loader.load_all(&registry);
    // TwoChecks + Scrambled + FixtureX + ExtChecks; the suite and factory
    // targets are not fixtures and are not part of the default sweep.
    assert_eq!(suite.count_test_cases(), 2 + 3 + 1 + 3);

    let ids = suite.case_ids();
    assert!(ids[0].starts_with("FixtureX."), "registry order, got {:?}", ids);
}

#[test]
fn test_load_runs_are_distinct_instances() {
    let registry = sample_registry();
    let loader = Loader::new();
    let mut first = loader.load_tests_from_name("pkg.mod.TwoChecks", &registry).unwrap();
    let mut second = loader.load_tests_from_name("pkg.mod.TwoChecks", &registry).unwrap();

    let mut tally = RunTally::new();
    first.run(&mut tally);
    second.run(&mut tally);
    assert_eq!(tally.tests_run, 4);
    assert_eq!(tally.failures.len(), 2);
}
