// Shared test helpers: a cloneable in-memory stream and the sample
// fixtures the unit tests load and run.
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use suite_runner::core::case::{self, Check, Fixture, FunctionCase};
use suite_runner::core::loader::Loader;
use suite_runner::core::registry::Registry;
use suite_runner::core::suite::{Suite, TestItem};

/// A writer over a shared buffer, so a clone can be read after the
/// writing half has been moved into a runner.
///
/// 共享缓冲区上的写入器，以便在写入端被移入运行器后仍可通过克隆读取。
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Two checks, one passing and one failing with a known message, the
/// reporter scenario fixture.
#[derive(Default)]
pub struct TwoChecks;

impl Fixture for TwoChecks {
    fn fixture_name() -> &'static str {
        "TwoChecks"
    }

    fn doc() -> &'static str {
        "A passing and a failing check\n\
         The failing check carries a known diagnostic message so reporter\n\
         output can be asserted against it."
    }

    fn checks() -> Vec<Check<Self>> {
        vec![
            Check::with_doc("testEquality", "The passing check.", |_| Ok(())),
            Check::with_doc("testMismatch", "The failing check.", |_| case::fail("x != y")),
        ]
    }
}

/// Checks declared out of order, plus one non-check helper, for loader
/// ordering and prefix tests.
#[derive(Default)]
pub struct Scrambled;

impl Fixture for Scrambled {
    fn fixture_name() -> &'static str {
        "Scrambled"
    }

    fn checks() -> Vec<Check<Self>> {
        vec![
            Check::new("testB", |_| Ok(())),
            Check::new("testA", |_| Ok(())),
            Check::new("testC", |_| Ok(())),
            Check::new("helperNotACheck", |_| case::fail("must never be selected")),
        ]
    }
}

/// The base half of the override pair: its `testOverride` fails, so a run
/// only passes when the embedding fixture's version replaced it.
#[derive(Default)]
pub struct BaseChecks;

impl Fixture for BaseChecks {
    fn fixture_name() -> &'static str {
        "BaseChecks"
    }

    fn checks() -> Vec<Check<Self>> {
        vec![
            Check::new("testBase", |_| Ok(())),
            Check::new("testOverride", |_| case::fail("the base version ran")),
        ]
    }
}

/// Embeds `BaseChecks` and overrides one of its checks.
#[derive(Default)]
pub struct ExtChecks {
    pub base: BaseChecks,
}

impl Fixture for ExtChecks {
    fn fixture_name() -> &'static str {
        "ExtChecks"
    }

    fn checks() -> Vec<Check<Self>> {
        let mut checks = vec![
            Check::new("testOverride", |_| Ok(())),
            Check::new("testExt", |_| Ok(())),
        ];
        checks.extend(
            BaseChecks::checks()
                .into_iter()
                .map(|check| check.embed(|ext: &mut ExtChecks| &mut ext.base)),
        );
        checks
    }
}

/// A single named check, for the dotted single-check resolution scenario.
#[derive(Default)]
pub struct FixtureX;

impl Fixture for FixtureX {
    fn fixture_name() -> &'static str {
        "FixtureX"
    }

    fn checks() -> Vec<Check<Self>> {
        vec![Check::new("testFoo", |_| Ok(()))]
    }
}

/// A registry covering every target kind the loader resolves.
pub fn sample_registry() -> Registry {
    let mut registry = Registry::new();
    registry.add_fixture::<TwoChecks>("pkg.mod.TwoChecks");
    registry.add_fixture::<Scrambled>("pkg.mod.Scrambled");
    registry.add_fixture::<FixtureX>("pkg.mod.FixtureX");
    registry.add_fixture::<ExtChecks>("pkg.other.ExtChecks");
    registry.add_suite("pkg.bundle", || {
        let mut suite = Suite::named("bundle");
        suite.add_test(Loader::new().load_tests_from_fixture::<TwoChecks>());
        suite
    });
    registry.add_factory("pkg.made.single", || {
        TestItem::from(FunctionCase::with_doc(
            "single",
            "A factory-built check.",
            || Ok(()),
        ))
    });
    registry
}
