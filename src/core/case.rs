//! # Test Case Module / 测试用例模块
//!
//! This module defines the atomic executable unit of the engine: a check
//! bound to its fixture lifecycle. It includes the fault taxonomy used to
//! classify outcomes, the metadata attached to every unit, and the two
//! case variants (`MethodCase` for fixture-bound checks, `FunctionCase`
//! for free-standing closures).
//!
//! 此模块定义引擎的原子可执行单元：绑定到夹具生命周期的检查。
//! 它包括用于分类结果的故障分类、附加到每个单元的元数据，
//! 以及两种用例变体（`MethodCase` 用于夹具绑定的检查，
//! `FunctionCase` 用于独立闭包）。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::collector::Collector;

/// Enumerates the possible faults a check, set-up, or tear-down can report.
/// Classification is a variant discriminator: assertion helpers produce
/// `Failure`, everything else is an `Error`, and `Interrupt` additionally
/// requests that the remainder of the run be abandoned.
///
/// 枚举检查、准备或清理可能报告的故障。
/// 分类由变体判别：断言辅助函数产生 `Failure`，
/// 其他一切都是 `Error`，而 `Interrupt` 还会请求放弃剩余的运行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fault {
    /// An expected, assertion-driven mismatch inside a check.
    /// 检查内部预期的、由断言驱动的不匹配。
    Failure { message: String },
    /// Any other error escaping set-up, the check body, or tear-down.
    /// The chain holds the underlying causes, outermost first.
    ///
    /// 从准备、检查主体或清理中逃逸的任何其他错误。
    /// chain 保存底层原因，最外层在前。
    Error { message: String, chain: Vec<String> },
    /// A user interrupt observed while the check was running.
    /// 检查运行时观察到的用户中断。
    Interrupt,
}

impl Fault {
    pub fn failure(message: impl Into<String>) -> Self {
        Fault::Failure {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Fault::Error {
            message: message.into(),
            chain: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Fault::Failure { .. })
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(self, Fault::Interrupt)
    }

    /// Renders the fault for a diagnostic block. The engine's own dispatch
    /// adds no context of its own, so the detail starts directly at the
    /// fault raised by the check.
    ///
    /// 为诊断块渲染故障。引擎自身的调度不添加任何上下文，
    /// 因此详情直接从检查引发的故障开始。
    pub fn detail_lines(&self) -> Vec<String> {
        match self {
            Fault::Failure { message } => vec![format!("Failure: {message}")],
            Fault::Error { message, chain } => {
                let mut lines = vec![format!("Error: {message}")];
                lines.extend(chain.iter().map(|cause| format!("  caused by: {cause}")));
                lines
            }
            Fault::Interrupt => vec!["Interrupted".to_string()],
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Failure { message } => write!(f, "{message}"),
            Fault::Error { message, .. } => write!(f, "{message}"),
            Fault::Interrupt => write!(f, "interrupted"),
        }
    }
}

impl From<anyhow::Error> for Fault {
    fn from(err: anyhow::Error) -> Self {
        Fault::Error {
            message: err.to_string(),
            chain: err.chain().skip(1).map(|cause| cause.to_string()).collect(),
        }
    }
}

/// The result type every check, set-up, and tear-down returns.
/// 每个检查、准备和清理返回的结果类型。
pub type CheckResult = Result<(), Fault>;

/// Identity and documentation attached to a single test unit.
/// The combination is fixed at construction and overridable afterwards.
///
/// 附加到单个测试单元的标识和文档。
/// 组合在构造时固定，之后可被覆盖。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseMeta {
    id: String,
    description: String,
    explanation: String,
}

impl CaseMeta {
    /// Derives the metadata for a fixture-bound check.
    ///
    /// The id is `"<fixture>.<check>"`. The one-line descriptions of the
    /// fixture and the check are joined with `", "` only when both are
    /// non-empty; the long-form explanations are combined into a two-part
    /// block when both are present. Callers parse these strings, so the
    /// format is a stable contract.
    ///
    /// 为夹具绑定的检查派生元数据。id 为 `"<fixture>.<check>"`。
    /// 仅当两者都非空时，夹具和检查的单行描述才用 `", "` 连接；
    /// 当两者都存在时，长格式解释合并为两部分块。
    /// 调用方会解析这些字符串，因此格式是稳定契约。
    pub fn derive(
        fixture_name: &str,
        check_name: &str,
        fixture_doc: &str,
        check_doc: &str,
    ) -> Self {
        let (fixture_description, fixture_explanation) = split_doc(fixture_doc);
        let (check_description, check_explanation) = split_doc(check_doc);

        let description = match (fixture_description.is_empty(), check_description.is_empty()) {
            (false, false) => format!("{fixture_description}, {check_description}"),
            (false, true) => fixture_description,
            _ => check_description,
        };

        let explanation = if fixture_explanation.is_empty() {
            check_explanation
        } else {
            [
                "Fixture Explanation:",
                "--------------------",
                &fixture_explanation,
                "",
                "Test Explanation:",
                "-----------------",
                &check_explanation,
            ]
            .join("\n")
        };

        CaseMeta {
            id: format!("{fixture_name}.{check_name}"),
            description,
            explanation,
        }
    }

    /// Derives the metadata for a free-standing check: the id is the
    /// callable's own name and the documentation is its own doc text.
    ///
    /// 为独立检查派生元数据：id 是可调用对象自己的名称，
    /// 文档是其自己的文档文本。
    pub fn for_function(name: &str, doc: &str) -> Self {
        let (description, explanation) = split_doc(doc);
        CaseMeta {
            id: name.to_string(),
            description,
            explanation,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// One-line description of the unit, possibly empty.
    /// 单元的单行描述，可能为空。
    pub fn describe(&self) -> &str {
        &self.description
    }

    /// Long-form explanation rendered on demand by the reporter.
    /// 由报告器按需渲染的长格式解释。
    pub fn explain(&self) -> &str {
        &self.explanation
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_explanation(&mut self, explanation: impl Into<String>) {
        self.explanation = explanation.into();
    }
}

/// Splits doc text into its first line (the description) and the remaining
/// lines (the explanation), each trimmed.
fn split_doc(doc: &str) -> (String, String) {
    let mut lines = doc.lines();
    let description = lines.next().unwrap_or("").trim().to_string();
    let explanation = lines
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    (description, explanation)
}

/// The capability shared by everything the engine can execute: a single
/// unit or a whole suite. Running records outcomes against the collector
/// and never fails out of the traversal itself.
///
/// 引擎可以执行的一切共享的能力：单个单元或整个套件。
/// 运行会将结果记录到收集器，遍历本身绝不失败。
pub trait Runnable {
    fn run(&mut self, collector: &mut dyn Collector);

    /// Number of atomic units reachable from this runnable, recomputed on
    /// every call so post-construction mutation is reflected.
    fn count_test_cases(&self) -> usize;
}

/// A type-erased test unit: runnable, with metadata and a discriminator
/// name used for suite indexing.
///
/// 类型擦除的测试单元：可运行，带有元数据和用于套件索引的判别名称。
pub trait TestCase: Runnable {
    fn meta(&self) -> &CaseMeta;

    fn meta_mut(&mut self) -> &mut CaseMeta;

    /// The check's own name, without the fixture prefix.
    fn check_name(&self) -> &str;

    /// Runs the unit without a collector, propagating the first fault.
    /// 在没有收集器的情况下运行单元，传播第一个故障。
    fn debug(&mut self) -> CheckResult;
}

/// Lifecycle hooks shared by the case variants; `drive` owns the dispatch
/// order so both variants honor the same contract.
trait CaseHooks {
    fn meta(&self) -> &CaseMeta;
    fn set_up(&mut self) -> CheckResult;
    fn check(&mut self) -> CheckResult;
    fn tear_down(&mut self) -> CheckResult;
}

/// Executes one unit against the collector.
///
/// `set_up` faults record an error and skip both the check and `tear_down`.
/// A check fault is classified by its variant; `tear_down` always runs after
/// the check and any fault from it forces the outcome to an error. The
/// collector is told the unit stopped on every exit path.
fn drive<C: CaseHooks>(case: &mut C, collector: &mut dyn Collector) {
    let meta = case.meta().clone();
    collector.start_test(&meta);

    if let Err(fault) = case.set_up() {
        record_error(collector, &meta, fault);
        collector.stop_test(&meta);
        return;
    }

    let mut ok = true;
    if let Err(fault) = case.check() {
        ok = false;
        match fault {
            Fault::Failure { .. } => collector.add_failure(&meta, fault),
            _ => record_error(collector, &meta, fault),
        }
    }

    // Runs regardless of the check's outcome; a fault here downgrades an
    // otherwise-successful unit.
    if let Err(fault) = case.tear_down() {
        ok = false;
        record_error(collector, &meta, fault);
    }

    if ok {
        collector.add_success(&meta);
    }
    collector.stop_test(&meta);
}

/// Records a fault as an error; an interrupt also requests a stop.
fn record_error(collector: &mut dyn Collector, meta: &CaseMeta, fault: Fault) {
    let interrupted = fault.is_interrupt();
    collector.add_error(meta, fault);
    if interrupted {
        collector.stop();
    }
}

/// One named check declared by a fixture.
///
/// 夹具声明的一个命名检查。
pub struct Check<F> {
    name: &'static str,
    doc: &'static str,
    body: Box<dyn Fn(&mut F) -> CheckResult>,
}

impl<F: 'static> Check<F> {
    pub fn new(name: &'static str, body: fn(&mut F) -> CheckResult) -> Self {
        Check {
            name,
            doc: "",
            body: Box::new(body),
        }
    }

    pub fn with_doc(name: &'static str, doc: &'static str, body: fn(&mut F) -> CheckResult) -> Self {
        Check {
            name,
            doc,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    /// Rebinds this check to an embedding fixture through a projection,
    /// the composition mechanism behind inherited checks: an embedding
    /// fixture appends `Base::checks()` mapped through `embed`, and the
    /// loader's first-occurrence-wins rule makes redeclared names override
    /// the embedded ones.
    ///
    /// 通过投影将此检查重新绑定到嵌入夹具，这是继承检查背后的组合机制：
    /// 嵌入夹具追加通过 `embed` 映射的 `Base::checks()`，
    /// 加载器的首次出现优先规则使重新声明的名称覆盖嵌入的名称。
    pub fn embed<G: 'static>(self, project: fn(&mut G) -> &mut F) -> Check<G>
    where
        F: 'static,
    {
        let body = self.body;
        Check {
            name: self.name,
            doc: self.doc,
            body: Box::new(move |g| body(project(g))),
        }
    }
}

/// A fixture groups related checks and their shared set-up/tear-down.
/// Every unit built from a fixture binds a fresh instance, so checks never
/// observe each other's state.
///
/// 夹具将相关检查及其共享的准备/清理分组。
/// 从夹具构建的每个单元都绑定一个全新实例，因此检查绝不会观察到彼此的状态。
pub trait Fixture: Default + 'static {
    /// The simple name used as the leading segment of every unit id.
    fn fixture_name() -> &'static str;

    /// Doc text for the fixture: first line is the description, the rest
    /// the explanation.
    fn doc() -> &'static str {
        ""
    }

    fn set_up(&mut self) -> CheckResult {
        Ok(())
    }

    fn tear_down(&mut self) -> CheckResult {
        Ok(())
    }

    /// The fixture's declared checks, own checks first. Append embedded
    /// base-fixture checks last; the loader deduplicates by name with the
    /// first occurrence winning.
    fn checks() -> Vec<Check<Self>>
    where
        Self: Sized;
}

/// A test unit binding one fixture check to the execution contract.
///
/// 将一个夹具检查绑定到执行契约的测试单元。
pub struct MethodCase<F: Fixture> {
    fixture: F,
    check: Box<dyn Fn(&mut F) -> CheckResult>,
    check_name: String,
    meta: CaseMeta,
}

impl<F: Fixture> MethodCase<F> {
    /// Binds the check to a fresh fixture instance and derives the unit's
    /// metadata from the fixture and check doc text.
    pub fn new(check: Check<F>) -> Self {
        let meta = CaseMeta::derive(F::fixture_name(), check.name, F::doc(), check.doc);
        MethodCase {
            fixture: F::default(),
            check: check.body,
            check_name: check.name.to_string(),
            meta,
        }
    }
}

impl<F: Fixture> CaseHooks for MethodCase<F> {
    fn meta(&self) -> &CaseMeta {
        &self.meta
    }

    fn set_up(&mut self) -> CheckResult {
        self.fixture.set_up()
    }

    fn check(&mut self) -> CheckResult {
        (self.check)(&mut self.fixture)
    }

    fn tear_down(&mut self) -> CheckResult {
        self.fixture.tear_down()
    }
}

impl<F: Fixture> Runnable for MethodCase<F> {
    fn run(&mut self, collector: &mut dyn Collector) {
        drive(self, collector);
    }

    fn count_test_cases(&self) -> usize {
        1
    }
}

impl<F: Fixture> TestCase for MethodCase<F> {
    fn meta(&self) -> &CaseMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut CaseMeta {
        &mut self.meta
    }

    fn check_name(&self) -> &str {
        &self.check_name
    }

    fn debug(&mut self) -> CheckResult {
        self.fixture.set_up()?;
        (self.check)(&mut self.fixture)?;
        self.fixture.tear_down()
    }
}

/// Adapts a zero-argument closure, plus optional set-up and tear-down
/// closures, into the same execution contract as a fixture-bound unit.
///
/// 将零参数闭包加上可选的准备和清理闭包，
/// 适配为与夹具绑定单元相同的执行契约。
pub struct FunctionCase {
    set_up: Option<Box<dyn FnMut() -> CheckResult>>,
    tear_down: Option<Box<dyn FnMut() -> CheckResult>>,
    check: Box<dyn FnMut() -> CheckResult>,
    check_name: String,
    meta: CaseMeta,
}

impl FunctionCase {
    pub fn new(name: &str, check: impl FnMut() -> CheckResult + 'static) -> Self {
        Self::with_doc(name, "", check)
    }

    pub fn with_doc(name: &str, doc: &str, check: impl FnMut() -> CheckResult + 'static) -> Self {
        FunctionCase {
            set_up: None,
            tear_down: None,
            check: Box::new(check),
            check_name: name.to_string(),
            meta: CaseMeta::for_function(name, doc),
        }
    }

    pub fn set_up(mut self, set_up: impl FnMut() -> CheckResult + 'static) -> Self {
        self.set_up = Some(Box::new(set_up));
        self
    }

    pub fn tear_down(mut self, tear_down: impl FnMut() -> CheckResult + 'static) -> Self {
        self.tear_down = Some(Box::new(tear_down));
        self
    }
}

impl CaseHooks for FunctionCase {
    fn meta(&self) -> &CaseMeta {
        &self.meta
    }

    fn set_up(&mut self) -> CheckResult {
        match self.set_up.as_mut() {
            Some(set_up) => set_up(),
            None => Ok(()),
        }
    }

    fn check(&mut self) -> CheckResult {
        (self.check)()
    }

    fn tear_down(&mut self) -> CheckResult {
        match self.tear_down.as_mut() {
            Some(tear_down) => tear_down(),
            None => Ok(()),
        }
    }
}

impl Runnable for FunctionCase {
    fn run(&mut self, collector: &mut dyn Collector) {
        drive(self, collector);
    }

    fn count_test_cases(&self) -> usize {
        1
    }
}

impl TestCase for FunctionCase {
    fn meta(&self) -> &CaseMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut CaseMeta {
        &mut self.meta
    }

    fn check_name(&self) -> &str {
        &self.check_name
    }

    fn debug(&mut self) -> CheckResult {
        CaseHooks::set_up(self)?;
        (self.check)()?;
        CaseHooks::tear_down(self)
    }
}

// ---------------------------------------------------------------------------
// Assertion helpers. All of them report through `Fault::Failure` with a
// diagnostic message; they are building blocks, not separate states. The
// default mismatch messages are parsed by report consumers, keep them stable.
//
// 断言辅助函数。它们都通过带有诊断消息的 `Fault::Failure` 报告；
// 它们是构建块，而不是单独的状态。默认不匹配消息会被报告消费者解析，
// 保持稳定。
// ---------------------------------------------------------------------------

/// Fails immediately with the given message.
pub fn fail(message: &str) -> CheckResult {
    Err(Fault::failure(message))
}

/// Fails if the expression is true.
pub fn fail_if(expr: bool, message: &str) -> CheckResult {
    if expr { fail(message) } else { Ok(()) }
}

/// Fails unless the expression is true.
pub fn fail_unless(expr: bool, message: &str) -> CheckResult {
    if expr { Ok(()) } else { fail(message) }
}

/// Fails if the two values are unequal.
pub fn fail_unless_eq<T>(first: T, second: T, message: Option<&str>) -> CheckResult
where
    T: PartialEq + fmt::Display,
{
    if first != second {
        match message {
            Some(message) => fail(message),
            None => Err(Fault::failure(format!("{first} != {second}"))),
        }
    } else {
        Ok(())
    }
}

/// Fails if the two values are equal.
pub fn fail_if_eq<T>(first: T, second: T, message: Option<&str>) -> CheckResult
where
    T: PartialEq + fmt::Display,
{
    if first == second {
        match message {
            Some(message) => fail(message),
            None => Err(Fault::failure(format!("{first} == {second}"))),
        }
    } else {
        Ok(())
    }
}

/// Fails if the difference between the two values, rounded to the given
/// number of decimal places, is not zero. Decimal places (from zero) is not
/// the same as significant digits.
pub fn fail_unless_almost_eq(
    first: f64,
    second: f64,
    places: i32,
    message: Option<&str>,
) -> CheckResult {
    if rounded_difference(first, second, places) != 0.0 {
        match message {
            Some(message) => fail(message),
            None => Err(Fault::failure(format!(
                "{first:?} != {second:?} within {places} places"
            ))),
        }
    } else {
        Ok(())
    }
}

/// Fails if the difference between the two values, rounded to the given
/// number of decimal places, is zero.
pub fn fail_if_almost_eq(
    first: f64,
    second: f64,
    places: i32,
    message: Option<&str>,
) -> CheckResult {
    if rounded_difference(first, second, places) == 0.0 {
        match message {
            Some(message) => fail(message),
            None => Err(Fault::failure(format!(
                "{first:?} == {second:?} within {places} places"
            ))),
        }
    } else {
        Ok(())
    }
}

fn rounded_difference(first: f64, second: f64, places: i32) -> f64 {
    ((second - first) * 10f64.powi(places)).round()
}

/// Fails unless the operation reports an error. `expected` names the error
/// the caller was waiting for and becomes the failure message when the
/// operation unexpectedly succeeds.
pub fn fail_unless_raises<T, E>(expected: &str, op: impl FnOnce() -> Result<T, E>) -> CheckResult {
    match op() {
        Err(_) => Ok(()),
        Ok(_) => fail(expected),
    }
}
