//! Design rules over the metadata graph.
//!
//! A rule inspects one type at a time and answers with a [`RuleResult`]. Findings are not
//! returned but reported through the [`RuleContext`] handed to every check, which records
//! them as [`Defect`]s for the whole run and tracks whether the current check failed.
//!
//! # Lifecycle
//!
//! Evaluation is a two-phase protocol driven by the [`Runner`] (or any other host):
//! 1. [`Rule::on_module_start`] is called once per module with its [`TargetRuntime`]; the
//!    rule decides whether it is active for that module
//! 2. [`TypeRule::check_type`] is called once per type of the module, in any order and
//!    possibly from several threads
//!
//! # Key Components
//!
//! - [`Rule`] / [`TypeRule`] - Rule interface
//! - [`Runner`] / [`RuleContext`] / [`RunSummary`] - Evaluation and reporting
//! - [`Defects`] / [`Defect`] / [`Severity`] / [`Confidence`] - Findings
//! - [`RunnerConfig`] - Run configuration
//! - [`design`] - Rules about type design
//!
//! # Examples
//!
//! ```rust
//! use dotlint::{
//!     metadata::{typesystem::{Method, TypeBuilder}, ModuleBuilder, TargetRuntime},
//!     rules::{design::ConsiderUsingStaticTypeRule, Runner, RunnerConfig},
//! };
//!
//! let mut builder = ModuleBuilder::new("Acme.dll", TargetRuntime::Net4_0);
//! builder.define(
//!     TypeBuilder::class("Acme", "Utils")
//!         .extends_object()
//!         .method(Method::static_method("Log", 1)),
//! )?;
//! let module = builder.build();
//!
//! let mut runner = Runner::new(RunnerConfig::default())
//!     .with_rule(ConsiderUsingStaticTypeRule::new());
//! let summary = runner.analyze(&module);
//!
//! assert_eq!(summary.failure, 1);
//! assert_eq!(runner.defects().count(), 1);
//! # Ok::<(), dotlint::Error>(())
//! ```

mod config;
mod defects;
pub mod design;
mod runner;

pub use config::RunnerConfig;
pub use defects::{Confidence, Defect, Defects, Severity};
pub use runner::{RuleContext, RunSummary, Runner};

use strum::Display;

use crate::metadata::{typesystem::CilTypeRc, TargetRuntime};

/// Outcome of evaluating one rule against one type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RuleResult {
    /// The rule has nothing to say about this kind of type
    DoesNotApply,
    /// The rule applied and found nothing
    Success,
    /// The rule reported at least one defect
    Failure,
}

/// Common interface of all rules
pub trait Rule: Send + Sync {
    /// Unique rule name, used to attribute defects
    fn name(&self) -> &'static str;

    /// What is wrong with a type the rule reports
    fn problem(&self) -> &'static str;

    /// How to fix a type the rule reports
    fn solution(&self) -> &'static str;

    /// Returns true if the rule is active for the current module
    fn is_active(&self) -> bool;

    /// Called once per module before any of its types is checked
    fn on_module_start(&mut self, runtime: TargetRuntime);
}

/// A rule evaluated once per type
pub trait TypeRule: Rule {
    /// Check a single type, reporting defects through `context`
    fn check_type(&self, cil_type: &CilTypeRc, context: &RuleContext<'_>) -> RuleResult;
}
