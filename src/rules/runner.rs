//! Rule evaluation over a module.
//!
//! The [`Runner`] is the minimal host for [`TypeRule`]s: it activates every rule for the
//! module at hand, feeds it each type, filters and records the defects the rules report and
//! tallies the results into a [`RunSummary`].
//!
//! # Parallel Processing
//!
//! Types are independent of each other, so with [`RunnerConfig::parallel`] set they are
//! evaluated with [`rayon`] parallel iterators. Rules only read the metadata graph; the one
//! shared mutable resource, the [`Defects`] collection, is append-only and lock-free.

use std::{cell::Cell, fmt};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    metadata::{
        typesystem::{CilType, CilTypeRc, TypeRegistry},
        Module,
    },
    rules::{
        config::RunnerConfig,
        defects::{Confidence, Defect, Defects, Severity},
        Rule, RuleResult, TypeRule,
    },
};

/// Reporting handle for a single (rule, type) check.
///
/// Besides recording defects, the context remembers whether the current check reported
/// anything, which is what [`RuleContext::current_result`] answers.
pub struct RuleContext<'a> {
    module: &'a Module,
    rule: &'static str,
    problem: &'static str,
    defects: &'a Defects,
    config: &'a RunnerConfig,
    reported: Cell<usize>,
}

impl<'a> RuleContext<'a> {
    /// Module the checked type belongs to
    pub fn module(&self) -> &'a Module {
        self.module
    }

    /// Registry of the module, used to resolve type references
    pub fn types(&self) -> &'a TypeRegistry {
        self.module.types()
    }

    /// Report a defect against `target`.
    ///
    /// Returns true if the defect was kept. Defects below the configured severity or
    /// confidence, or beyond the defect limit, are dropped and do not fail the check.
    pub fn report(&self, target: &CilType, severity: Severity, confidence: Confidence) -> bool {
        if !self.config.accepts(severity, confidence) {
            trace!(
                rule = self.rule,
                target = %target.fullname(),
                %severity,
                %confidence,
                "defect filtered"
            );
            return false;
        }

        let defect = Defect {
            rule: self.rule,
            token: target.token,
            target: target.fullname(),
            severity,
            confidence,
            problem: self.problem,
        };

        if !self.defects.try_push(defect, self.config.defects_limit) {
            trace!(rule = self.rule, target = %target.fullname(), "defect limit reached");
            return false;
        }

        self.reported.set(self.reported.get() + 1);
        true
    }

    /// Number of defects kept during this check
    pub fn reported(&self) -> usize {
        self.reported.get()
    }

    /// Result of the check so far: `Failure` once a defect was kept, `Success` otherwise
    pub fn current_result(&self) -> RuleResult {
        if self.reported.get() > 0 {
            RuleResult::Failure
        } else {
            RuleResult::Success
        }
    }
}

/// Aggregated outcome of analyzing one module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Name of the analyzed module
    pub module: String,
    /// Number of types in the module
    pub types: usize,
    /// Number of rules registered with the runner
    pub rules: usize,
    /// Number of rules skipped because they were inactive for the module
    pub inactive_rules: usize,
    /// Checks answered with `DoesNotApply`
    pub does_not_apply: usize,
    /// Checks answered with `Success`
    pub success: usize,
    /// Checks answered with `Failure`
    pub failure: usize,
    /// Defects kept while analyzing the module
    pub defects: usize,
}

impl RunSummary {
    fn record(&mut self, result: RuleResult) {
        match result {
            RuleResult::DoesNotApply => self.does_not_apply += 1,
            RuleResult::Success => self.success += 1,
            RuleResult::Failure => self.failure += 1,
        }
    }

    /// Total number of (rule, type) checks performed
    pub fn checks(&self) -> usize {
        self.does_not_apply + self.success + self.failure
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} type(s), {} rule(s) ({} inactive) - {} failure(s), {} success(es), {} not applicable, {} defect(s)",
            self.module,
            self.types,
            self.rules,
            self.inactive_rules,
            self.failure,
            self.success,
            self.does_not_apply,
            self.defects
        )
    }
}

/// Evaluates type rules over modules and collects their defects.
///
/// Defects accumulate across [`Runner::analyze`] calls, so a single runner can be used for
/// all modules of an application.
pub struct Runner {
    config: RunnerConfig,
    rules: Vec<Box<dyn TypeRule>>,
    defects: Defects,
}

impl Runner {
    /// Create a runner without rules
    pub fn new(config: RunnerConfig) -> Self {
        Runner {
            config,
            rules: Vec::new(),
            defects: Defects::new(),
        }
    }

    /// Register a rule
    #[must_use]
    pub fn with_rule(mut self, rule: impl TypeRule + 'static) -> Self {
        self.add_rule(Box::new(rule));
        self
    }

    /// Register a boxed rule
    pub fn add_rule(&mut self, rule: Box<dyn TypeRule>) {
        self.rules.push(rule);
    }

    /// Registered rules, in registration order
    pub fn rules(&self) -> impl Iterator<Item = &dyn TypeRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Configuration of the runner
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Defects recorded so far
    pub fn defects(&self) -> &Defects {
        &self.defects
    }

    /// Activate every rule for `module`.
    ///
    /// This is the first phase of the evaluation protocol; [`Runner::analyze`] calls it
    /// itself, hosts driving [`Runner::check_type`] directly call it once per module.
    pub fn start_module(&mut self, module: &Module) {
        let runtime = module.runtime();
        for rule in &mut self.rules {
            rule.on_module_start(runtime);
            debug!(
                rule = rule.name(),
                module = module.name(),
                %runtime,
                active = rule.is_active(),
                "rule activation"
            );
        }
    }

    /// Evaluate one rule against one type of `module`, recording its defects.
    ///
    /// The rule must have been activated for `module` through [`Runner::start_module`].
    pub fn check_type(
        &self,
        rule: &dyn TypeRule,
        cil_type: &CilTypeRc,
        module: &Module,
    ) -> RuleResult {
        let context = RuleContext {
            module,
            rule: rule.name(),
            problem: rule.problem(),
            defects: &self.defects,
            config: &self.config,
            reported: Cell::new(0),
        };

        rule.check_type(cil_type, &context)
    }

    /// Run every registered rule over every type of `module`
    pub fn analyze(&mut self, module: &Module) -> RunSummary {
        self.start_module(module);

        let types = module.all_types();
        let defects_before = self.defects.count();
        let mut summary = RunSummary {
            module: module.name().to_string(),
            types: types.len(),
            rules: self.rules.len(),
            ..RunSummary::default()
        };

        for rule in &self.rules {
            if !rule.is_active() && self.config.skip_inactive_rules {
                summary.inactive_rules += 1;
                continue;
            }

            let rule = rule.as_ref();
            let results: Vec<RuleResult> = if self.config.parallel {
                types
                    .par_iter()
                    .map(|cil_type| self.check_type(rule, cil_type, module))
                    .collect()
            } else {
                types
                    .iter()
                    .map(|cil_type| self.check_type(rule, cil_type, module))
                    .collect()
            };

            for result in results {
                summary.record(result);
            }
        }

        summary.defects = self.defects.count() - defects_before;
        debug!(summary = %summary, "module analyzed");

        summary
    }
}
