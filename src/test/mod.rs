use strum::IntoEnumIterator;

use crate::{
    metadata::{
        token::Token,
        typesystem::{CilTypeRc, CilTypeReference, TypeBuilder},
        Module, ModuleBuilder, TargetRuntime,
    },
    rules::{Confidence, Rule, RuleContext, RuleResult, Severity, TypeRule},
};

// Split all runtimes into those without and those with static type support
pub fn legacy_and_modern() -> (Vec<TargetRuntime>, Vec<TargetRuntime>) {
    TargetRuntime::iter().partition(|runtime| !runtime.supports_static_types())
}

// Rule reporting every type it sees, used to exercise the runner
pub struct ReportEverythingRule {
    severity: Severity,
    confidence: Confidence,
    modern_only: bool,
    active: bool,
}

impl ReportEverythingRule {
    pub fn new(severity: Severity, confidence: Confidence) -> Self {
        ReportEverythingRule {
            severity,
            confidence,
            modern_only: false,
            active: true,
        }
    }

    pub fn modern_only() -> Self {
        ReportEverythingRule {
            modern_only: true,
            ..Self::new(Severity::Medium, Confidence::High)
        }
    }
}

impl Rule for ReportEverythingRule {
    fn name(&self) -> &'static str {
        "ReportEverythingRule"
    }

    fn problem(&self) -> &'static str {
        "Every type is a problem."
    }

    fn solution(&self) -> &'static str {
        "None."
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_module_start(&mut self, runtime: TargetRuntime) {
        self.active = !self.modern_only || runtime.supports_static_types();
    }
}

impl TypeRule for ReportEverythingRule {
    fn check_type(&self, cil_type: &CilTypeRc, context: &RuleContext<'_>) -> RuleResult {
        if !self.active {
            return RuleResult::DoesNotApply;
        }

        context.report(cil_type, self.severity, self.confidence);
        context.current_result()
    }
}

// Build a module from type builders, returning the module and the type tokens in order
pub fn build_module(
    runtime: TargetRuntime,
    types: impl IntoIterator<Item = TypeBuilder>,
) -> (Module, Vec<Token>) {
    let mut builder = ModuleBuilder::new("Test.dll", runtime);
    let tokens = types
        .into_iter()
        .map(|ty| builder.define(ty).unwrap().token)
        .collect();
    (builder.build(), tokens)
}

// Reference to a type of the test module that is defined with an explicit token
pub fn local_ref(row: u32, name: &str) -> CilTypeReference {
    CilTypeReference::typedef(Token::typedef(row), "Acme", name)
}

// Get a type of the module by row
pub fn get_type(module: &Module, row: u32) -> CilTypeRc {
    module.types().get(&Token::typedef(row)).unwrap()
}
