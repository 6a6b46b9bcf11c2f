//! Detection of types that should be declared `static`.
//!
//! A class whose members, and the members of every class it inherits from short of
//! `System.Object`, are all static can never usefully be instantiated. Declaring it as a
//! `static class` (abstract and sealed in metadata) states that intent and lets the
//! compiler reject accidental instance members or instantiation. Static classes exist since
//! .NET 2.0, so the rule stays silent for modules targeting older runtimes.
//!
//! # Classification
//!
//! [`classify`] walks the inheritance chain iteratively, from the type towards the root:
//! 1. An instance constructor with more than [`MAX_TOLERATED_CTOR_PARAMS`] parameters
//!    disqualifies the type. Smaller instance constructors are ignored, since 1.x compilers
//!    emit a default constructor even for classes that only hold static members.
//! 2. Any instance method disqualifies the type.
//! 3. Any instance field disqualifies the type.
//! 4. A base of `System.Object` ends the walk successfully, any other base is resolved and
//!    checked the same way.
//!
//! A base that cannot be resolved, a missing base, or a chain that loops back on itself
//! makes the type unclassifiable, which never results in a defect.
//!
//! # Examples
//!
//! ```rust
//! use dotlint::{
//!     metadata::{typesystem::{Method, TypeBuilder}, ModuleBuilder, TargetRuntime},
//!     rules::design::{classify, Classification},
//! };
//!
//! let mut builder = ModuleBuilder::new("Acme.dll", TargetRuntime::Net4_0);
//! builder.define(
//!     TypeBuilder::class("Acme", "Utils")
//!         .extends_object()
//!         .method(Method::constructor(0))
//!         .method(Method::static_method("Log", 1)),
//! )?;
//! let module = builder.build();
//!
//! let utils = module.types().get_by_fullname("Acme.Utils").unwrap();
//! assert_eq!(classify(&utils, module.types()), Classification::AllStatic);
//! # Ok::<(), dotlint::Error>(())
//! ```

use std::{collections::HashSet, sync::Arc};

use tracing::debug;

use crate::{
    metadata::{
        token::Token,
        typesystem::{CilType, CilTypeRc, CilTypeReference, TypeRegistry},
        TargetRuntime,
    },
    rules::{Confidence, Rule, RuleContext, RuleResult, Severity, TypeRule},
};

/// Largest parameter count of an instance constructor that does not disqualify a type.
///
/// Compilers for .NET 1.x always emit a default instance constructor, and some emit a
/// single-argument one for serialization. This threshold is specific to that compiler
/// output and is not meant to be extended to other member shapes.
pub const MAX_TOLERATED_CTOR_PARAMS: u32 = 1;

/// The kind of member that disqualified a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceMemberKind {
    /// Instance constructor with more than [`MAX_TOLERATED_CTOR_PARAMS`] parameters
    Constructor,
    /// Instance method
    Method,
    /// Instance field
    Field,
}

/// Why a type could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unclassifiable {
    /// A type of the chain has no base type although it is not the root
    NoBaseType(Token),
    /// A base type reference could not be resolved to a definition
    UnresolvedBase(CilTypeReference),
    /// The chain reaches the given type a second time
    Cycle(Token),
}

/// Outcome of classifying a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Every member of the type and of its bases (short of the root) is static
    AllStatic,
    /// A member of the type or one of its bases is an instance member
    HasInstanceMembers {
        /// Type of the chain declaring the member
        declaring_type: Token,
        /// Token of the member
        member: Token,
        /// Kind of the member
        kind: InstanceMemberKind,
    },
    /// The chain could not be walked to the root
    Unclassifiable(Unclassifiable),
}

fn first_instance_member(cil_type: &CilType) -> Option<(Token, InstanceMemberKind)> {
    if let Some(ctor) = cil_type
        .constructors()
        .find(|ctor| !ctor.is_static() && ctor.param_count > MAX_TOLERATED_CTOR_PARAMS)
    {
        return Some((ctor.token, InstanceMemberKind::Constructor));
    }

    if let Some(method) = cil_type.methods().find(|method| !method.is_static()) {
        return Some((method.token, InstanceMemberKind::Method));
    }

    cil_type
        .fields()
        .iter()
        .find(|field| !field.is_static())
        .map(|field| (field.token, InstanceMemberKind::Field))
}

/// Classify `cil_type` by walking its inheritance chain through `types`.
///
/// Never recurses and never loops: every type of the chain is visited at most once, tracked
/// by its token within the registry owning it. Bases living in a referenced module are
/// resolved there, and so is the rest of the chain above them.
pub fn classify(cil_type: &CilType, types: &TypeRegistry) -> Classification {
    let mut visited: HashSet<(*const TypeRegistry, Token)> = HashSet::new();
    let mut resolved: Option<CilTypeRc> = None;
    let mut owner: Option<Arc<TypeRegistry>> = None;

    loop {
        let registry = owner.as_deref().unwrap_or(types);
        let current = resolved.as_deref().unwrap_or(cil_type);

        if !visited.insert((registry as *const TypeRegistry, current.token)) {
            return Classification::Unclassifiable(Unclassifiable::Cycle(current.token));
        }

        if let Some((member, kind)) = first_instance_member(current) {
            return Classification::HasInstanceMembers {
                declaring_type: current.token,
                member,
                kind,
            };
        }

        let Some(base) = current.base() else {
            return Classification::Unclassifiable(Unclassifiable::NoBaseType(current.token));
        };

        if base.is_root() {
            return Classification::AllStatic;
        }

        let Some((next, next_owner)) = registry.resolve_with_owner(base) else {
            return Classification::Unclassifiable(Unclassifiable::UnresolvedBase(base.clone()));
        };
        resolved = Some(next);
        if next_owner.is_some() {
            owner = next_owner;
        }
    }
}

/// Returns true if `cil_type` and its bases only declare static members
pub fn is_all_static(cil_type: &CilType, types: &TypeRegistry) -> bool {
    classify(cil_type, types) == Classification::AllStatic
}

/// Reports classes that only hold static members but are not declared `static`.
///
/// Reported defects are of [`Severity::Medium`] (the fix is about clarity) with
/// [`Confidence::High`] (the check is exhaustive over the visible hierarchy).
pub struct ConsiderUsingStaticTypeRule {
    active: bool,
}

impl Default for ConsiderUsingStaticTypeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsiderUsingStaticTypeRule {
    /// Create the rule. It stays inactive until a module targeting .NET 2.0 or later starts.
    #[must_use]
    pub fn new() -> Self {
        ConsiderUsingStaticTypeRule { active: false }
    }

    fn does_not_apply(cil_type: &CilType, types: &TypeRegistry) -> bool {
        cil_type.is_enum()
            || cil_type.is_interface()
            || cil_type.is_value_type()
            || cil_type.is_delegate()
            || types.is_compiler_generated(cil_type)
    }
}

impl Rule for ConsiderUsingStaticTypeRule {
    fn name(&self) -> &'static str {
        "ConsiderUsingStaticTypeRule"
    }

    fn problem(&self) -> &'static str {
        "This type only contains static fields and methods and should be declared static."
    }

    fn solution(&self) -> &'static str {
        "Declare the type as a static class to state its purpose and get compiler errors for instance members."
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn on_module_start(&mut self, runtime: TargetRuntime) {
        self.active = runtime.supports_static_types();
    }
}

impl TypeRule for ConsiderUsingStaticTypeRule {
    fn check_type(&self, cil_type: &CilTypeRc, context: &RuleContext<'_>) -> RuleResult {
        if !self.active {
            return RuleResult::DoesNotApply;
        }

        if Self::does_not_apply(cil_type, context.types()) {
            return RuleResult::DoesNotApply;
        }

        if cil_type.is_declared_static() {
            return RuleResult::Success;
        }

        match classify(cil_type, context.types()) {
            Classification::AllStatic => {
                context.report(cil_type, Severity::Medium, Confidence::High);
            }
            Classification::HasInstanceMembers { .. } => {}
            Classification::Unclassifiable(reason) => {
                debug!(
                    rule = self.name(),
                    target = %cil_type.fullname(),
                    reason = ?reason,
                    "type not classifiable"
                );
            }
        }

        context.current_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            typesystem::{wellknown, Field, Method, TypeBuilder},
            Module,
        },
        rules::{Runner, RunnerConfig},
        test::{build_module, get_type, legacy_and_modern, local_ref},
    };

    fn class(row: u32, name: &str) -> TypeBuilder {
        TypeBuilder::class("Acme", name).token(Token::typedef(row))
    }

    fn check(module: &Module, row: u32) -> (RuleResult, Runner) {
        let mut runner =
            Runner::new(RunnerConfig::strict()).with_rule(ConsiderUsingStaticTypeRule::new());
        runner.start_module(module);
        let cil_type = get_type(module, row);
        let result = {
            let rule = runner.rules().next().unwrap();
            runner.check_type(rule, &cil_type, module)
        };
        (result, runner)
    }

    #[test]
    fn test_classify_direct_root_child() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [class(1, "Utils")
                .extends_object()
                .method(Method::static_method("Log", 1))
                .field(Field::constant("Version"))],
        );
        let utils = get_type(&module, 1);
        assert_eq!(classify(&utils, module.types()), Classification::AllStatic);
        assert!(is_all_static(&utils, module.types()));
    }

    #[test]
    fn test_classify_empty_class_is_all_static() {
        let (module, _) = build_module(TargetRuntime::Net4_0, [class(1, "Empty").extends_object()]);
        assert!(is_all_static(&get_type(&module, 1), module.types()));
    }

    #[test]
    fn test_constructor_threshold() {
        for (params, expected) in [(0, true), (1, true), (2, false), (5, false)] {
            let (module, _) = build_module(
                TargetRuntime::Net4_0,
                [class(1, "Ctor")
                    .extends_object()
                    .method(Method::constructor(params))
                    .method(Method::static_method("Log", 1))],
            );
            assert_eq!(
                is_all_static(&get_type(&module, 1), module.types()),
                expected,
                "constructor with {params} parameters"
            );
        }
    }

    #[test]
    fn test_static_constructor_never_disqualifies() {
        let mut cctor = Method::static_constructor();
        cctor.param_count = 3;
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [class(1, "Init").extends_object().method(cctor)],
        );
        assert!(is_all_static(&get_type(&module, 1), module.types()));
    }

    #[test]
    fn test_instance_members_are_reported_with_kind() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                class(1, "WithCtor")
                    .extends_object()
                    .method(Method::constructor(2).with_token(Token::methoddef(1)))
                    .method(Method::instance_method("Run", 0).with_token(Token::methoddef(2))),
                class(2, "WithMethod")
                    .extends_object()
                    .method(Method::instance_method("Run", 0).with_token(Token::methoddef(3)))
                    .field(Field::instance_field("x").with_token(Token::field(1))),
                class(3, "WithField")
                    .extends_object()
                    .field(Field::static_field("a").with_token(Token::field(2)))
                    .field(Field::instance_field("b").with_token(Token::field(3))),
            ],
        );

        let expectations = [
            (1, Token::methoddef(1), InstanceMemberKind::Constructor),
            (2, Token::methoddef(3), InstanceMemberKind::Method),
            (3, Token::field(3), InstanceMemberKind::Field),
        ];
        for (row, member, kind) in expectations {
            assert_eq!(
                classify(&get_type(&module, row), module.types()),
                Classification::HasInstanceMembers {
                    declaring_type: Token::typedef(row),
                    member,
                    kind,
                }
            );
        }
    }

    #[test]
    fn test_chain_is_walked_to_the_root() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                class(1, "Root")
                    .extends_object()
                    .method(Method::static_method("A", 0)),
                class(2, "Middle")
                    .extends(local_ref(1, "Root"))
                    .method(Method::constructor(1))
                    .field(Field::static_field("b")),
                class(3, "Leaf")
                    .extends(local_ref(2, "Middle"))
                    .method(Method::static_method("C", 2)),
            ],
        );
        assert_eq!(
            classify(&get_type(&module, 3), module.types()),
            Classification::AllStatic
        );
    }

    #[test]
    fn test_instance_member_at_root_adjacent_end() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                class(1, "Root")
                    .extends_object()
                    .method(Method::instance_method("ToText", 0).with_token(Token::methoddef(9))),
                class(2, "Middle").extends(local_ref(1, "Root")),
                class(3, "Leaf")
                    .extends(local_ref(2, "Middle"))
                    .method(Method::static_method("C", 0)),
            ],
        );
        assert_eq!(
            classify(&get_type(&module, 3), module.types()),
            Classification::HasInstanceMembers {
                declaring_type: Token::typedef(1),
                member: Token::methoddef(9),
                kind: InstanceMemberKind::Method,
            }
        );
    }

    #[test]
    fn test_unresolved_base() {
        let external = CilTypeReference::typeref(Token::typeref(1), "Acme.Core", "Acme.Core", "Base");
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [class(1, "Derived").extends(external.clone())],
        );
        assert_eq!(
            classify(&get_type(&module, 1), module.types()),
            Classification::Unclassifiable(Unclassifiable::UnresolvedBase(external))
        );

        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [class(1, "Dangling").extends(local_ref(7, "Missing"))],
        );
        assert!(!is_all_static(&get_type(&module, 1), module.types()));
    }

    #[test]
    fn test_missing_base() {
        let (module, _) = build_module(TargetRuntime::Net4_0, [class(1, "Rootless")]);
        assert_eq!(
            classify(&get_type(&module, 1), module.types()),
            Classification::Unclassifiable(Unclassifiable::NoBaseType(Token::typedef(1)))
        );
    }

    #[test]
    fn test_cycles_terminate() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                class(1, "Ping").extends(local_ref(2, "Pong")),
                class(2, "Pong").extends(local_ref(1, "Ping")),
                class(3, "Narcissus").extends(local_ref(3, "Narcissus")),
                class(4, "Tail").extends(local_ref(1, "Ping")),
            ],
        );

        assert_eq!(
            classify(&get_type(&module, 1), module.types()),
            Classification::Unclassifiable(Unclassifiable::Cycle(Token::typedef(1)))
        );
        assert_eq!(
            classify(&get_type(&module, 3), module.types()),
            Classification::Unclassifiable(Unclassifiable::Cycle(Token::typedef(3)))
        );
        assert_eq!(
            classify(&get_type(&module, 4), module.types()),
            Classification::Unclassifiable(Unclassifiable::Cycle(Token::typedef(1)))
        );
    }

    #[test]
    fn test_rule_reports_candidate() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [class(1, "Utils")
                .extends_object()
                .method(Method::static_method("Log", 1))],
        );
        let (result, runner) = check(&module, 1);

        assert_eq!(result, RuleResult::Failure);
        let defects: Vec<_> = runner.defects().iter().collect();
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].rule, "ConsiderUsingStaticTypeRule");
        assert_eq!(defects[0].target, "Acme.Utils");
        assert_eq!(defects[0].token, Token::typedef(1));
        assert_eq!(defects[0].severity, Severity::Medium);
        assert_eq!(defects[0].confidence, Confidence::High);
    }

    #[test]
    fn test_rule_is_idempotent() {
        let (module, _) = build_module(
            TargetRuntime::Net2_0,
            [
                class(1, "Utils")
                    .extends_object()
                    .method(Method::static_method("Log", 1)),
                class(2, "Counter")
                    .extends_object()
                    .field(Field::instance_field("counter")),
            ],
        );
        let mut runner =
            Runner::new(RunnerConfig::strict()).with_rule(ConsiderUsingStaticTypeRule::new());
        runner.start_module(&module);

        let rule = runner.rules().next().unwrap();
        for _ in 0..3 {
            let utils = get_type(&module, 1);
            let counter = get_type(&module, 2);
            assert_eq!(runner.check_type(rule, &utils, &module), RuleResult::Failure);
            assert_eq!(runner.check_type(rule, &counter, &module), RuleResult::Success);
        }
        assert_eq!(runner.defects().for_target(Token::typedef(1)).len(), 3);
        assert!(runner.defects().for_target(Token::typedef(2)).is_empty());
    }

    #[test]
    fn test_rule_does_not_apply_to_excluded_categories() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                TypeBuilder::enumeration("Acme", "Color").field(Field::constant("Red")),
                TypeBuilder::interface("Acme", "IRunner"),
                TypeBuilder::value_type("Acme", "Point").method(Method::static_method("Zero", 0)),
                TypeBuilder::delegate("Acme", "Callback"),
                class(5, "Generated")
                    .extends_object()
                    .custom_attribute(wellknown::COMPILER_GENERATED_ATTRIBUTE),
                class(6, "<PrivateImplementationDetails>").extends_object(),
            ],
        );

        for row in 1..=6 {
            let (result, runner) = check(&module, row);
            assert_eq!(result, RuleResult::DoesNotApply, "row {row}");
            assert!(!runner.defects().has_any());
        }
    }

    #[test]
    fn test_rule_skips_declared_static() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                TypeBuilder::static_class("Acme", "Helpers").method(Method::static_method("Log", 1)),
                // declared static, even with members a compiler would reject
                TypeBuilder::static_class("Acme", "Odd").field(Field::instance_field("x")),
            ],
        );

        for row in 1..=2 {
            let (result, runner) = check(&module, row);
            assert_eq!(result, RuleResult::Success);
            assert!(!runner.defects().has_any());
        }
    }

    #[test]
    fn test_rule_passes_non_candidates() {
        let (module, _) = build_module(
            TargetRuntime::Net4_0,
            [
                class(1, "Counter")
                    .extends_object()
                    .field(Field::instance_field("counter")),
                class(2, "Cyclic").extends(local_ref(2, "Cyclic")),
            ],
        );

        for row in 1..=2 {
            let (result, runner) = check(&module, row);
            assert_eq!(result, RuleResult::Success);
            assert!(!runner.defects().has_any());
        }
    }

    #[test]
    fn test_rule_is_gated_by_runtime() {
        let (legacy, modern) = legacy_and_modern();

        for runtime in legacy {
            let mut rule = ConsiderUsingStaticTypeRule::new();
            rule.on_module_start(runtime);
            assert!(!rule.is_active(), "{runtime}");

            let (module, _) = build_module(runtime, [class(1, "Utils").extends_object()]);
            let (result, runner) = check(&module, 1);
            assert_eq!(result, RuleResult::DoesNotApply);
            assert!(!runner.defects().has_any());
        }

        for runtime in modern {
            let mut rule = ConsiderUsingStaticTypeRule::new();
            rule.on_module_start(runtime);
            assert!(rule.is_active(), "{runtime}");
        }
    }

    #[test]
    fn test_rule_is_inactive_until_a_module_starts() {
        assert!(!ConsiderUsingStaticTypeRule::new().is_active());
    }
}
