//! # dotlint Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotlint library. Import this module to get quick access to everything needed to
//! assemble a module and run rules over it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotlint operations
pub use crate::Error;

/// The result type used throughout dotlint
pub use crate::Result;

// ================================================================================================
// Metadata Graph
// ================================================================================================

/// Modules and the runtime they target
pub use crate::metadata::{Module, ModuleBuilder, TargetRuntime};

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Type system components
pub use crate::metadata::typesystem::{
    CilType, CilTypeRc, CilTypeReference, Field, Method, TypeBuilder, TypeRegistry,
};

/// Flag definitions of types and members
pub use crate::metadata::attributes::{FieldAttributes, MethodModifiers, TypeAttributes};

// ================================================================================================
// Rules
// ================================================================================================

/// Rule interface and results
pub use crate::rules::{Rule, RuleResult, TypeRule};

/// Evaluation and reporting
pub use crate::rules::{RuleContext, RunSummary, Runner, RunnerConfig};

/// Findings
pub use crate::rules::{Confidence, Defect, Defects, Severity};

/// Design rules
pub use crate::rules::design::{classify, Classification, ConsiderUsingStaticTypeRule};
