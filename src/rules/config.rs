//! Runner configuration
//!
//! Controls which defects a run keeps and how rules are evaluated. Rules themselves carry no
//! configuration; everything tunable about a run lives here.

use crate::rules::defects::{Confidence, Severity};

/// Configuration of a [`crate::rules::Runner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Defects below this severity are dropped and do not fail the check that reported them
    pub min_severity: Severity,

    /// Defects below this confidence are dropped and do not fail the check that reported them
    pub min_confidence: Confidence,

    /// Stop recording defects once this many have been kept (None: unlimited)
    pub defects_limit: Option<usize>,

    /// Evaluate the types of a module in parallel (rayon)
    pub parallel: bool,

    /// Do not invoke rules that deactivated themselves for the current module.
    /// When false, inactive rules are still called and answer `DoesNotApply`.
    pub skip_inactive_rules: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Audit,
            min_confidence: Confidence::Low,
            defects_limit: None,
            parallel: true,
            skip_inactive_rules: true,
        }
    }
}

impl RunnerConfig {
    /// Keep only findings that are at least of medium severity and highly confident
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            min_severity: Severity::Medium,
            min_confidence: Confidence::High,
            ..Self::default()
        }
    }

    /// Keep every finding and evaluate every rule on every type, sequentially and in
    /// declaration order
    #[must_use]
    pub fn strict() -> Self {
        Self {
            min_severity: Severity::Audit,
            min_confidence: Confidence::Low,
            defects_limit: None,
            parallel: false,
            skip_inactive_rules: false,
        }
    }

    /// Set the defect limit
    #[must_use]
    pub fn with_defects_limit(mut self, limit: usize) -> Self {
        self.defects_limit = Some(limit);
        self
    }

    /// Returns true if a defect of the given severity and confidence is kept
    #[must_use]
    pub fn accepts(&self, severity: Severity, confidence: Confidence) -> bool {
        severity >= self.min_severity && confidence >= self.min_confidence
    }
}
