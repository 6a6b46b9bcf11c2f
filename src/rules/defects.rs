//! Defect collection for rule runs.
//!
//! This module provides the reporting channel rules emit their findings into. A [`Defect`]
//! names the rule, the offending type, and the [`Severity`] and [`Confidence`] the rule
//! assigned to it; [`Defects`] collects them for the whole run.
//!
//! # Thread Safety
//!
//! The [`Defects`] container uses `boxcar::Vec` for lock-free append operations, so rules
//! evaluated in parallel can report without any synchronization of their own. The optional
//! defect limit is enforced with an atomic reservation counter, which keeps the limit exact
//! under concurrent reporting.

use std::{
    fmt::{self, Write},
    sync::atomic::{AtomicUsize, Ordering},
};

use strum::{Display, EnumIter};

use crate::metadata::token::Token;

/// How much a defect matters, ordered from least to most important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Severity {
    /// Worth a manual review, not necessarily a problem
    Audit,
    /// Cosmetic or stylistic issue
    Low,
    /// Issue with a noticeable cost in clarity or maintainability
    Medium,
    /// Issue likely to cause bugs or misuse
    High,
    /// Issue that breaks correctness or security
    Critical,
}

/// How sure the rule is about a defect, ordered from least to most certain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Confidence {
    /// Heuristic finding with a fair chance of being a false positive
    Low,
    /// Likely correct
    Normal,
    /// Backed by an exhaustive check of the visible metadata
    High,
    /// Cannot be wrong
    Total,
}

/// A single finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defect {
    /// Name of the rule that reported the defect
    pub rule: &'static str,
    /// Token of the offending type
    pub token: Token,
    /// Full name of the offending type
    pub target: String,
    /// Severity assigned by the rule
    pub severity: Severity,
    /// Confidence assigned by the rule
    pub confidence: Confidence,
    /// Description of the problem, taken from the rule
    pub problem: &'static str,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}: {} ({}) - {}",
            self.severity, self.confidence, self.rule, self.target, self.token, self.problem
        )
    }
}

/// Thread-safe container for the defects of a run.
///
/// # Example
///
/// ```rust
/// use dotlint::{
///     metadata::token::Token,
///     rules::{Confidence, Defect, Defects, Severity},
/// };
///
/// let defects = Defects::new();
/// defects.push(Defect {
///     rule: "ExampleRule",
///     token: Token::typedef(1),
///     target: "Acme.Utils".to_string(),
///     severity: Severity::Medium,
///     confidence: Confidence::High,
///     problem: "Example problem.",
/// });
///
/// assert_eq!(defects.count(), 1);
/// assert_eq!(defects.for_target(Token::typedef(1)).len(), 1);
/// ```
#[derive(Debug)]
pub struct Defects {
    entries: boxcar::Vec<Defect>,
    reserved: AtomicUsize,
}

impl Default for Defects {
    fn default() -> Self {
        Self::new()
    }
}

impl Defects {
    /// Creates a new empty defect container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
            reserved: AtomicUsize::new(0),
        }
    }

    /// Adds a defect unconditionally.
    pub fn push(&self, defect: Defect) {
        self.reserved.fetch_add(1, Ordering::AcqRel);
        self.entries.push(defect);
    }

    /// Adds a defect unless `limit` defects have already been recorded.
    ///
    /// Returns true if the defect was recorded.
    pub fn try_push(&self, defect: Defect, limit: Option<usize>) -> bool {
        let Some(limit) = limit else {
            self.push(defect);
            return true;
        };

        let reserved = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < limit).then_some(count + 1)
            });

        if reserved.is_ok() {
            self.entries.push(defect);
            true
        } else {
            false
        }
    }

    /// Returns true if any defect has been recorded.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns the total number of defects.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns an iterator over all defects, in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Defect> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns the defects reported by the given rule.
    pub fn by_rule(&self, rule: &str) -> Vec<&Defect> {
        self.iter().filter(|d| d.rule == rule).collect()
    }

    /// Returns the defects reported against the given type.
    pub fn for_target(&self, token: Token) -> Vec<&Defect> {
        self.iter().filter(|d| d.token == token).collect()
    }

    /// Returns the number of defects at or above the given severity.
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.iter().filter(|d| d.severity >= severity).count()
    }

    /// Formats a summary of all defects, ordered by target token.
    pub fn summary(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Defects: {}", self.count());

        let mut sorted: Vec<&Defect> = self.iter().collect();
        sorted.sort_by(|a, b| a.token.cmp(&b.token).then(a.rule.cmp(b.rule)));
        for defect in sorted {
            let _ = writeln!(output, "  {defect}");
        }

        output
    }
}

impl fmt::Display for Defects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
