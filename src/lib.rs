// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotlint
//!
//! Static design analysis for .NET modules. `dotlint` evaluates rules over the resolved
//! metadata graph of a compiled module (types, their base types and their members) and
//! reports the design defects it finds, graded by severity and confidence.
//!
//! ## Features
//!
//! - **Metadata graph** - Token-indexed types with flags, members and base type references,
//!   resolvable across module boundaries
//! - **Runtime gating** - Rules activate per module based on the runtime it targets
//! - **Parallel evaluation** - Types are checked concurrently, defects are collected lock-free
//! - **Filtering** - Minimum severity and confidence, and a cap on the number of defects
//!
//! ## Quick Start
//!
//! ```rust
//! use dotlint::prelude::*;
//!
//! let mut builder = ModuleBuilder::new("Acme.dll", TargetRuntime::Net4_0);
//! builder.define(
//!     TypeBuilder::class("Acme", "Utils")
//!         .extends_object()
//!         .method(Method::constructor(0))
//!         .method(Method::static_method("Log", 1))
//!         .field(Field::static_field("count")),
//! )?;
//! builder.define(
//!     TypeBuilder::class("Acme", "Counter")
//!         .extends_object()
//!         .field(Field::instance_field("counter")),
//! )?;
//! let module = builder.build();
//!
//! let mut runner = Runner::new(RunnerConfig::default())
//!     .with_rule(ConsiderUsingStaticTypeRule::new());
//! let summary = runner.analyze(&module);
//!
//! assert_eq!(summary.failure, 1);
//! for defect in runner.defects().iter() {
//!     println!("{}", defect);
//! }
//! # Ok::<(), dotlint::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Modules, types, members, tokens and the registry resolving them
//! - [`rules`] - The rule interface, the runner and the design rules
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (module assembly, rule activation, unclassifiable types)
//! and leaves installing a subscriber to the host application.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotlint::prelude::*;
///
/// let module = ModuleBuilder::new("Empty.dll", TargetRuntime::Net2_0).build();
/// let summary = Runner::new(RunnerConfig::default())
///     .with_rule(ConsiderUsingStaticTypeRule::new())
///     .analyze(&module);
/// assert_eq!(summary.checks(), 0);
/// ```
pub mod prelude;

/// Metadata graph of a compiled .NET module
///
/// # Key Components
///
/// - [`metadata::Module`] / [`metadata::ModuleBuilder`] - Modules and their assembly
/// - [`metadata::TargetRuntime`] - Runtime version a module targets
/// - [`metadata::typesystem`] - Types, members and the registry resolving references
/// - [`metadata::token`] - Metadata tokens for cross-references
pub mod metadata;

/// Rules, their evaluation and the defects they report
pub mod rules;

/// `dotlint` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotlint` Error type
///
/// The main error type for all operations in this crate. Errors only arise while a module is
/// assembled; evaluating rules never fails.
pub use error::Error;
