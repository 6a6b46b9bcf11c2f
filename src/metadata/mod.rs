//! Read-only metadata graph of a compiled .NET module.
//!
//! Decoding the PE image and its metadata tables is the job of a loader outside this crate;
//! what arrives here is the resolved view the rules need: types with their flags, base type
//! references and members, indexed by token.
//!
//! # Key Components
//!
//! - [`Module`] / [`ModuleBuilder`] - A module, its target runtime and its types
//! - [`TargetRuntime`] - Ordered runtime version from the metadata root
//! - [`typesystem`] - Types, members, references and the registry resolving them
//! - [`attributes`] - `TypeDef`, `MethodDef` and `Field` flag definitions
//! - [`token`] - Metadata tokens

pub mod attributes;
mod module;
mod runtime;
pub mod token;
pub mod typesystem;

pub use module::{Module, ModuleBuilder};
pub use runtime::TargetRuntime;
