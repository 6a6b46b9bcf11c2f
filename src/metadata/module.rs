//! Modules, the unit a rule run analyzes.
//!
//! A [`Module`] couples the [`TypeRegistry`] holding every type a compiled module declares
//! with the [`TargetRuntime`] its metadata root announces. Hosts assemble modules through a
//! [`ModuleBuilder`]; once built, a module is read-only and can be shared across threads.
//!
//! # Examples
//!
//! ```rust
//! use dotlint::metadata::{
//!     typesystem::{Method, TypeBuilder},
//!     ModuleBuilder, TargetRuntime,
//! };
//!
//! let mut builder = ModuleBuilder::new("Acme.dll", TargetRuntime::Net4_0);
//! let base = builder.define(
//!     TypeBuilder::class("Acme", "Base")
//!         .extends_object()
//!         .method(Method::static_method("Log", 1)),
//! )?;
//! builder.define(TypeBuilder::class("Acme", "Derived").extends(base))?;
//!
//! let module = builder.build();
//! assert_eq!(module.types().len(), 2);
//! # Ok::<(), dotlint::Error>(())
//! ```

use std::{collections::HashSet, sync::Arc};

use tracing::debug;

use crate::{
    metadata::{
        runtime::TargetRuntime,
        token::Token,
        typesystem::{CilType, CilTypeRc, CilTypeReference, TypeBuilder, TypeRegistry},
    },
    Result,
};

/// A loaded module: its name, target runtime and types
pub struct Module {
    name: String,
    runtime: TargetRuntime,
    types: Arc<TypeRegistry>,
}

impl Module {
    /// Module name, usually the file name of the assembly
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime the module was compiled against
    pub fn runtime(&self) -> TargetRuntime {
        self.runtime
    }

    /// Registry holding every type of the module
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// All types in declaration (token) order
    pub fn all_types(&self) -> Vec<CilTypeRc> {
        self.types.all_types()
    }
}

/// Assembles a [`Module`] from type definitions.
///
/// Types and members without a token are given the next free row of their table, so hand
/// written hierarchies do not need to care about tokens at all.
pub struct ModuleBuilder {
    name: String,
    runtime: TargetRuntime,
    registry: TypeRegistry,
    next_type_row: u32,
    next_method_row: u32,
    next_field_row: u32,
    member_tokens: HashSet<Token>,
}

impl ModuleBuilder {
    /// Start a module
    ///
    /// ## Arguments
    /// * 'name'    - Module name
    /// * 'runtime' - Runtime the module targets
    pub fn new(name: &str, runtime: TargetRuntime) -> Self {
        ModuleBuilder {
            name: name.to_string(),
            runtime,
            registry: TypeRegistry::new(),
            next_type_row: 1,
            next_method_row: 1,
            next_field_row: 1,
            member_tokens: HashSet::new(),
        }
    }

    /// Start a module whose runtime is given by its metadata root version string
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownRuntime`] if the version string is not recognized.
    pub fn with_version_string(name: &str, version: &str) -> Result<Self> {
        Ok(Self::new(name, TargetRuntime::from_version_string(version)?))
    }

    /// Build the type and add it to the module, returning a reference other types can
    /// extend.
    ///
    /// # Errors
    /// Returns an error if the type definition is malformed or its token is taken.
    pub fn define(&mut self, builder: TypeBuilder) -> Result<CilTypeReference> {
        let cil_type = self.add_type(builder.build()?)?;
        Ok(CilTypeReference::from(cil_type.as_ref()))
    }

    /// Add an already built type to the module
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the token is taken, or a malformed error if a
    /// member token is used twice within the module.
    pub fn add_type(&mut self, mut cil_type: CilType) -> Result<CilTypeRc> {
        if cil_type.token.is_null() {
            cil_type.token = Token::typedef(self.next_type_row);
        }

        let (methods, fields) = cil_type.members_mut();
        for method in methods.iter_mut() {
            if method.token.is_null() {
                method.token = Token::methoddef(self.next_method_row);
            }
            self.next_method_row = self.next_method_row.max(method.token.row() + 1);
        }
        for field in fields.iter_mut() {
            if field.token.is_null() {
                field.token = Token::field(self.next_field_row);
            }
            self.next_field_row = self.next_field_row.max(field.token.row() + 1);
        }

        let member_tokens: Vec<Token> = cil_type
            .all_methods()
            .iter()
            .map(|m| m.token)
            .chain(cil_type.fields().iter().map(|f| f.token))
            .collect();
        if let Some(taken) = member_tokens
            .iter()
            .find(|token| self.member_tokens.contains(token))
        {
            return Err(malformed_error!(
                "Member token {} of '{}' is already used in module '{}'",
                taken,
                cil_type.fullname(),
                self.name
            ));
        }

        let row = cil_type.token.row();
        let cil_type = self.registry.insert(cil_type)?;
        self.member_tokens.extend(member_tokens);
        self.next_type_row = self.next_type_row.max(row + 1);

        Ok(cil_type)
    }

    /// Make the types of a dependency resolvable through `TypeRef`s scoped to `assembly`
    #[must_use]
    pub fn dependency(self, assembly: &str, module: &Module) -> Self {
        self.registry
            .register_external(assembly, module.types().clone());
        self
    }

    /// Finish the module
    pub fn build(self) -> Module {
        debug!(
            module = %self.name,
            runtime = %self.runtime,
            types = self.registry.len(),
            "module assembled"
        );

        Module {
            name: self.name,
            runtime: self.runtime,
            types: Arc::new(self.registry),
        }
    }
}
