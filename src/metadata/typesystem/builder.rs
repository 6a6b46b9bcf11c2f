//! Builder for type definitions.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for constructing
//! [`CilType`] definitions together with their members. Loaders use it to translate decoded
//! `TypeDef` rows into the metadata graph; tests and tools use it to describe hierarchies by
//! hand.
//!
//! # Example
//!
//! ```rust
//! use dotlint::metadata::typesystem::{Field, Method, TypeBuilder};
//!
//! let counter = TypeBuilder::class("Acme", "Counter")
//!     .extends_object()
//!     .method(Method::constructor(0))
//!     .method(Method::instance_method("Increment", 0))
//!     .field(Field::instance_field("value"))
//!     .build()?;
//!
//! assert_eq!(counter.constructors().count(), 1);
//! # Ok::<(), dotlint::Error>(())
//! ```

use std::collections::HashSet;

use crate::{
    metadata::{
        attributes::TypeAttributes,
        token::Token,
        typesystem::{CilType, CilTypeReference, Field, Method},
    },
    Result,
};

/// Provides a fluent API for building type definitions
pub struct TypeBuilder {
    token: Token,
    namespace: String,
    name: String,
    flags: u32,
    base: Option<CilTypeReference>,
    declaring_type: Option<Token>,
    custom_attributes: Vec<String>,
    methods: Vec<Method>,
    fields: Vec<Field>,
}

impl TypeBuilder {
    /// Start building a type with the given flags and no base type
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace of the type
    /// * 'name'      - Name of the type
    /// * 'flags'     - `TypeAttributes` flags
    pub fn new(namespace: &str, name: &str, flags: u32) -> Self {
        TypeBuilder {
            token: Token(0),
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            base: None,
            declaring_type: None,
            custom_attributes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Start building a public class. The base type still has to be set.
    pub fn class(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeAttributes::PUBLIC | TypeAttributes::CLASS)
    }

    /// Start building a `static class` (abstract + sealed) deriving from `System.Object`
    pub fn static_class(namespace: &str, name: &str) -> Self {
        Self::new(
            namespace,
            name,
            TypeAttributes::PUBLIC
                | TypeAttributes::ABSTRACT
                | TypeAttributes::SEALED
                | TypeAttributes::BEFORE_FIELD_INIT,
        )
        .extends_object()
    }

    /// Start building an interface
    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::new(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
        )
    }

    /// Start building a struct deriving from `System.ValueType`
    pub fn value_type(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeAttributes::PUBLIC | TypeAttributes::SEALED)
            .extends(CilTypeReference::system("ValueType"))
    }

    /// Start building an enum deriving from `System.Enum`
    pub fn enumeration(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeAttributes::PUBLIC | TypeAttributes::SEALED)
            .extends(CilTypeReference::system("Enum"))
    }

    /// Start building a delegate deriving from `System.MulticastDelegate`
    pub fn delegate(namespace: &str, name: &str) -> Self {
        Self::new(namespace, name, TypeAttributes::PUBLIC | TypeAttributes::SEALED)
            .extends(CilTypeReference::system("MulticastDelegate"))
    }

    /// Set the `TypeDef` token, otherwise the module builder assigns the next free row
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Replace the `TypeAttributes` flags
    #[must_use]
    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Add `TypeAttributes` flags to the current ones
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the base type
    #[must_use]
    pub fn extends(mut self, base: CilTypeReference) -> Self {
        self.base = Some(base);
        self
    }

    /// Derive from `System.Object`
    #[must_use]
    pub fn extends_object(self) -> Self {
        self.extends(CilTypeReference::object())
    }

    /// Nest the type inside the type with the given token
    #[must_use]
    pub fn nested_in(mut self, declaring_type: Token) -> Self {
        self.declaring_type = Some(declaring_type);
        self
    }

    /// Apply a custom attribute, given by the full name of its type
    #[must_use]
    pub fn custom_attribute(mut self, fullname: &str) -> Self {
        self.custom_attributes.push(fullname.to_string());
        self
    }

    /// Declare a method or constructor
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Finish the type definition
    ///
    /// Member tokens may be left null; [`crate::metadata::ModuleBuilder`] assigns them when
    /// the type is added to a module.
    ///
    /// # Errors
    /// Returns a malformed error if a member carries a token from the wrong table, or if two
    /// members share a token.
    pub fn build(self) -> Result<CilType> {
        let mut seen = HashSet::new();

        for method in &self.methods {
            if method.token.is_null() {
                continue;
            }
            if method.token.table() != Token::TABLE_METHODDEF {
                return Err(malformed_error!(
                    "Method '{}' of '{}.{}' has non-MethodDef token {}",
                    method.name,
                    self.namespace,
                    self.name,
                    method.token
                ));
            }
            if !seen.insert(method.token) {
                return Err(malformed_error!(
                    "Duplicate method token {} in '{}.{}'",
                    method.token,
                    self.namespace,
                    self.name
                ));
            }
        }

        for field in &self.fields {
            if field.token.is_null() {
                continue;
            }
            if field.token.table() != Token::TABLE_FIELD {
                return Err(malformed_error!(
                    "Field '{}' of '{}.{}' has non-Field token {}",
                    field.name,
                    self.namespace,
                    self.name,
                    field.token
                ));
            }
            if !seen.insert(field.token) {
                return Err(malformed_error!(
                    "Duplicate field token {} in '{}.{}'",
                    field.token,
                    self.namespace,
                    self.name
                ));
            }
        }

        let mut cil_type = CilType::new(
            self.token,
            &self.namespace,
            &self.name,
            self.flags,
            self.base,
            self.methods,
            self.fields,
        );
        cil_type.declaring_type = self.declaring_type;
        cil_type.custom_attributes = self.custom_attributes;

        Ok(cil_type)
    }
}
