//! Resolved type system of a module.
//!
//! This module provides the read-only metadata graph the rules operate on: type definitions
//! with their members, non-owning references to base types, and the registry that owns all
//! types of a module and resolves references back into it.
//!
//! # Key Components
//!
//! - [`CilType`]: A type definition with flags, base reference, methods and fields
//! - [`CilTypeReference`]: Non-owning reference to another type, resolvable or not
//! - [`Method`] / [`Field`]: Members with their static-ness and (for methods) arity
//! - [`TypeRegistry`]: Token-indexed storage of all types of a module
//! - [`TypeBuilder`]: Fluent construction of types by a host loader
//!
//! # Examples
//!
//! ```rust
//! use dotlint::metadata::typesystem::{Method, TypeBuilder};
//!
//! let utils = TypeBuilder::class("Acme", "Utils")
//!     .extends_object()
//!     .method(Method::static_method("Log", 1))
//!     .build()?;
//!
//! assert_eq!(utils.fullname(), "Acme.Utils");
//! assert_eq!(utils.methods().count(), 1);
//! # Ok::<(), dotlint::Error>(())
//! ```

mod builder;
mod registry;

use std::sync::Arc;

pub use builder::TypeBuilder;
pub use registry::TypeRegistry;

use crate::metadata::{
    attributes::{FieldAttributes, MethodModifiers, TypeAttributes},
    token::Token,
};

/// Reference to a `CilType`
pub type CilTypeRc = Arc<CilType>;

/// Well-known type names the type system gives meaning to.
#[allow(missing_docs)]
pub mod wellknown {
    pub const SYSTEM_OBJECT: &str = "System.Object";
    pub const SYSTEM_VALUE_TYPE: &str = "System.ValueType";
    pub const SYSTEM_ENUM: &str = "System.Enum";
    pub const SYSTEM_DELEGATE: &str = "System.Delegate";
    pub const SYSTEM_MULTICAST_DELEGATE: &str = "System.MulticastDelegate";
    pub const COMPILER_GENERATED_ATTRIBUTE: &str =
        "System.Runtime.CompilerServices.CompilerGeneratedAttribute";
    pub const GENERATED_CODE_ATTRIBUTE: &str = "System.CodeDom.Compiler.GeneratedCodeAttribute";
    pub const CORE_LIBRARY: &str = "mscorlib";
}

fn join_fullname(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// A non-owning reference to a type, as found in the `Extends` column of a type definition.
///
/// The reference names its target so that well-known types (most importantly the root
/// `System.Object`) can be recognized without the defining module being loaded. Whether the
/// target can be located is decided by [`TypeRegistry::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CilTypeReference {
    /// Token of the referenced `TypeDef`, `TypeRef` or `TypeSpec`
    pub token: Token,
    /// Namespace of the referenced type
    pub namespace: String,
    /// Name of the referenced type
    pub name: String,
    /// Assembly the type lives in, for references leaving the module (`TypeRef` scope)
    pub scope: Option<String>,
}

impl CilTypeReference {
    /// Reference a type defined in the same module
    pub fn typedef(token: Token, namespace: &str, name: &str) -> Self {
        CilTypeReference {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            scope: None,
        }
    }

    /// Reference a type defined in another assembly
    pub fn typeref(token: Token, scope: &str, namespace: &str, name: &str) -> Self {
        CilTypeReference {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            scope: Some(scope.to_string()),
        }
    }

    /// Reference a core library type (`mscorlib`) by its `System` name, e.g. `"Object"`
    pub fn system(name: &str) -> Self {
        Self::typeref(Token::typeref(0), wellknown::CORE_LIBRARY, "System", name)
    }

    /// Reference `System.Object`
    pub fn object() -> Self {
        Self::system("Object")
    }

    /// Returns the full name (Namespace.Name) of the referenced type
    pub fn fullname(&self) -> String {
        join_fullname(&self.namespace, &self.name)
    }

    /// Returns true if the reference names the given full name
    pub fn is(&self, fullname: &str) -> bool {
        match fullname.rsplit_once('.') {
            Some((namespace, name)) => self.namespace == namespace && self.name == name,
            None => self.namespace.is_empty() && self.name == fullname,
        }
    }

    /// Returns true if this references the universal root type `System.Object`
    pub fn is_root(&self) -> bool {
        self.is(wellknown::SYSTEM_OBJECT)
    }
}

impl From<&CilType> for CilTypeReference {
    fn from(cil_type: &CilType) -> Self {
        CilTypeReference::typedef(cil_type.token, &cil_type.namespace, &cil_type.name)
    }
}

/// A method (including constructors) declared by a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// `MethodDef` token, null until assigned by the loader or module builder
    pub token: Token,
    /// Method name (`.ctor` / `.cctor` for constructors)
    pub name: String,
    /// Modifier flags
    pub flags: MethodModifiers,
    /// Number of declared parameters, excluding the implicit `this`
    pub param_count: u32,
}

impl Method {
    /// Name the runtime gives instance constructors
    pub const CTOR: &'static str = ".ctor";
    /// Name the runtime gives type initializers
    pub const CCTOR: &'static str = ".cctor";

    /// Create a method with an unassigned token
    pub fn new(name: &str, flags: MethodModifiers, param_count: u32) -> Self {
        Method {
            token: Token(0),
            name: name.to_string(),
            flags,
            param_count,
        }
    }

    /// Instance constructor taking `param_count` parameters
    pub fn constructor(param_count: u32) -> Self {
        Self::new(
            Self::CTOR,
            MethodModifiers::HIDE_BY_SIG
                | MethodModifiers::SPECIAL_NAME
                | MethodModifiers::RTSPECIAL_NAME,
            param_count,
        )
    }

    /// Type initializer
    pub fn static_constructor() -> Self {
        Self::new(
            Self::CCTOR,
            MethodModifiers::STATIC
                | MethodModifiers::HIDE_BY_SIG
                | MethodModifiers::SPECIAL_NAME
                | MethodModifiers::RTSPECIAL_NAME,
            0,
        )
    }

    /// Plain static method
    pub fn static_method(name: &str, param_count: u32) -> Self {
        Self::new(
            name,
            MethodModifiers::STATIC | MethodModifiers::HIDE_BY_SIG,
            param_count,
        )
    }

    /// Plain instance method
    pub fn instance_method(name: &str, param_count: u32) -> Self {
        Self::new(name, MethodModifiers::HIDE_BY_SIG, param_count)
    }

    /// Assign the `MethodDef` token
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Defined on the type rather than per instance
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodModifiers::STATIC)
    }

    /// Instance constructor or type initializer
    pub fn is_constructor(&self) -> bool {
        self.flags.contains(MethodModifiers::RTSPECIAL_NAME)
            && (self.name == Self::CTOR || self.name == Self::CCTOR)
    }
}

/// A field declared by a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// `Field` token, null until assigned by the loader or module builder
    pub token: Token,
    /// Field name
    pub name: String,
    /// Attribute flags
    pub flags: FieldAttributes,
}

impl Field {
    /// Create a field with an unassigned token
    pub fn new(name: &str, flags: FieldAttributes) -> Self {
        Field {
            token: Token(0),
            name: name.to_string(),
            flags,
        }
    }

    /// Static field
    pub fn static_field(name: &str) -> Self {
        Self::new(name, FieldAttributes::STATIC)
    }

    /// Instance field
    pub fn instance_field(name: &str) -> Self {
        Self::new(name, FieldAttributes::empty())
    }

    /// Compile time constant (`const` in C#), which the runtime stores as a static literal
    pub fn constant(name: &str) -> Self {
        Self::new(
            name,
            FieldAttributes::STATIC | FieldAttributes::LITERAL | FieldAttributes::HAS_DEFAULT,
        )
    }

    /// Assign the `Field` token
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Defined on the type rather than per instance
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldAttributes::STATIC)
    }
}

/// A type definition of a module, as handed over by the loader.
///
/// All collections keep declaration order. Constructors live in the same method list as
/// every other method, see [`CilType::constructors`] and [`CilType::methods`].
#[derive(Debug, Clone)]
pub struct CilType {
    /// `TypeDef` token
    pub token: Token,
    /// `TypeNamespace` (can be empty, e.g. for nested or global types)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// Flags (a 4-byte bitmask of type `TypeAttributes`, §II.23.1.15)
    pub flags: u32,
    /// This types base aka 'extends', absent for interfaces and the root type
    pub base: Option<CilTypeReference>,
    /// Enclosing type for nested types
    pub declaring_type: Option<Token>,
    /// Full names of the custom attribute types applied to this type
    pub custom_attributes: Vec<String>,
    members: Vec<Method>,
    fields: Vec<Field>,
}

impl CilType {
    /// Create a new type definition
    pub fn new(
        token: Token,
        namespace: &str,
        name: &str,
        flags: u32,
        base: Option<CilTypeReference>,
        methods: Vec<Method>,
        fields: Vec<Field>,
    ) -> Self {
        CilType {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            base,
            declaring_type: None,
            custom_attributes: Vec::new(),
            members: methods,
            fields,
        }
    }

    /// Returns the full name (Namespace.Name) of the entity
    pub fn fullname(&self) -> String {
        join_fullname(&self.namespace, &self.name)
    }

    /// Access the base type reference of this type, if it exists
    pub fn base(&self) -> Option<&CilTypeReference> {
        self.base.as_ref()
    }

    /// All declared methods, constructors included, in declaration order
    pub fn all_methods(&self) -> &[Method] {
        &self.members
    }

    /// Instance constructors and type initializers
    pub fn constructors(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter(|m| m.is_constructor())
    }

    /// Methods other than constructors
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter(|m| !m.is_constructor())
    }

    /// Declared fields
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn members_mut(&mut self) -> (&mut [Method], &mut [Field]) {
        (&mut self.members, &mut self.fields)
    }

    fn base_is(&self, fullname: &str) -> bool {
        self.base.as_ref().is_some_and(|base| base.is(fullname))
    }

    /// Type is an interface definition
    pub fn is_interface(&self) -> bool {
        self.flags & TypeAttributes::CLASS_SEMANTICS_MASK == TypeAttributes::INTERFACE
    }

    /// Type derives from `System.Enum`
    pub fn is_enum(&self) -> bool {
        self.base_is(wellknown::SYSTEM_ENUM)
    }

    /// Type is a struct or an enum
    pub fn is_value_type(&self) -> bool {
        self.base_is(wellknown::SYSTEM_VALUE_TYPE) || self.is_enum()
    }

    /// Type derives from `System.MulticastDelegate` (or the legacy `System.Delegate`)
    pub fn is_delegate(&self) -> bool {
        self.base_is(wellknown::SYSTEM_MULTICAST_DELEGATE)
            || self.base_is(wellknown::SYSTEM_DELEGATE)
    }

    /// Type is both abstract and sealed, the encoding of a C# `static class`
    pub fn is_declared_static(&self) -> bool {
        let mask = TypeAttributes::ABSTRACT | TypeAttributes::SEALED;
        self.flags & mask == mask
    }

    /// Type is nested inside another type
    pub fn is_nested(&self) -> bool {
        self.declaring_type.is_some()
    }

    /// Type carries a custom attribute of the given full name
    pub fn has_custom_attribute(&self, fullname: &str) -> bool {
        self.custom_attributes.iter().any(|a| a == fullname)
    }

    /// Type was produced by a compiler or code generator rather than written by hand.
    ///
    /// This only looks at the type itself; enclosing types are taken into account by
    /// [`TypeRegistry::is_compiler_generated`].
    pub fn is_self_generated(&self) -> bool {
        // <Module>, <PrivateImplementationDetails>, closures, $ArrayType$N
        if self.name.starts_with('<') || self.name.starts_with('$') {
            return true;
        }

        self.has_custom_attribute(wellknown::COMPILER_GENERATED_ATTRIBUTE)
            || self.has_custom_attribute(wellknown::GENERATED_CODE_ATTRIBUTE)
    }
}
