//! Attribute flags carried by types, methods and fields.
//!
//! The loader hands over the raw ECMA-335 flag words unchanged; this module provides the
//! constants and bitflags needed to query them. Only the bits the rules inspect are named
//! here, unknown bits are preserved in [`crate::metadata::typesystem::CilType::flags`] and
//! truncated for member flags.
//!
//! # Key Types
//! - [`TypeAttributes`]: `TypeDef.Flags` constants (§II.23.1.15)
//! - [`MethodModifiers`]: `MethodDef.Flags` modifier bits (§II.23.1.10)
//! - [`FieldAttributes`]: `Field.Flags` bits (§II.23.1.5)

use bitflags::bitflags;

#[allow(non_snake_case)]
/// Type attribute flag constants for `TypeDef` entries.
///
/// ## Semantic Flags
/// - [`TypeAttributes::CLASS`] / [`TypeAttributes::INTERFACE`] - Type category
/// - [`TypeAttributes::ABSTRACT`] / [`TypeAttributes::SEALED`] - Inheritance modifiers. A C#
///   `static class` is emitted with both set.
pub mod TypeAttributes {
    /// Mask for extracting type visibility information.
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;

    /// Type has no public scope (internal to assembly).
    pub const NOT_PUBLIC: u32 = 0x0000_0000;

    /// Type has public scope (visible outside assembly).
    pub const PUBLIC: u32 = 0x0000_0001;

    /// Nested type with public visibility.
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;

    /// Nested type with private visibility.
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;

    /// Mask for extracting class semantics information.
    pub const CLASS_SEMANTICS_MASK: u32 = 0x0000_0020;

    /// Type is a class (reference or value type).
    pub const CLASS: u32 = 0x0000_0000;

    /// Type is an interface definition.
    pub const INTERFACE: u32 = 0x0000_0020;

    /// Class is abstract and cannot be instantiated directly.
    pub const ABSTRACT: u32 = 0x0000_0080;

    /// Class is sealed and cannot be inherited from.
    pub const SEALED: u32 = 0x0000_0100;

    /// Class name has special meaning to the runtime.
    pub const SPECIAL_NAME: u32 = 0x0000_0400;

    /// Type is serializable (legacy attribute).
    pub const SERIALIZABLE: u32 = 0x0000_2000;

    /// Type initializer may run before the first static field access.
    pub const BEFORE_FIELD_INIT: u32 = 0x0010_0000;
}

/// Bitmask for `ACCESS` state extraction (shared by methods and fields)
pub const MEMBER_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// CLI provides 'special' behavior, dpending upon the name of the method
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
    }
}

impl MethodModifiers {
    /// Extract method modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !MEMBER_ACCESS_MASK)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Field attributes
    pub struct FieldAttributes: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is a compile time constant
        const LITERAL = 0x0040;
        /// Field does not have to be serialized when the type is remoted
        const NOT_SERIALIZED = 0x0080;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// CLI provides 'special' behavior, depending upon the name of the field
        const RTSPECIAL_NAME = 0x0400;
        /// Field has a default value (`Constant` table entry)
        const HAS_DEFAULT = 0x8000;
    }
}

impl FieldAttributes {
    /// Extract field attributes from raw field flags
    #[must_use]
    pub fn from_field_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !MEMBER_ACCESS_MASK)
    }
}
