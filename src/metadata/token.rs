//! Metadata tokens identifying types and members within a module.
//!
//! A token is the stable identity every element of the metadata graph is indexed by. The
//! type registry stores types keyed by token, members carry their own token, and the
//! hierarchy walk in the rule engine tracks visited types by token.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Table id of `TypeRef` entries (types defined in another module)
    pub const TABLE_TYPEREF: u8 = 0x01;
    /// Table id of `TypeDef` entries (types defined in this module)
    pub const TABLE_TYPEDEF: u8 = 0x02;
    /// Table id of `Field` entries
    pub const TABLE_FIELD: u8 = 0x04;
    /// Table id of `MethodDef` entries
    pub const TABLE_METHODDEF: u8 = 0x06;
    /// Table id of `TypeSpec` entries (instantiated generic types)
    pub const TABLE_TYPESPEC: u8 = 0x1B;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a row index
    ///
    /// ## Arguments
    /// * 'table' - The metadata table id
    /// * 'row'   - The 1-based row, truncated to 24 bits
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Creates a `TypeDef` token for the given row
    #[must_use]
    pub fn typedef(row: u32) -> Self {
        Self::from_parts(Self::TABLE_TYPEDEF, row)
    }

    /// Creates a `TypeRef` token for the given row
    #[must_use]
    pub fn typeref(row: u32) -> Self {
        Self::from_parts(Self::TABLE_TYPEREF, row)
    }

    /// Creates a `MethodDef` token for the given row
    #[must_use]
    pub fn methoddef(row: u32) -> Self {
        Self::from_parts(Self::TABLE_METHODDEF, row)
    }

    /// Creates a `Field` token for the given row
    #[must_use]
    pub fn field(row: u32) -> Self {
        Self::from_parts(Self::TABLE_FIELD, row)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token can identify a type (`TypeDef`, `TypeRef` or `TypeSpec`)
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(
            self.table(),
            Self::TABLE_TYPEDEF | Self::TABLE_TYPEREF | Self::TABLE_TYPESPEC
        )
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
