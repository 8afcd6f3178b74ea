//! Tokens identifying runtime entities.
//!
//! Every type, method and field defined by a class loader receives a [`Token`] unique
//! within that loader. Registries use tokens as ordered primary keys.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A token identifying a type, method or field entry within one class loader.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the entity kind (see the `*_TABLE` constants)
/// - The low 24 bits (bits 0-23) are the row, allocated sequentially per loader
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Kind byte for types
    pub const TYPE_TABLE: u8 = 0x02;
    /// Kind byte for fields
    pub const FIELD_TABLE: u8 = 0x04;
    /// Kind byte for methods
    pub const METHOD_TABLE: u8 = 0x06;

    /// Creates a token from a kind byte and a row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the entity kind from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
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
