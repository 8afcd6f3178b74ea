//! Method and field attribute flags.
//!
//! # Key Types
//! - [`MethodModifiers`]: Access and implementation modifiers of a method
//! - [`FieldFlags`]: Access and storage modifiers of a field

use bitflags::bitflags;

/// Bitmask for access flag extraction
pub const ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method modifiers
    pub struct MethodModifiers: u32 {
        /// Accessible from everywhere
        const PUBLIC = 0x0001;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0002;
        /// Accessible by the declaring type, subtypes and the package
        const PROTECTED = 0x0004;
        /// Defined on the type, else per instance
        const STATIC = 0x0008;
        /// Method cannot be overridden
        const FINAL = 0x0010;
        /// Invocation is wrapped in the receiver's monitor
        const SYNCHRONIZED = 0x0020;
        /// Implementation is native code
        const NATIVE = 0x0100;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
    }
}

impl MethodModifiers {
    /// Extract only the access flags
    #[must_use]
    pub fn access(self) -> Self {
        Self::from_bits_truncate(self.bits() & ACCESS_MASK)
    }

    /// Keywords in source order, as used when rendering a method
    #[must_use]
    pub fn keywords(self) -> Vec<&'static str> {
        let mut keywords = Vec::new();
        for (flag, keyword) in [
            (MethodModifiers::PUBLIC, "public"),
            (MethodModifiers::PROTECTED, "protected"),
            (MethodModifiers::PRIVATE, "private"),
            (MethodModifiers::ABSTRACT, "abstract"),
            (MethodModifiers::STATIC, "static"),
            (MethodModifiers::FINAL, "final"),
            (MethodModifiers::SYNCHRONIZED, "synchronized"),
            (MethodModifiers::NATIVE, "native"),
        ] {
            if self.contains(flag) {
                keywords.push(keyword);
            }
        }
        keywords
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Field modifiers
    pub struct FieldFlags: u32 {
        /// Accessible from everywhere
        const PUBLIC = 0x0001;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0002;
        /// Accessible by the declaring type, subtypes and the package
        const PROTECTED = 0x0004;
        /// Defined on the type, else per instance
        const STATIC = 0x0008;
        /// Value cannot change after initialization
        const FINAL = 0x0010;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_and_keywords() {
        let modifiers = MethodModifiers::PUBLIC | MethodModifiers::STATIC | MethodModifiers::FINAL;
        assert_eq!(modifiers.access(), MethodModifiers::PUBLIC);
        assert_eq!(modifiers.keywords(), vec!["public", "static", "final"]);
        assert!(MethodModifiers::empty().keywords().is_empty());
    }
}
