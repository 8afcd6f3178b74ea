use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::runtime::{
    token::Token,
    typesystem::{PrimitiveKind, RuntimeType, RuntimeTypeRc},
};

/// A vector that holds `RuntimeTypeRc` instances (strong references)
pub type RuntimeTypeList = Arc<boxcar::Vec<RuntimeTypeRc>>;

/// A smart reference to a `RuntimeType` that holds a weak reference, used for
/// back-references (e.g. method to declaring class) that must not keep the type alive
#[derive(Clone, Debug)]
pub struct RuntimeTypeRef {
    weak_ref: Weak<RuntimeType>,
}

impl RuntimeTypeRef {
    /// Create a new `RuntimeTypeRef` from a strong reference
    pub fn new(strong_ref: &RuntimeTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<RuntimeTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the name of the referenced type (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|t| t.name.clone())
    }
}

impl From<&RuntimeTypeRc> for RuntimeTypeRef {
    fn from(strong_ref: &RuntimeTypeRc) -> Self {
        Self::new(strong_ref)
    }
}

#[allow(missing_docs)]
/// The structural kind of a runtime type
#[derive(Debug, Clone)]
pub enum TypeFlavor {
    Primitive(PrimitiveKind),
    Class,
    Interface,
    Array {
        /// The element type of the array
        component: RuntimeTypeRc,
    },
}

impl TypeFlavor {
    /// Returns the primitive kind, if this is a primitive
    #[must_use]
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeFlavor::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Check if this is a reference type (class, interface or array)
    #[must_use]
    pub fn is_reference(&self) -> bool {
        !matches!(self, TypeFlavor::Primitive(_))
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Type attribute flags
    pub struct TypeFlags: u32 {
        /// Accessible from outside its package
        const PUBLIC = 0x0001;
        /// No subclasses allowed
        const FINAL = 0x0010;
        /// Is an interface
        const INTERFACE = 0x0200;
        /// Cannot be instantiated
        const ABSTRACT = 0x0400;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
    }
}
