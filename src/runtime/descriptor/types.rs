use std::fmt;

use crate::runtime::typesystem::PrimitiveKind;

/// Represents a parsed type in a field or method descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A primitive type, including `void` (only valid as a return type)
    Primitive(PrimitiveKind),
    /// A class or interface, by binary name in dotted form (`java.lang.String`)
    Object(String),
    /// An array of the component type
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Returns `true` for the `void` pseudo-type
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(PrimitiveKind::Void))
    }

    /// Number of array dimensions (0 for non-array types)
    #[must_use]
    pub fn dimensions(&self) -> usize {
        match self {
            TypeDescriptor::Array(component) => 1 + component.dimensions(),
            _ => 0,
        }
    }

    /// The name under which a class loader registers this type.
    ///
    /// Primitives use their keyword (`int`), classes their dotted binary name, and arrays
    /// the runtime's array naming (`[I`, `[Ljava.lang.String;`).
    #[must_use]
    pub fn class_name(&self) -> String {
        match self {
            TypeDescriptor::Primitive(kind) => kind.name().to_string(),
            TypeDescriptor::Object(name) => name.clone(),
            TypeDescriptor::Array(_) => self.descriptor().replace('/', "."),
        }
    }

    /// Renders this type back into descriptor notation
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            TypeDescriptor::Primitive(kind) => kind.descriptor().to_string(),
            TypeDescriptor::Object(name) => format!("L{};", name.replace('.', "/")),
            TypeDescriptor::Array(component) => format!("[{}", component.descriptor()),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{}", kind.name()),
            TypeDescriptor::Object(name) => write!(f, "{name}"),
            TypeDescriptor::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// A parsed method descriptor: declared parameter types and return type.
///
/// The receiver of an instance method is never part of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Declared parameter types, in order
    pub params: Vec<TypeDescriptor>,
    /// Declared return type (may be `void`)
    pub return_type: TypeDescriptor,
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for param in &self.params {
            write!(f, "{}", param.descriptor())?;
        }
        write!(f, "){}", self.return_type.descriptor())
    }
}
