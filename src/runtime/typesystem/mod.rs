//! Runtime type system for the managed-runtime model.
//!
//! This module provides the representation of classes, interfaces, arrays and primitives
//! that hook targets, hooks and backups are declared against, together with the
//! assignability predicate the compatibility checker is built on.
//!
//! # Key Components
//!
//! - [`RuntimeType`]: A loaded class, interface, array or primitive
//! - [`TypeRegistry`]: Per-loader storage for types, indexed by token and by name
//! - [`PrimitiveKind`]: Built-in primitive types (`int`, `void`, ...)
//! - [`is_assignable_from`]: Subtype relation over runtime types
//!
//! # Examples
//!
//! ```rust
//! use methodhook::runtime::{typesystem::is_assignable_from, ClassLoader};
//!
//! let boot = ClassLoader::bootstrap()?;
//! let number = boot.load_class("java.lang.Number")?;
//! let integer = boot.load_class("java.lang.Integer")?;
//!
//! assert!(is_assignable_from(&number, &integer));
//! assert!(!is_assignable_from(&integer, &number));
//! # Ok::<(), methodhook::Error>(())
//! ```

mod assignable;
mod base;
mod primitives;
mod registry;

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

pub use assignable::{is_assignable_from, MAX_HIERARCHY_DEPTH};
pub use base::{RuntimeTypeList, RuntimeTypeRef, TypeFlags, TypeFlavor};
pub use primitives::PrimitiveKind;
pub use registry::{TypeRegistry, BOOTSTRAP_LOADER};

use crate::runtime::{
    field::{FieldList, FieldRc},
    method::{MethodList, MethodRc},
    token::Token,
};

/// Root of the class hierarchy
pub const OBJECT_CLASS: &str = "java.lang.Object";
/// Class of string values
pub const STRING_CLASS: &str = "java.lang.String";
/// Marker interface every array type implements
pub const CLONEABLE_INTERFACE: &str = "java.lang.Cloneable";
/// Marker interface every array type implements
pub const SERIALIZABLE_INTERFACE: &str = "java.io.Serializable";

/// Reference to a `RuntimeType`
pub type RuntimeTypeRc = Arc<RuntimeType>;

/// A loaded type: class, interface, array or primitive.
///
/// Identity is pointer identity: two types with the same name defined by different class
/// loaders are different types.
pub struct RuntimeType {
    /// Token, unique within the defining loader
    pub token: Token,
    /// Fully qualified binary name (`com.example.Shape`, `int`, `[Ljava.lang.String;`)
    pub name: String,
    /// Structural kind
    pub flavor: TypeFlavor,
    /// Attribute flags
    pub flags: TypeFlags,
    /// Name of the defining class loader
    pub loader: String,
    /// Superclass, if any (interfaces, primitives and the root class have none)
    base: OnceLock<RuntimeTypeRc>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    pub interfaces: RuntimeTypeList,
    /// Methods declared directly on this type
    pub methods: MethodList,
    /// Fields declared directly on this type
    pub fields: FieldList,
}

impl RuntimeType {
    /// Create a new instance of a `RuntimeType`
    pub fn new(
        token: Token,
        name: String,
        flavor: TypeFlavor,
        flags: TypeFlags,
        loader: String,
        base: Option<RuntimeTypeRc>,
    ) -> Self {
        let base_lock = OnceLock::new();
        if let Some(base_value) = base {
            base_lock.set(base_value).ok();
        }

        RuntimeType {
            token,
            name,
            flavor,
            flags,
            loader,
            base: base_lock,
            interfaces: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the superclass of this type, if it exists
    pub fn base(&self) -> Option<RuntimeTypeRc> {
        self.base.get().cloned()
    }

    /// Returns `true` if this is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Interface)
    }

    /// Returns `true` if this type cannot be instantiated directly (abstract class or interface)
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeFlags::ABSTRACT) || self.is_interface()
    }

    /// Returns `true` if this is a primitive (including `void`)
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Primitive(_))
    }

    /// Returns `true` if this is an array type
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Array { .. })
    }

    /// Returns `true` if this is the root class of the hierarchy
    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Class) && self.name == OBJECT_CLASS
    }

    /// The element type, for array types
    #[must_use]
    pub fn component_type(&self) -> Option<RuntimeTypeRc> {
        match &self.flavor {
            TypeFlavor::Array { component } => Some(component.clone()),
            _ => None,
        }
    }

    /// Find the method declared directly on this type with exactly this name and descriptor
    #[must_use]
    pub fn declared_method(&self, name: &str, descriptor: &str) -> Option<MethodRc> {
        self.methods
            .iter()
            .map(|(_, method)| method)
            .find(|method| method.name == name && method.descriptor == descriptor)
            .cloned()
    }

    /// All methods declared directly on this type with the given name
    #[must_use]
    pub fn declared_methods_named(&self, name: &str) -> Vec<MethodRc> {
        self.methods
            .iter()
            .map(|(_, method)| method)
            .filter(|method| method.name == name)
            .cloned()
            .collect()
    }

    /// Find the method virtual dispatch would select on an instance of this type: the first
    /// match walking from this type up the superclass chain.
    #[must_use]
    pub fn find_virtual(&self, name: &str, descriptor: &str) -> Option<MethodRc> {
        if let Some(method) = self.declared_method(name, descriptor) {
            return Some(method);
        }

        let mut current = self.base();
        let mut depth = 0;
        while let Some(class) = current {
            if let Some(method) = class.declared_method(name, descriptor) {
                return Some(method);
            }
            depth += 1;
            if depth >= MAX_HIERARCHY_DEPTH {
                return None;
            }
            current = class.base();
        }
        None
    }

    /// Find a field declared directly on this type
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldRc> {
        self.fields
            .iter()
            .map(|(_, field)| field)
            .find(|field| field.name == name)
            .cloned()
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.flavor {
            TypeFlavor::Primitive(_) => write!(f, "{}", self.name),
            TypeFlavor::Interface => write!(f, "interface {}", self.name),
            TypeFlavor::Class | TypeFlavor::Array { .. } => write!(f, "class {}", self.name),
        }
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeType")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("loader", &self.loader)
            .finish()
    }
}
