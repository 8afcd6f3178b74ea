//! Per-loader type registry.
//!
//! Every [`crate::runtime::ClassLoader`] owns one [`TypeRegistry`] holding the types it
//! defined. The registry uses a two-index approach:
//!
//! - **Token-based storage**: primary, ordered storage keyed by [`Token`] (`SkipMap`)
//! - **Name-based lookup**: fully qualified name to token (`DashMap`)
//!
//! Insertion reserves the name through the `DashMap` entry API, so two threads racing to
//! define the same name cannot both succeed.
//!
//! The bootstrap registry ([`TypeRegistry::bootstrap`]) is pre-populated with the
//! primitives and a small set of system classes the rest of the model depends on.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use strum::IntoEnumIterator;

use crate::{
    runtime::{
        token::Token,
        typesystem::{
            PrimitiveKind, RuntimeType, RuntimeTypeRc, TypeFlags, TypeFlavor, CLONEABLE_INTERFACE,
            OBJECT_CLASS, SERIALIZABLE_INTERFACE, STRING_CLASS,
        },
    },
    Error, Result,
};

/// Name of the bootstrap class loader
pub const BOOTSTRAP_LOADER: &str = "bootstrap";

/// Central registry for all types defined by one class loader
pub struct TypeRegistry {
    /// Name of the owning class loader
    loader: String,
    /// Primary storage
    types: SkipMap<Token, RuntimeTypeRc>,
    /// Fully qualified name to token
    by_name: DashMap<String, Token>,
    /// Next row per entity kind (types, fields, methods)
    next_type_row: AtomicU32,
    next_field_row: AtomicU32,
    next_method_row: AtomicU32,
}

impl TypeRegistry {
    /// Create an empty registry for the named loader
    #[must_use]
    pub fn new(loader: &str) -> Self {
        TypeRegistry {
            loader: loader.to_string(),
            types: SkipMap::new(),
            by_name: DashMap::new(),
            next_type_row: AtomicU32::new(1),
            next_field_row: AtomicU32::new(1),
            next_method_row: AtomicU32::new(1),
        }
    }

    /// Create the bootstrap registry, containing all primitives and the system classes
    ///
    /// # Errors
    /// Returns an error if a system class cannot be registered
    pub fn bootstrap() -> Result<Self> {
        let registry = TypeRegistry::new(BOOTSTRAP_LOADER);
        registry.initialize_primitives()?;
        registry.initialize_system_classes()?;
        Ok(registry)
    }

    /// Name of the loader owning this registry
    #[must_use]
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// Allocate the next token for the given entity kind
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] for unknown kinds
    pub fn next_token(&self, table: u8) -> Result<Token> {
        let counter = match table {
            Token::TYPE_TABLE => &self.next_type_row,
            Token::FIELD_TABLE => &self.next_field_row,
            Token::METHOD_TABLE => &self.next_method_row,
            other => return Err(Error::TypeError(format!("Unknown token kind 0x{other:02x}"))),
        };
        Ok(Token::from_parts(table, counter.fetch_add(1, Ordering::Relaxed)))
    }

    fn initialize_primitives(&self) -> Result<()> {
        for kind in PrimitiveKind::iter() {
            self.create_type(
                kind.name(),
                TypeFlavor::Primitive(kind),
                TypeFlags::PUBLIC | TypeFlags::FINAL | TypeFlags::ABSTRACT,
                None,
            )?;
        }
        Ok(())
    }

    fn initialize_system_classes(&self) -> Result<()> {
        let public = TypeFlags::PUBLIC;
        let interface = TypeFlags::PUBLIC | TypeFlags::INTERFACE | TypeFlags::ABSTRACT;

        let object = self.create_type(OBJECT_CLASS, TypeFlavor::Class, public, None)?;
        let serializable =
            self.create_type(SERIALIZABLE_INTERFACE, TypeFlavor::Interface, interface, None)?;
        self.create_type(CLONEABLE_INTERFACE, TypeFlavor::Interface, interface, None)?;
        let comparable =
            self.create_type("java.lang.Comparable", TypeFlavor::Interface, interface, None)?;
        let char_sequence =
            self.create_type("java.lang.CharSequence", TypeFlavor::Interface, interface, None)?;

        let string = self.create_type(
            STRING_CLASS,
            TypeFlavor::Class,
            public | TypeFlags::FINAL,
            Some(object.clone()),
        )?;
        string.interfaces.push(serializable.clone());
        string.interfaces.push(comparable.clone());
        string.interfaces.push(char_sequence);

        let number = self.create_type(
            "java.lang.Number",
            TypeFlavor::Class,
            public | TypeFlags::ABSTRACT,
            Some(object.clone()),
        )?;
        number.interfaces.push(serializable.clone());

        for boxed in [
            "java.lang.Byte",
            "java.lang.Short",
            "java.lang.Integer",
            "java.lang.Long",
            "java.lang.Float",
            "java.lang.Double",
        ] {
            let class = self.create_type(
                boxed,
                TypeFlavor::Class,
                public | TypeFlags::FINAL,
                Some(number.clone()),
            )?;
            class.interfaces.push(comparable.clone());
        }

        for boxed in ["java.lang.Boolean", "java.lang.Character"] {
            let class = self.create_type(
                boxed,
                TypeFlavor::Class,
                public | TypeFlags::FINAL,
                Some(object.clone()),
            )?;
            class.interfaces.push(serializable.clone());
            class.interfaces.push(comparable.clone());
        }

        Ok(())
    }

    /// Create and register a new type
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] if a type with this name is already registered
    pub fn create_type(
        &self,
        name: &str,
        flavor: TypeFlavor,
        flags: TypeFlags,
        base: Option<RuntimeTypeRc>,
    ) -> Result<RuntimeTypeRc> {
        let token = self.next_token(Token::TYPE_TABLE)?;
        let new_type = Arc::new(RuntimeType::new(
            token,
            name.to_string(),
            flavor,
            flags,
            self.loader.clone(),
            base,
        ));
        self.insert(&new_type)?;
        Ok(new_type)
    }

    /// Register an existing type under its name and token
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] if a type with this name is already registered
    pub fn insert(&self, new_type: &RuntimeTypeRc) -> Result<()> {
        match self.by_name.entry(new_type.name.clone()) {
            Entry::Occupied(_) => Err(Error::TypeError(format!(
                "Duplicate definition of {} in loader {}",
                new_type.name, self.loader
            ))),
            Entry::Vacant(entry) => {
                entry.insert(new_type.token);
                self.types.insert(new_type.token, new_type.clone());
                Ok(())
            }
        }
    }

    /// Unregister a type, returning it if it was present
    pub fn remove(&self, token: &Token) -> Option<RuntimeTypeRc> {
        let removed = self.types.remove(token)?.value().clone();
        self.by_name.remove(&removed.name);
        Some(removed)
    }

    /// Unregister every array type whose element type is `element`, at any nesting depth.
    /// Returns the number of array types removed.
    pub fn remove_arrays_of(&self, element: &RuntimeTypeRc) -> usize {
        let stale: Vec<Token> = self
            .types
            .iter()
            .filter(|entry| {
                let mut component = entry.value().component_type();
                while let Some(current) = component {
                    if Arc::ptr_eq(&current, element) {
                        return true;
                    }
                    component = current.component_type();
                }
                false
            })
            .map(|entry| *entry.key())
            .collect();

        for token in &stale {
            self.remove(token);
        }
        stale.len()
    }

    /// Return the registered array type for `component`, creating it if needed
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] for arrays of `void`
    pub fn get_or_create_array(&self, component: &RuntimeTypeRc) -> Result<RuntimeTypeRc> {
        if matches!(component.flavor, TypeFlavor::Primitive(PrimitiveKind::Void)) {
            return Err(Error::TypeError("Arrays of void are not allowed".to_string()));
        }

        let name = array_name(component);
        if let Some(existing) = self.get_by_name(&name) {
            return Ok(existing);
        }

        let flags = TypeFlags::PUBLIC | TypeFlags::FINAL | TypeFlags::ABSTRACT;
        let token = self.next_token(Token::TYPE_TABLE)?;
        let array = Arc::new(RuntimeType::new(
            token,
            name.clone(),
            TypeFlavor::Array {
                component: component.clone(),
            },
            flags,
            self.loader.clone(),
            None,
        ));

        match self.insert(&array) {
            Ok(()) => Ok(array),
            // Lost a race against another thread creating the same array type
            Err(_) => self
                .get_by_name(&name)
                .ok_or_else(|| Error::TypeError(format!("Failed to register {name}"))),
        }
    }

    /// Get a primitive type (only present in the bootstrap registry)
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] if this registry holds no primitives
    pub fn get_primitive(&self, primitive: PrimitiveKind) -> Result<RuntimeTypeRc> {
        self.get_by_name(primitive.name())
            .ok_or_else(|| Error::ClassNotFound(primitive.name().to_string()))
    }

    /// Look up a type by token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<RuntimeTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a type by fully qualified name
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<RuntimeTypeRc> {
        let token = *self.by_name.get(name)?;
        self.get(&token)
    }

    /// Number of registered types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered types, in token order
    #[must_use]
    pub fn all_types(&self) -> Vec<RuntimeTypeRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }
}

/// Runtime name of the array type with the given component
fn array_name(component: &RuntimeType) -> String {
    match &component.flavor {
        TypeFlavor::Primitive(kind) => format!("[{}", kind.descriptor()),
        TypeFlavor::Array { .. } => format!("[{}", component.name),
        TypeFlavor::Class | TypeFlavor::Interface => format!("[L{};", component.name),
    }
}
