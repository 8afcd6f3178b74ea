//! Class-loading contexts.
//!
//! A [`ClassLoader`] is a named context that defines types into its own
//! [`TypeRegistry`] and resolves names with parent-first delegation: a name is looked up
//! in the parent chain before the loader's own registry, so system classes always resolve
//! to the bootstrap definitions.
//!
//! The hook protocol uses two loaders: a *patch* loader that defines the descriptor units
//! and hook methods, and an *origin* loader that resolves target classes.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    runtime::{
        descriptor::{parse_field_descriptor, TypeDescriptor},
        typesystem::{RuntimeTypeRc, TypeRegistry},
    },
    Error, Result,
};

pub use crate::runtime::typesystem::BOOTSTRAP_LOADER;

/// Reference to a `ClassLoader`
pub type ClassLoaderRc = Arc<ClassLoader>;

/// Source of loader ids; names are labels and need not be unique
static NEXT_LOADER_ID: AtomicU64 = AtomicU64::new(0);

/// A named class-loading context
pub struct ClassLoader {
    id: u64,
    name: String,
    registry: TypeRegistry,
    parent: Option<ClassLoaderRc>,
}

impl ClassLoader {
    /// Create the bootstrap loader holding primitives and system classes
    ///
    /// # Errors
    /// Returns an error if the bootstrap registry cannot be populated
    pub fn bootstrap() -> Result<ClassLoaderRc> {
        Ok(Arc::new(ClassLoader {
            id: NEXT_LOADER_ID.fetch_add(1, Ordering::Relaxed),
            name: BOOTSTRAP_LOADER.to_string(),
            registry: TypeRegistry::bootstrap()?,
            parent: None,
        }))
    }

    /// Create a loader delegating to `parent`
    #[must_use]
    pub fn new(name: &str, parent: ClassLoaderRc) -> ClassLoaderRc {
        Arc::new(ClassLoader {
            id: NEXT_LOADER_ID.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            registry: TypeRegistry::new(name),
            parent: Some(parent),
        })
    }

    /// Process-unique id of this loader
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name of this loader, as shown in logs
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent loader, if any
    #[must_use]
    pub fn parent(&self) -> Option<&ClassLoaderRc> {
        self.parent.as_ref()
    }

    /// The registry holding the types this loader defined
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Find an already-defined type through the parent chain, then this loader
    #[must_use]
    pub fn find_loaded_class(&self, name: &str) -> Option<RuntimeTypeRc> {
        if let Some(parent) = &self.parent {
            if let Some(found) = parent.find_loaded_class(name) {
                return Some(found);
            }
        }
        self.registry.get_by_name(name)
    }

    /// Resolve a class by fully qualified name.
    ///
    /// Array names (`[I`, `[Lcom.example.Shape;`) are materialised on demand.
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] if neither this loader nor any parent defines it
    pub fn load_class(&self, name: &str) -> Result<RuntimeTypeRc> {
        if let Some(found) = self.find_loaded_class(name) {
            return Ok(found);
        }

        if name.starts_with('[') {
            let descriptor = parse_field_descriptor(&name.replace('.', "/"))
                .map_err(|_| Error::ClassNotFound(name.to_string()))?;
            return self.resolve(&descriptor);
        }

        Err(Error::ClassNotFound(name.to_string()))
    }

    /// Resolve a parsed type descriptor to a runtime type
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] if a referenced class cannot be resolved
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<RuntimeTypeRc> {
        match descriptor {
            TypeDescriptor::Primitive(kind) => self.bootstrap_registry().get_primitive(*kind),
            TypeDescriptor::Object(name) => self.load_class(name),
            TypeDescriptor::Array(component) => {
                let component = self.resolve(component)?;
                if let Some(found) = self.find_loaded_class(&descriptor.class_name()) {
                    return Ok(found);
                }
                // Array types belong to the loader that defined their element type
                self.defining_loader(&component.loader)
                    .registry
                    .get_or_create_array(&component)
            }
        }
    }

    fn defining_loader(&self, name: &str) -> &ClassLoader {
        let mut current = self;
        loop {
            if current.name == name {
                return current;
            }
            match &current.parent {
                Some(parent) => current = parent.as_ref(),
                None => return self,
            }
        }
    }

    fn bootstrap_registry(&self) -> &TypeRegistry {
        match &self.parent {
            Some(parent) => parent.bootstrap_registry(),
            None => &self.registry,
        }
    }
}

impl std::fmt::Debug for ClassLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassLoader")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("types", &self.registry.len())
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .finish()
    }
}
