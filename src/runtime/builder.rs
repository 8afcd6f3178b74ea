//! Builders for defining classes in a class loader.
//!
//! [`ClassBuilder`] offers a fluent API for declaring a class or interface together with
//! its methods and fields, and defining it into a [`ClassLoader`]. Method code is supplied
//! as closures over [`Value`] arguments.
//!
//! Definition is all-or-nothing: descriptors are parsed before anything is registered, and
//! if a method or field type cannot be resolved the half-built class is removed again.
//!
//! # Example
//!
//! ```rust
//! use methodhook::runtime::{ClassBuilder, ClassLoader, Value};
//!
//! let boot = ClassLoader::bootstrap()?;
//! let app = ClassLoader::new("app", boot);
//!
//! let greeter = ClassBuilder::new("com.example.Greeter")
//!     .public()
//!     .static_field("GREETING", "Ljava/lang/String;", Value::from("hello"))
//!     .method(|m| {
//!         m.name("greet")
//!             .descriptor("()Ljava/lang/String;")
//!             .public()
//!             .code(|_| Ok(Value::from("hello")))
//!     })
//!     .build(&app)?;
//!
//! assert_eq!(greeter.field("GREETING").unwrap().get(), Value::from("hello"));
//! assert!(greeter.declared_method("greet", "()Ljava/lang/String;").is_some());
//! # Ok::<(), methodhook::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    runtime::{
        descriptor::{
            parse_field_descriptor, parse_method_descriptor, MethodDescriptor, TypeDescriptor,
        },
        field::Field,
        loader::ClassLoader,
        method::{FieldFlags, Method, MethodBody, MethodCode, MethodModifiers},
        token::Token,
        typesystem::{RuntimeTypeRc, TypeFlags, TypeFlavor, OBJECT_CLASS},
        value::Value,
    },
    Error::TypeError,
    Result,
};

/// Fluent definition of a single method
pub struct MethodBuilder {
    name: String,
    descriptor: String,
    modifiers: MethodModifiers,
    code: Option<MethodBody>,
}

impl MethodBuilder {
    fn new() -> Self {
        MethodBuilder {
            name: String::new(),
            descriptor: String::new(),
            modifiers: MethodModifiers::empty(),
            code: None,
        }
    }

    /// Set the method name
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the method descriptor, e.g. `(I)Ljava/lang/String;`
    #[must_use]
    pub fn descriptor(mut self, descriptor: &str) -> Self {
        self.descriptor = descriptor.to_string();
        self
    }

    /// Add arbitrary modifiers
    #[must_use]
    pub fn modifiers(mut self, modifiers: MethodModifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Mark the method `public`
    #[must_use]
    pub fn public(self) -> Self {
        self.modifiers(MethodModifiers::PUBLIC)
    }

    /// Mark the method `private`
    #[must_use]
    pub fn private(self) -> Self {
        self.modifiers(MethodModifiers::PRIVATE)
    }

    /// Mark the method `static`
    #[must_use]
    pub fn static_(self) -> Self {
        self.modifiers(MethodModifiers::STATIC)
    }

    /// Mark the method `final`
    #[must_use]
    pub fn final_(self) -> Self {
        self.modifiers(MethodModifiers::FINAL)
    }

    /// Mark the method `abstract`
    #[must_use]
    pub fn abstract_(self) -> Self {
        self.modifiers(MethodModifiers::ABSTRACT)
    }

    /// Mark the method `native`
    #[must_use]
    pub fn native(self) -> Self {
        self.modifiers(MethodModifiers::NATIVE)
    }

    /// Supply the method's code. Instance methods receive their receiver as `args[0]`.
    #[must_use]
    pub fn code<F>(mut self, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.code = Some(Arc::new(body));
        self
    }
}

struct FieldSpec {
    name: String,
    descriptor: String,
    flags: FieldFlags,
    value: Value,
}

/// Fluent definition of a class or interface
pub struct ClassBuilder {
    name: String,
    flags: TypeFlags,
    superclass: Option<String>,
    interfaces: Vec<String>,
    methods: Vec<MethodBuilder>,
    fields: Vec<FieldSpec>,
}

impl ClassBuilder {
    /// Start a class with the given fully qualified name
    #[must_use]
    pub fn new(name: &str) -> Self {
        ClassBuilder {
            name: name.to_string(),
            flags: TypeFlags::empty(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Mark the class `public`
    #[must_use]
    pub fn public(mut self) -> Self {
        self.flags |= TypeFlags::PUBLIC;
        self
    }

    /// Mark the class `abstract`
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.flags |= TypeFlags::ABSTRACT;
        self
    }

    /// Mark the class `final`
    #[must_use]
    pub fn final_(mut self) -> Self {
        self.flags |= TypeFlags::FINAL;
        self
    }

    /// Define an interface instead of a class
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flags |= TypeFlags::INTERFACE | TypeFlags::ABSTRACT;
        self
    }

    /// Set the superclass (defaults to the root class)
    #[must_use]
    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    /// Add an implemented (or, for interfaces, extended) interface
    #[must_use]
    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Declare a static field with an initial value
    #[must_use]
    pub fn static_field(mut self, name: &str, descriptor: &str, value: Value) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            flags: FieldFlags::PUBLIC | FieldFlags::STATIC,
            value,
        });
        self
    }

    /// Declare an instance field
    #[must_use]
    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            flags: FieldFlags::PRIVATE,
            value: Value::Null,
        });
        self
    }

    /// Declare a method
    #[must_use]
    pub fn method<F>(mut self, define: F) -> Self
    where
        F: FnOnce(MethodBuilder) -> MethodBuilder,
    {
        self.methods.push(define(MethodBuilder::new()));
        self
    }

    /// Define the class into `loader` and return it
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for invalid or conflicting definitions,
    /// [`crate::Error::Malformed`] for bad descriptors and [`crate::Error::ClassNotFound`]
    /// for unresolvable supertypes, parameter or return types
    pub fn build(self, loader: &ClassLoader) -> Result<RuntimeTypeRc> {
        if self.name.is_empty() || self.name.starts_with('[') {
            return Err(TypeError(format!("Invalid class name '{}'", self.name)));
        }
        if loader.find_loaded_class(&self.name).is_some() {
            return Err(TypeError(format!(
                "Duplicate definition of {} in loader {}",
                self.name,
                loader.name()
            )));
        }

        let is_interface = self.flags.contains(TypeFlags::INTERFACE);
        let base = if is_interface {
            None
        } else {
            let base_name = self.superclass.as_deref().unwrap_or(OBJECT_CLASS);
            let base = loader.load_class(base_name)?;
            if !matches!(base.flavor, TypeFlavor::Class) || base.flags.contains(TypeFlags::FINAL) {
                return Err(TypeError(format!(
                    "{} cannot extend {}",
                    self.name, base
                )));
            }
            Some(base)
        };

        let mut interfaces = Vec::with_capacity(self.interfaces.len());
        for name in &self.interfaces {
            let interface = loader.load_class(name)?;
            if !interface.is_interface() {
                return Err(TypeError(format!(
                    "{} cannot implement {}",
                    self.name, interface
                )));
            }
            interfaces.push(interface);
        }

        let mut signatures: Vec<MethodDescriptor> = Vec::with_capacity(self.methods.len());
        for (index, method) in self.methods.iter().enumerate() {
            if method.name.is_empty() {
                return Err(TypeError(format!("{}: unnamed method", self.name)));
            }
            if self.methods[..index]
                .iter()
                .any(|other| other.name == method.name && other.descriptor == method.descriptor)
            {
                return Err(TypeError(format!(
                    "{}: duplicate method {}{}",
                    self.name, method.name, method.descriptor
                )));
            }
            if method.modifiers.contains(MethodModifiers::ABSTRACT)
                && !self.flags.contains(TypeFlags::ABSTRACT)
            {
                return Err(TypeError(format!(
                    "{}: abstract method {} in concrete class",
                    self.name, method.name
                )));
            }
            signatures.push(parse_method_descriptor(&method.descriptor)?);
        }

        let mut field_types = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            field_types.push(parse_field_descriptor(&field.descriptor)?);
        }

        let flavor = if is_interface {
            TypeFlavor::Interface
        } else {
            TypeFlavor::Class
        };
        let registry = loader.registry();
        let class = registry.create_type(&self.name, flavor, self.flags, base)?;
        for interface in interfaces {
            class.interfaces.push(interface);
        }

        let populated = Self::populate(&class, loader, self.methods, signatures)
            .and_then(|()| Self::populate_fields(&class, loader, self.fields, field_types));
        if let Err(error) = populated {
            // Array types resolved from this class's own descriptors point at it too
            registry.remove_arrays_of(&class);
            registry.remove(&class.token);
            return Err(error);
        }

        Ok(class)
    }

    fn populate(
        class: &RuntimeTypeRc,
        loader: &ClassLoader,
        methods: Vec<MethodBuilder>,
        signatures: Vec<MethodDescriptor>,
    ) -> Result<()> {
        for (method, signature) in methods.into_iter().zip(signatures) {
            let mut params = Vec::with_capacity(signature.params.len());
            for param in &signature.params {
                params.push(loader.resolve(param)?);
            }
            let return_type = loader.resolve(&signature.return_type)?;

            let origin = format!("{}.{}", class.name, method.name);
            let code = method.code.map(|body| MethodCode { origin, body });
            let token = loader.registry().next_token(Token::METHOD_TABLE)?;

            class.methods.push(Arc::new(Method::new(
                token,
                class,
                &method.name,
                signature,
                params,
                return_type,
                method.modifiers,
                code,
            )?));
        }
        Ok(())
    }

    fn populate_fields(
        class: &RuntimeTypeRc,
        loader: &ClassLoader,
        fields: Vec<FieldSpec>,
        field_types: Vec<TypeDescriptor>,
    ) -> Result<()> {
        for (field, field_type) in fields.into_iter().zip(field_types) {
            if class.field(&field.name).is_some() {
                return Err(TypeError(format!(
                    "{}: duplicate field {}",
                    class.name, field.name
                )));
            }
            let token = loader.registry().next_token(Token::FIELD_TABLE)?;
            class.fields.push(Arc::new(Field::new(
                token,
                &field.name,
                field_type,
                field.flags,
                field.value,
            )));
        }
        Ok(())
    }
}
