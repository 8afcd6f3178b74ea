//! Methods of the managed-runtime model.
//!
//! A [`Method`] carries everything the hook protocol needs to know about a method - its
//! declaring class, name, descriptor, resolved parameter and return types and modifiers -
//! plus an **entry point**: the code that currently executes when the method is invoked.
//!
//! The entry point lives in an [`arc_swap::ArcSwapOption`], so patching capabilities can
//! replace it atomically while other threads invoke the method: every invocation loads
//! the entry point once and runs it to completion, observing either the old or the new
//! code, never a mixture.
//!
//! # Examples
//!
//! ```rust
//! use methodhook::runtime::{ClassBuilder, ClassLoader, Value};
//!
//! let boot = ClassLoader::bootstrap()?;
//! let app = ClassLoader::new("app", boot);
//! let math = ClassBuilder::new("com.example.MathUtil")
//!     .method(|m| {
//!         m.name("twice")
//!             .descriptor("(I)I")
//!             .public()
//!             .static_()
//!             .code(|args| Ok(Value::Int(args[0].as_int().unwrap_or(0) * 2)))
//!     })
//!     .build(&app)?;
//!
//! let twice = math.declared_method("twice", "(I)I").unwrap();
//! assert_eq!(twice.invoke(&[Value::Int(21)])?, Value::Int(42));
//! # Ok::<(), methodhook::Error>(())
//! ```

mod types;

use std::{fmt, sync::Arc};

use arc_swap::ArcSwapOption;

pub use types::{FieldFlags, MethodModifiers, ACCESS_MASK};

use crate::{
    runtime::{
        descriptor::MethodDescriptor,
        token::Token,
        typesystem::{RuntimeTypeRc, RuntimeTypeRef},
        value::Value,
    },
    Error, Result,
};

/// Reference to a `Method`
pub type MethodRc = Arc<Method>;
/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;

/// Invocable code: receives the effective arguments (receiver first for instance methods)
pub type MethodBody = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A unit of code an entry point can hold
pub struct MethodCode {
    /// Human readable origin of the code, e.g. `com.example.Shape.area`
    pub origin: String,
    /// The code itself
    pub body: MethodBody,
}

impl MethodCode {
    /// Wrap a closure as method code
    pub fn new<F>(origin: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        MethodCode {
            origin: origin.into(),
            body: Arc::new(body),
        }
    }
}

impl fmt::Debug for MethodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodCode")
            .field("origin", &self.origin)
            .finish()
    }
}

/// A method declared on a runtime type
pub struct Method {
    /// Token, unique within the defining loader
    pub token: Token,
    /// Declaring class (weak, the class owns its methods)
    declaring: RuntimeTypeRef,
    /// Name of the declaring class, kept for diagnostics
    pub declaring_name: String,
    /// Method name
    pub name: String,
    /// Descriptor text, the exact-match key used by method lookup
    pub descriptor: String,
    /// Parsed descriptor
    pub signature: MethodDescriptor,
    /// Resolved declared parameter types (without the receiver)
    pub params: Vec<RuntimeTypeRc>,
    /// Resolved declared return type
    pub return_type: RuntimeTypeRc,
    /// Modifiers
    pub modifiers: MethodModifiers,
    /// Current entry point; `None` for methods without managed code
    entry: ArcSwapOption<MethodCode>,
}

impl Method {
    /// Create a new method.
    ///
    /// ## Arguments
    /// * `token` - Token allocated by the defining loader
    /// * `declaring` - The class declaring this method
    /// * `name` - Method name
    /// * `signature` - Parsed descriptor; its text form becomes the lookup key
    /// * `params` - Resolved parameter types, matching `signature.params`
    /// * `return_type` - Resolved return type
    /// * `modifiers` - Method modifiers
    /// * `code` - Initial entry point
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] if the resolved parameters do not match the descriptor,
    /// or if code is supplied for an abstract or native method
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token: Token,
        declaring: &RuntimeTypeRc,
        name: &str,
        signature: MethodDescriptor,
        params: Vec<RuntimeTypeRc>,
        return_type: RuntimeTypeRc,
        modifiers: MethodModifiers,
        code: Option<MethodCode>,
    ) -> Result<Self> {
        if params.len() != signature.params.len() {
            return Err(Error::TypeError(format!(
                "{}.{}: {} resolved parameters for descriptor {}",
                declaring.name,
                name,
                params.len(),
                signature
            )));
        }
        if code.is_some()
            && modifiers.intersects(MethodModifiers::ABSTRACT | MethodModifiers::NATIVE)
        {
            return Err(Error::TypeError(format!(
                "{}.{}: abstract and native methods cannot carry managed code",
                declaring.name, name
            )));
        }

        Ok(Method {
            token,
            declaring: RuntimeTypeRef::new(declaring),
            declaring_name: declaring.name.clone(),
            name: name.to_string(),
            descriptor: signature.to_string(),
            signature,
            params,
            return_type,
            modifiers,
            entry: ArcSwapOption::from(code.map(Arc::new)),
        })
    }

    /// The declaring class, if it is still alive
    #[must_use]
    pub fn declaring_class(&self) -> Option<RuntimeTypeRc> {
        self.declaring.upgrade()
    }

    /// Returns `true` for static methods
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MethodModifiers::STATIC)
    }

    /// Returns `true` for abstract methods
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(MethodModifiers::ABSTRACT)
    }

    /// Returns `true` for native methods
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.modifiers.contains(MethodModifiers::NATIVE)
    }

    /// Number of arguments an invocation must supply (declared parameters plus receiver)
    #[must_use]
    pub fn effective_arity(&self) -> usize {
        if self.is_static() {
            self.params.len()
        } else {
            self.params.len() + 1
        }
    }

    /// `Class.name` form used in logs
    #[must_use]
    pub fn fullname(&self) -> String {
        format!("{}.{}", self.declaring_name, self.name)
    }

    /// The code the entry point currently holds
    #[must_use]
    pub fn entry(&self) -> Option<Arc<MethodCode>> {
        self.entry.load_full()
    }

    /// Atomically replace the entry point, returning the previous one.
    ///
    /// Intended for patching capabilities; every subsequent invocation runs `code`.
    pub fn swap_entry(&self, code: Option<Arc<MethodCode>>) -> Option<Arc<MethodCode>> {
        self.entry.swap(code)
    }

    /// Invoke whatever code the entry point currently holds.
    ///
    /// `args` are the effective arguments: for instance methods the receiver comes first.
    ///
    /// # Errors
    /// Returns [`Error::NotInvocable`] if the method has no code, [`Error::TypeError`] if
    /// the argument count does not match, or any error raised by the code itself
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        let Some(code) = self.entry.load_full() else {
            return Err(Error::NotInvocable(self.to_string()));
        };

        if args.len() != self.effective_arity() {
            return Err(Error::TypeError(format!(
                "{} expects {} arguments, got {}",
                self.fullname(),
                self.effective_arity(),
                args.len()
            )));
        }

        (code.body)(args)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for keyword in self.modifiers.keywords() {
            write!(f, "{keyword} ")?;
        }
        write!(
            f,
            "{} {}.{}(",
            self.return_type.name, self.declaring_name, self.name
        )?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", param.name)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("token", &self.token)
            .field("class", &self.declaring_name)
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}
