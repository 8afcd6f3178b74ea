//! Values passed to and returned from method invocations.

use std::{fmt, sync::Arc};

use dashmap::DashMap;

use crate::{
    runtime::typesystem::{RuntimeTypeRc, TypeFlavor},
    Error, Result,
};

/// Reference to an `Object`
pub type ObjectRc = Arc<Object>;

/// A runtime value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Result of a `void` method
    #[default]
    Void,
    /// The null reference
    Null,
    /// `boolean`
    Boolean(bool),
    /// `byte`
    Byte(i8),
    /// `char`
    Char(u16),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// A string instance
    Str(Arc<str>),
    /// An array instance
    Array(Arc<[Value]>),
    /// Any other object instance
    Object(ObjectRc),
}

impl Value {
    /// Returns the `int` payload
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Short(value) => Some(i32::from(*value)),
            Value::Byte(value) => Some(i32::from(*value)),
            Value::Char(value) => Some(i32::from(*value)),
            _ => None,
        }
    }

    /// Returns the `long` payload (widening smaller integers)
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(value) => Some(*value),
            other => other.as_int().map(i64::from),
        }
    }

    /// Returns the `double` payload (widening floats)
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(value) => Some(*value),
            Value::Float(value) => Some(f64::from(*value)),
            _ => None,
        }
    }

    /// Returns the `boolean` payload
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// Returns the object payload
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRc> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the elements of a string array; `None` if this is not an array or an
    /// element is neither a string nor null (null elements are skipped)
    #[must_use]
    pub fn as_str_array(&self) -> Option<Vec<String>> {
        let Value::Array(elements) = self else {
            return None;
        };

        let mut strings = Vec::with_capacity(elements.len());
        for element in elements.iter() {
            match element {
                Value::Str(value) => strings.push(value.to_string()),
                Value::Null => {}
                _ => return None,
            }
        }
        Some(strings)
    }

    /// Returns `true` for the null reference
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<ObjectRc> for Value {
    fn from(value: ObjectRc) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(Arc::from(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Byte(value) => write!(f, "{value}"),
            Value::Char(value) => write!(f, "\\u{value:04x}"),
            Value::Short(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Long(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Double(value) => write!(f, "{value}"),
            Value::Str(value) => write!(f, "{value:?}"),
            Value::Array(elements) => write!(f, "array[{}]", elements.len()),
            Value::Object(object) => write!(f, "{}@{:p}", object.class.name, Arc::as_ptr(object)),
        }
    }
}

/// An instance of a class
pub struct Object {
    /// The runtime class of this instance
    pub class: RuntimeTypeRc,
    /// Instance field values
    fields: DashMap<String, Value>,
}

impl Object {
    /// Allocate a new instance of `class`
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] for abstract classes, interfaces, arrays and primitives
    pub fn new(class: &RuntimeTypeRc) -> Result<ObjectRc> {
        if !matches!(class.flavor, TypeFlavor::Class) || class.is_abstract() {
            return Err(Error::TypeError(format!("Cannot instantiate {}", class)));
        }

        Ok(Arc::new(Object {
            class: class.clone(),
            fields: DashMap::new(),
        }))
    }

    /// Read an instance field (`Null` if never written)
    #[must_use]
    pub fn get(&self, field: &str) -> Value {
        self.fields
            .get(field)
            .map_or(Value::Null, |value| value.value().clone())
    }

    /// Write an instance field
    pub fn set(&self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Invoke `name`/`descriptor` on this instance, selecting the implementation the way
    /// virtual dispatch does (nearest declaration walking up from the runtime class).
    /// The receiver is prepended to `args`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no class in the hierarchy declares the method, or any
    /// error raised by the invoked code
    pub fn invoke_virtual(
        self: &Arc<Self>,
        name: &str,
        descriptor: &str,
        args: &[Value],
    ) -> Result<Value> {
        let method = self
            .class
            .find_virtual(name, descriptor)
            .ok_or_else(|| Error::NotFound {
                class: self.class.name.clone(),
                name: name.to_string(),
                signature: descriptor.to_string(),
            })?;

        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(Value::Object(self.clone()));
        full_args.extend_from_slice(args);
        method.invoke(&full_args)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class.name)
            .field("fields", &self.fields.len())
            .finish()
    }
}
