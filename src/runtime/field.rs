//! Fields of the managed-runtime model.
//!
//! Only static fields carry a value here; instance state lives on [`crate::runtime::Object`].
//! Descriptor units expose their metadata (`className`, `methodName`, `methodSig`,
//! `hookItemNames`) as static fields.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::runtime::{
    descriptor::TypeDescriptor, method::FieldFlags, token::Token, value::Value,
};

/// Reference to a `Field`
pub type FieldRc = Arc<Field>;
/// A vector that holds a list of `Field`
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;

/// A field declared on a runtime type
pub struct Field {
    /// Token, unique within the defining loader
    pub token: Token,
    /// Field name
    pub name: String,
    /// Declared type
    pub field_type: TypeDescriptor,
    /// Modifiers
    pub flags: FieldFlags,
    /// Static value (`Null` for instance fields)
    value: ArcSwap<Value>,
}

impl Field {
    /// Create a new field holding `value`
    #[must_use]
    pub fn new(token: Token, name: &str, field_type: TypeDescriptor, flags: FieldFlags, value: Value) -> Self {
        Field {
            token,
            name: name.to_string(),
            field_type,
            flags,
            value: ArcSwap::from_pointee(value),
        }
    }

    /// Returns `true` for static fields
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    /// Current static value
    #[must_use]
    pub fn get(&self) -> Value {
        (**self.value.load()).clone()
    }

    /// Replace the static value
    pub fn set(&self, value: Value) {
        self.value.store(Arc::new(value));
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("type", &self.field_type.to_string())
            .field("flags", &self.flags)
            .finish()
    }
}
