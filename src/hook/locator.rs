//! Method lookup by exact name and descriptor.

use crate::{
    hook::NativeHooker,
    runtime::{MethodRc, RuntimeTypeRc},
    Error, Result,
};

/// Resolve `name` + `signature` on `class` through the native capability.
///
/// No overload resolution takes place: the descriptor must match exactly. Every call
/// queries the capability again; results are not cached.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `name` or `signature` is empty, and
/// [`Error::NotFound`] if the capability knows no such method.
pub fn find_method<N: NativeHooker + ?Sized>(
    native: &N,
    class: &RuntimeTypeRc,
    name: &str,
    signature: &str,
) -> Result<MethodRc> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Method name is required to look up a method on {}",
            class.name
        )));
    }
    if signature.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Method signature is required to look up {}.{}",
            class.name, name
        )));
    }

    native
        .locate(class, name, signature)
        .ok_or_else(|| Error::NotFound {
            class: class.name.clone(),
            name: name.to_string(),
            signature: signature.to_string(),
        })
}
