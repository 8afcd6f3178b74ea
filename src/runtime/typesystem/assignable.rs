//! The "is-assignable-from" relation over runtime types.
//!
//! `is_assignable_from(a, b)` holds when a value of type `b` may be used wherever a value
//! of type `a` is expected:
//!
//! - every type is assignable from itself;
//! - primitives (including `void`) are assignable only from themselves;
//! - the root class accepts every reference type;
//! - a class accepts its subclasses (superclass chain);
//! - an interface accepts every type implementing it, directly, through a superclass, or
//!   through a superinterface;
//! - arrays are covariant in reference components, require identical primitive components,
//!   and are assignable to the root class and to the array marker interfaces.

use std::sync::Arc;

use crate::runtime::typesystem::{
    RuntimeType, TypeFlavor, CLONEABLE_INTERFACE, SERIALIZABLE_INTERFACE,
};

/// Maximum depth walked through superclass or superinterface chains
pub const MAX_HIERARCHY_DEPTH: usize = 256;

/// Returns `true` if a value of type `source` may be used where `target` is expected
#[must_use]
pub fn is_assignable_from(target: &RuntimeType, source: &RuntimeType) -> bool {
    if std::ptr::eq(target, source) {
        return true;
    }

    match (&target.flavor, &source.flavor) {
        (TypeFlavor::Primitive(_), _) | (_, TypeFlavor::Primitive(_)) => false,
        _ if target.is_root() => true,
        (
            TypeFlavor::Array {
                component: target_component,
            },
            TypeFlavor::Array {
                component: source_component,
            },
        ) => {
            if target_component.is_primitive() || source_component.is_primitive() {
                Arc::ptr_eq(target_component, source_component)
            } else {
                is_assignable_from(target_component, source_component)
            }
        }
        (TypeFlavor::Array { .. }, _) => false,
        (TypeFlavor::Interface, TypeFlavor::Array { .. }) => {
            target.name == CLONEABLE_INTERFACE || target.name == SERIALIZABLE_INTERFACE
        }
        (TypeFlavor::Interface, _) => implements(source, target, 0),
        (TypeFlavor::Class, _) => extends(source, target),
    }
}

/// Walks the superclass chain of `source` looking for `target`
fn extends(source: &RuntimeType, target: &RuntimeType) -> bool {
    let mut current = source.base();
    let mut depth = 0;
    while let Some(class) = current {
        if std::ptr::eq(class.as_ref(), target) {
            return true;
        }
        depth += 1;
        if depth >= MAX_HIERARCHY_DEPTH {
            return false;
        }
        current = class.base();
    }
    false
}

/// Checks whether `source`, its superclasses, or any of their interfaces reach `target`
fn implements(source: &RuntimeType, target: &RuntimeType, depth: usize) -> bool {
    if depth >= MAX_HIERARCHY_DEPTH {
        return false;
    }

    for (_, interface) in source.interfaces.iter() {
        if std::ptr::eq(interface.as_ref(), target) || implements(interface, target, depth + 1) {
            return true;
        }
    }

    match source.base() {
        Some(base) => implements(&base, target, depth + 1),
        None => false,
    }
}
