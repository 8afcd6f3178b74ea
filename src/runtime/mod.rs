//! Managed-runtime model.
//!
//! Hooking operates on methods of a managed runtime: classes defined by class loaders,
//! methods identified by name and descriptor, and an assignability relation between
//! types. This module provides that model as plain Rust data structures so the hook
//! protocol can be exercised and tested in-process.
//!
//! # Key Components
//!
//! - [`ClassLoader`]: Named class-loading context with parent-first delegation
//! - [`ClassBuilder`]: Fluent class definition, including method code as closures
//! - [`typesystem`]: Runtime types and the assignability predicate
//! - [`method`]: Methods and their atomically replaceable entry points
//! - [`descriptor`]: Parsing of method and field descriptors
//! - [`Value`] / [`Object`]: Arguments, return values and instances

pub mod builder;
pub mod descriptor;
pub mod field;
pub mod loader;
pub mod method;
pub mod parser;
pub mod token;
pub mod typesystem;
pub mod value;

pub use builder::{ClassBuilder, MethodBuilder};
pub use field::{Field, FieldRc};
pub use loader::{ClassLoader, ClassLoaderRc};
pub use method::{Method, MethodCode, MethodModifiers, MethodRc};
pub use parser::Parser;
pub use token::Token;
pub use typesystem::{RuntimeType, RuntimeTypeRc};
pub use value::{Object, ObjectRc, Value};
