//! # methodhook Prelude
//!
//! The types needed to define classes, install hooks and apply descriptor batches.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all methodhook operations
pub use crate::Error;

/// The result type used throughout methodhook
pub use crate::Result;

/// Diagnostics of a failed compatibility check
pub use crate::{Incompatibility, MethodRole};

/// Configuration
pub use crate::config::{HookConfig, ReapplyPolicy};

// ================================================================================================
// Hook Protocol
// ================================================================================================

pub use crate::hook::{
    check_compatible_methods, find_method, BatchReport, DescriptorLoader, DescriptorOutcome,
    DescriptorState, HookDescriptor, HookInstaller, HookRegistry, HookSource, InProcessHooker,
    NativeHooker,
};

// ================================================================================================
// Runtime Model
// ================================================================================================

pub use crate::runtime::{
    typesystem::is_assignable_from, ClassBuilder, ClassLoader, ClassLoaderRc, Method, MethodCode,
    MethodModifiers, MethodRc, Object, ObjectRc, RuntimeType, RuntimeTypeRc, Value,
};
