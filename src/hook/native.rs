//! The native patching capability.
//!
//! Physically rewriting a runtime's dispatch structures is runtime-specific and opaque to
//! the hook protocol. [`NativeHooker`] is the narrow seam through which the protocol uses
//! it: exact method lookup, one-time initialization, and the atomic backup-and-redirect
//! swap. [`crate::hook::InProcessHooker`] implements it for the in-process runtime model.

use crate::runtime::{MethodRc, RuntimeTypeRc};

/// Runtime-specific patching capability used by [`crate::hook::HookInstaller`].
///
/// Implementations must make [`NativeHooker::backup_and_hook`] atomic with respect to
/// threads concurrently invoking the target: they observe either the pre-install or the
/// post-install behavior in full.
pub trait NativeHooker: Send + Sync {
    /// One-time setup for the given runtime version.
    ///
    /// Called exactly once per installer, before any other call.
    fn initialize(&self, runtime_version: u32);

    /// Find the method declared on `class` whose name and descriptor match exactly.
    fn locate(&self, class: &RuntimeTypeRc, name: &str, signature: &str) -> Option<MethodRc>;

    /// Redirect `target` to `hook`, first capturing the target's current behavior in
    /// `backup` if one is given.
    ///
    /// Returns `false` if the swap could not be performed; in that case neither method
    /// may have been modified.
    fn backup_and_hook(&self, target: &MethodRc, hook: &MethodRc, backup: Option<&MethodRc>)
        -> bool;
}
