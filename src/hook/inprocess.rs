//! Reference [`NativeHooker`] for the in-process runtime model.
//!
//! Entry points of [`crate::runtime::Method`] are held in an `ArcSwapOption`, so the swap
//! is a pair of atomic pointer stores:
//!
//! 1. the backup receives the target's current entry point,
//! 2. the target receives the hook's entry point.
//!
//! Threads invoking the target load its entry point once per call and therefore run
//! either the old or the new code to completion. Installs are serialized among
//! themselves by a mutex; invocations never take it.

use std::sync::{
    atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
    Mutex,
};

use log::debug;

use crate::{
    hook::NativeHooker,
    runtime::{MethodRc, RuntimeTypeRc},
};

/// Patching capability operating directly on the runtime model's entry points
#[derive(Default)]
pub struct InProcessHooker {
    initialized: AtomicBool,
    runtime_version: AtomicU32,
    install_lock: Mutex<()>,
    initialize_calls: AtomicUsize,
    backup_and_hook_calls: AtomicUsize,
}

impl InProcessHooker {
    /// Create an uninitialized hooker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once [`NativeHooker::initialize`] has run
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// The runtime version passed to [`NativeHooker::initialize`] (0 before)
    #[must_use]
    pub fn runtime_version(&self) -> u32 {
        self.runtime_version.load(Ordering::Acquire)
    }

    /// How often [`NativeHooker::initialize`] was called
    #[must_use]
    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::Relaxed)
    }

    /// How often [`NativeHooker::backup_and_hook`] was called, successful or not
    #[must_use]
    pub fn backup_and_hook_calls(&self) -> usize {
        self.backup_and_hook_calls.load(Ordering::Relaxed)
    }
}

impl NativeHooker for InProcessHooker {
    fn initialize(&self, runtime_version: u32) {
        self.initialize_calls.fetch_add(1, Ordering::Relaxed);
        self.runtime_version.store(runtime_version, Ordering::Release);
        self.initialized.store(true, Ordering::Release);
        debug!("In-process hooker initialized for runtime version {runtime_version}");
    }

    fn locate(&self, class: &RuntimeTypeRc, name: &str, signature: &str) -> Option<MethodRc> {
        class.declared_method(name, signature)
    }

    fn backup_and_hook(
        &self,
        target: &MethodRc,
        hook: &MethodRc,
        backup: Option<&MethodRc>,
    ) -> bool {
        self.backup_and_hook_calls.fetch_add(1, Ordering::Relaxed);
        if !self.is_initialized() {
            debug!("Refusing to patch {}: hooker not initialized", target.fullname());
            return false;
        }

        let _guard = self
            .install_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let Some(original) = target.entry() else {
            debug!("Target {} has no managed code", target.fullname());
            return false;
        };
        let Some(replacement) = hook.entry() else {
            debug!("Hook {} has no managed code", hook.fullname());
            return false;
        };

        if let Some(backup) = backup {
            backup.swap_entry(Some(original.clone()));
            debug!(
                "Backed up {} ({}) into {}",
                target.fullname(),
                original.origin,
                backup.fullname()
            );
        }
        target.swap_entry(Some(replacement));
        debug!("Redirected {} to {}", target.fullname(), hook.fullname());
        true
    }
}
