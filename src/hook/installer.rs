//! Hook installation.
//!
//! [`HookInstaller`] is the transactional front of the protocol: it validates a target,
//! hook and optional backup completely before issuing a single backup-and-redirect
//! request to the native capability, and escalates a refused swap to
//! [`Error::HookInstallationFailed`]. Nothing is retried.
//!
//! # Examples
//!
//! ```rust
//! use methodhook::prelude::*;
//!
//! let boot = ClassLoader::bootstrap()?;
//! let app = ClassLoader::new("app", boot);
//! let shape = ClassBuilder::new("com.example.Shape")
//!     .method(|m| {
//!         m.name("area")
//!             .descriptor("()Ljava/lang/Number;")
//!             .public()
//!             .code(|_| Ok(Value::Int(4)))
//!     })
//!     .build(&app)?;
//! let hooks = ClassBuilder::new("com.example.ShapeHooks")
//!     .method(|m| {
//!         m.name("fakeArea")
//!             .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
//!             .static_()
//!             .code(|_| Ok(Value::Int(42)))
//!     })
//!     .build(&app)?;
//!
//! let installer = HookInstaller::new(InProcessHooker::new());
//! let fake_area = installer.find_method(&hooks, "fakeArea", "(Lcom/example/Shape;)Ljava/lang/Integer;")?;
//! installer.find_and_hook(&shape, "area", "()Ljava/lang/Number;", &fake_area)?;
//!
//! let instance = Object::new(&shape)?;
//! assert_eq!(instance.invoke_virtual("area", "()Ljava/lang/Number;", &[])?, Value::Int(42));
//! # Ok::<(), methodhook::Error>(())
//! ```

use std::sync::Once;

use log::{debug, info};

use crate::{
    config::HookConfig,
    hook::{check_compatible_methods, locator, NativeHooker},
    runtime::{MethodRc, RuntimeTypeRc},
    Error, MethodRole, Result,
};

/// Validates and installs hooks through a [`NativeHooker`]
pub struct HookInstaller<N: NativeHooker> {
    native: N,
    config: HookConfig,
    init: Once,
}

impl<N: NativeHooker> HookInstaller<N> {
    /// Create an installer with the default configuration
    pub fn new(native: N) -> Self {
        Self::with_config(native, HookConfig::default())
    }

    /// Create an installer with an explicit configuration
    pub fn with_config(native: N, config: HookConfig) -> Self {
        HookInstaller {
            native,
            config,
            init: Once::new(),
        }
    }

    /// The underlying native capability
    pub fn native(&self) -> &N {
        &self.native
    }

    /// The active configuration
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    fn ensure_initialized(&self) {
        self.init.call_once(|| {
            info!(
                "Initializing native hook support for runtime version {}",
                self.config.runtime_version
            );
            self.native.initialize(self.config.runtime_version);
        });
    }

    /// Resolve a method declared on `class` by exact name and descriptor
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an empty name or signature and
    /// [`Error::NotFound`] if no such method exists
    pub fn find_method(
        &self,
        class: &RuntimeTypeRc,
        name: &str,
        signature: &str,
    ) -> Result<MethodRc> {
        self.ensure_initialized();
        locator::find_method(&self.native, class, name, signature)
    }

    /// Redirect `target` to `hook`, preserving the original behavior in `backup`.
    ///
    /// `hook` and `backup` must be static. The hook is checked against the target with
    /// the target in the original position; the backup is checked with itself in the
    /// original position and the target as its replacement, since calling the backup
    /// runs the target's original code.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for non-static hook or backup methods,
    /// [`Error::Incompatible`] if either check fails (no native call is made in either
    /// case), and [`Error::HookInstallationFailed`] if the native swap is refused
    pub fn backup_and_hook(
        &self,
        target: &MethodRc,
        hook: &MethodRc,
        backup: Option<&MethodRc>,
    ) -> Result<()> {
        if !hook.is_static() {
            return Err(Error::InvalidArgument(format!(
                "Hook must be a static method: {hook}"
            )));
        }
        check_compatible_methods(target, hook, MethodRole::Original, MethodRole::Hook)?;

        if let Some(backup) = backup {
            if !backup.is_static() {
                return Err(Error::InvalidArgument(format!(
                    "Backup must be a static method: {backup}"
                )));
            }
            check_compatible_methods(backup, target, MethodRole::Backup, MethodRole::Original)?;
        }

        self.ensure_initialized();
        debug!(
            "Requesting native swap of {} -> {} (backup: {})",
            target.fullname(),
            hook.fullname(),
            backup.map_or_else(|| "none".to_string(), |backup| backup.fullname())
        );
        if !self.native.backup_and_hook(target, hook, backup) {
            return Err(Error::HookInstallationFailed {
                target: target.to_string(),
                hook: hook.to_string(),
            });
        }

        info!("Hooked {} with {}", target.fullname(), hook.fullname());
        Ok(())
    }

    /// Redirect `target` to `hook` without keeping a backup
    ///
    /// # Errors
    /// See [`HookInstaller::backup_and_hook`]
    pub fn hook(&self, target: &MethodRc, hook: &MethodRc) -> Result<()> {
        self.backup_and_hook(target, hook, None)
    }

    /// Locate `name` + `signature` on `class`, then install `hook` and `backup` on it
    ///
    /// # Errors
    /// Any error of [`HookInstaller::find_method`] or [`HookInstaller::backup_and_hook`]
    pub fn find_and_backup_and_hook(
        &self,
        class: &RuntimeTypeRc,
        name: &str,
        signature: &str,
        hook: &MethodRc,
        backup: Option<&MethodRc>,
    ) -> Result<()> {
        let target = self.find_method(class, name, signature)?;
        self.backup_and_hook(&target, hook, backup)
    }

    /// Locate `name` + `signature` on `class`, then install `hook` on it
    ///
    /// # Errors
    /// Any error of [`HookInstaller::find_method`] or [`HookInstaller::backup_and_hook`]
    pub fn find_and_hook(
        &self,
        class: &RuntimeTypeRc,
        name: &str,
        signature: &str,
        hook: &MethodRc,
    ) -> Result<()> {
        self.find_and_backup_and_hook(class, name, signature, hook, None)
    }
}
