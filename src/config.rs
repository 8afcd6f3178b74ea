//! Hook configuration
//!
//! This module provides the knobs of the hook protocol: the names making up the
//! descriptor source contract, the runtime version handed to the native capability, and
//! the policy for sources that are applied more than once.

/// Default name of the class enumerating a patch's descriptor units
pub const DEFAULT_HOOK_INFO_CLASS: &str = "com.methodhook.HookInfo";

/// What happens when a descriptor source that was already applied is applied again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum ReapplyPolicy {
    /// Apply again; a warning is logged and the newest hook wins
    #[default]
    Allow,
    /// Refuse the batch with [`crate::Error::AlreadyApplied`] before any descriptor runs
    Reject,
}

/// Configuration for hook installation and descriptor loading
///
/// The field names describe the descriptor source contract: a hook-info class exposing a
/// static string array of descriptor unit names, and per unit the static string fields
/// naming the target plus the static `hook` / `backup` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Fully qualified name of the hook-info class
    pub hook_info_class: String,

    /// Static `String[]` field on the hook-info class listing the descriptor units
    pub item_list_field: String,

    /// Static `String` field on each unit naming the target class
    pub class_name_field: String,

    /// Static `String` field on each unit naming the target method
    pub method_name_field: String,

    /// Static `String` field on each unit holding the target method descriptor
    pub method_signature_field: String,

    /// Name of the static replacement method declared on each unit
    pub hook_method: String,

    /// Name of the optional static backup method declared on each unit
    pub backup_method: String,

    /// Version passed once to the native capability's initialization (default: 0)
    pub runtime_version: u32,

    /// Behavior when a descriptor source is applied more than once
    pub reapply_policy: ReapplyPolicy,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            hook_info_class: DEFAULT_HOOK_INFO_CLASS.to_string(),
            item_list_field: "hookItemNames".to_string(),
            class_name_field: "className".to_string(),
            method_name_field: "methodName".to_string(),
            method_signature_field: "methodSig".to_string(),
            hook_method: "hook".to_string(),
            backup_method: "backup".to_string(),
            runtime_version: 0,
            reapply_policy: ReapplyPolicy::Allow,
        }
    }
}

impl HookConfig {
    /// Creates a configuration that refuses to apply any descriptor source twice
    #[must_use]
    pub fn strict() -> Self {
        Self {
            reapply_policy: ReapplyPolicy::Reject,
            ..Self::default()
        }
    }

    /// Set the hook-info class name
    #[must_use]
    pub fn with_hook_info_class(mut self, class: &str) -> Self {
        self.hook_info_class = class.to_string();
        self
    }

    /// Set the field listing the descriptor units
    #[must_use]
    pub fn with_item_list_field(mut self, field: &str) -> Self {
        self.item_list_field = field.to_string();
        self
    }

    /// Set the per-unit field names for target class, method name and method descriptor
    #[must_use]
    pub fn with_target_fields(mut self, class: &str, method: &str, signature: &str) -> Self {
        self.class_name_field = class.to_string();
        self.method_name_field = method.to_string();
        self.method_signature_field = signature.to_string();
        self
    }

    /// Set the names of the hook and backup methods
    #[must_use]
    pub fn with_method_names(mut self, hook: &str, backup: &str) -> Self {
        self.hook_method = hook.to_string();
        self.backup_method = backup.to_string();
        self
    }

    /// Set the runtime version passed to the native capability
    #[must_use]
    pub fn with_runtime_version(mut self, version: u32) -> Self {
        self.runtime_version = version;
        self
    }

    /// Set the re-application policy
    #[must_use]
    pub fn with_reapply_policy(mut self, policy: ReapplyPolicy) -> Self {
        self.reapply_policy = policy;
        self
    }
}
