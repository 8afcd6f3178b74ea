//! Hook descriptors and batch results.

use std::fmt;

use crate::{runtime::MethodRc, Error};

/// A declarative request to hook one target method.
///
/// Built by [`crate::hook::DescriptorLoader`] from a descriptor unit and consumed once
/// by the installation pipeline.
#[derive(Debug, Clone)]
pub struct HookDescriptor {
    /// Name of the descriptor unit this was read from
    pub item: String,
    /// Fully qualified name of the target class
    pub class_name: String,
    /// Name of the target method
    pub method_name: String,
    /// Descriptor of the target method
    pub method_signature: String,
    /// Static replacement
    pub hook: MethodRc,
    /// Static method receiving the original behavior, if any
    pub backup: Option<MethodRc>,
}

impl fmt::Display for HookDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{} -> {}",
            self.class_name,
            self.method_name,
            self.method_signature,
            self.hook.fullname()
        )?;
        if let Some(backup) = &self.backup {
            write!(f, " (backup {})", backup.fullname())?;
        }
        Ok(())
    }
}

/// Lifecycle of one descriptor inside a batch
///
/// `Discovered -> Validated -> Installed`, or `Discovered -> Skipped`, or a transition
/// to `Failed` from either `Discovered` or `Validated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum DescriptorState {
    /// Named by the hook-info class, not yet read
    Discovered,
    /// Read completely, target class resolved and hook method found
    Validated,
    /// Hook installed
    Installed,
    /// Intentionally not processed (no target class)
    Skipped,
    /// Reading, validation or installation failed
    Failed,
}

/// Final state of one descriptor
#[derive(Debug)]
pub struct DescriptorOutcome {
    /// Name of the descriptor unit
    pub item: String,
    /// Terminal state (`Installed`, `Skipped` or `Failed`)
    pub state: DescriptorState,
    /// The error for `Failed` descriptors
    pub error: Option<Error>,
}

impl DescriptorOutcome {
    pub(crate) fn installed(item: &str) -> Self {
        Self::new(item, DescriptorState::Installed, None)
    }

    pub(crate) fn skipped(item: &str) -> Self {
        Self::new(item, DescriptorState::Skipped, None)
    }

    pub(crate) fn failed(item: &str, error: Error) -> Self {
        Self::new(item, DescriptorState::Failed, Some(error))
    }

    fn new(item: &str, state: DescriptorState, error: Option<Error>) -> Self {
        DescriptorOutcome {
            item: item.to_string(),
            state,
            error,
        }
    }
}

/// Outcome of applying one descriptor source
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per descriptor unit, in declaration order
    pub outcomes: Vec<DescriptorOutcome>,
}

impl BatchReport {
    fn count(&self, state: DescriptorState) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state == state)
            .count()
    }

    /// Number of installed hooks
    #[must_use]
    pub fn installed(&self) -> usize {
        self.count(DescriptorState::Installed)
    }

    /// Number of skipped descriptors
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(DescriptorState::Skipped)
    }

    /// Number of failed descriptors
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(DescriptorState::Failed)
    }

    /// Returns `true` if no descriptor failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// The outcome for a descriptor unit, by name
    #[must_use]
    pub fn outcome(&self, item: &str) -> Option<&DescriptorOutcome> {
        self.outcomes.iter().find(|outcome| outcome.item == item)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} installed, {} skipped, {} failed",
            self.installed(),
            self.skipped(),
            self.failed()
        )
    }
}
