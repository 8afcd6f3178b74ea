//! Record of descriptor sources that have been applied.
//!
//! The registry is append-only: hooks cannot be removed, so neither can the record of
//! having applied them. A source is identified by the class loader it came from (by id,
//! since loader names need not be unique) plus the name of its hook-info class.

use std::{fmt, sync::OnceLock};

use dashmap::DashSet;

use crate::runtime::ClassLoader;

/// Identity of an applied descriptor source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookSource {
    /// Id of the patch class loader
    pub loader_id: u64,
    /// Name of the patch class loader
    pub loader: String,
    /// Name of the hook-info class
    pub class: String,
}

impl HookSource {
    /// Identify the hook-info class `class` defined by `loader`
    #[must_use]
    pub fn new(loader: &ClassLoader, class: &str) -> Self {
        HookSource {
            loader_id: loader.id(),
            loader: loader.name().to_string(),
            class: class.to_string(),
        }
    }
}

impl fmt::Display for HookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.class, self.loader, self.loader_id)
    }
}

/// Append-only, lock-free set of applied descriptor sources
#[derive(Default)]
pub struct HookRegistry {
    seen: DashSet<HookSource>,
    sources: boxcar::Vec<HookSource>,
}

impl HookRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static HookRegistry {
        static GLOBAL: OnceLock<HookRegistry> = OnceLock::new();
        GLOBAL.get_or_init(HookRegistry::new)
    }

    /// Record that `source` has been applied. Returns `false` if it was already recorded,
    /// in which case nothing changes.
    pub fn record(&self, source: HookSource) -> bool {
        if !self.seen.insert(source.clone()) {
            return false;
        }
        self.sources.push(source);
        true
    }

    /// Returns `true` if `source` has been applied before
    #[must_use]
    pub fn contains(&self, source: &HookSource) -> bool {
        self.seen.contains(source)
    }

    /// Number of recorded sources
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.count()
    }

    /// Returns `true` if nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All recorded sources, in the order they were applied
    #[must_use]
    pub fn sources(&self) -> Vec<HookSource> {
        self.sources.iter().map(|(_, source)| source.clone()).collect()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sources()).finish()
    }
}
