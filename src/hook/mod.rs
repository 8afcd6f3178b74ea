//! The hook installation protocol.
//!
//! # Components
//!
//! - [`find_method`]: Method locator, exact name + descriptor lookup
//! - [`check_compatible_methods`]: Calling-compatibility check between two methods
//! - [`HookInstaller`]: Validates and installs a hook (and optional backup) atomically
//! - [`DescriptorLoader`]: Applies every descriptor unit of a patch class loader
//! - [`NativeHooker`]: The runtime-specific patching capability
//! - [`InProcessHooker`]: `NativeHooker` for the in-process runtime model
//! - [`HookRegistry`]: Append-only record of applied descriptor sources
//!
//! # Data flow
//!
//! ```text
//! DescriptorLoader -> find_method -> check_compatible_methods -> NativeHooker::backup_and_hook
//!                     \______________ HookInstaller _____________/
//! ```

mod batch;
mod compat;
mod descriptor;
mod inprocess;
mod installer;
mod locator;
mod native;
mod registry;

pub use batch::DescriptorLoader;
pub use compat::{check_compatible_methods, effective_params};
pub use descriptor::{BatchReport, DescriptorOutcome, DescriptorState, HookDescriptor};
pub use inprocess::InProcessHooker;
pub use installer::HookInstaller;
pub use locator::find_method;
pub use native::NativeHooker;
pub use registry::{HookRegistry, HookSource};
