// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # methodhook
//!
//! Substitute the behavior of a method in a running managed program with the behavior of
//! another method, optionally keeping the replaced behavior callable through a
//! *backup* method.
//!
//! ## Features
//!
//! - **Exact method lookup** - Resolve a method by class, name and descriptor
//! - **Calling-compatibility checks** - Receiver, arity, contravariant parameters and
//!   covariant return types are verified before anything is patched
//! - **Atomic installation** - Concurrent callers observe the old or the new behavior,
//!   never a mixture
//! - **Batch loading** - Apply every hook descriptor shipped in a patch class loader, with
//!   per-descriptor isolation
//! - **Pluggable native layer** - The runtime-specific swap sits behind [`hook::NativeHooker`]
//!
//! ## Quick Start
//!
//! ```rust
//! use methodhook::prelude::*;
//!
//! let boot = ClassLoader::bootstrap()?;
//! let app = ClassLoader::new("app", boot);
//!
//! let shape = ClassBuilder::new("com.example.Shape")
//!     .field("side", "I")
//!     .method(|m| {
//!         m.name("area").descriptor("()Ljava/lang/Number;").public().code(|args| {
//!             let side = args[0].as_object().map_or(0, |this| this.get("side").as_int().unwrap_or(0));
//!             Ok(Value::Int(side * side))
//!         })
//!     })
//!     .build(&app)?;
//!
//! let hooks = ClassBuilder::new("com.example.ShapeHooks")
//!     .method(|m| {
//!         m.name("fakeArea")
//!             .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
//!             .static_()
//!             .code(|_| Ok(Value::Int(-1)))
//!     })
//!     .method(|m| {
//!         m.name("origArea")
//!             .descriptor("(Lcom/example/Shape;)Ljava/lang/Number;")
//!             .static_()
//!             .code(|_| Ok(Value::Null))
//!     })
//!     .build(&app)?;
//!
//! let installer = HookInstaller::new(InProcessHooker::new());
//! let fake_area = installer.find_method(&hooks, "fakeArea", "(Lcom/example/Shape;)Ljava/lang/Integer;")?;
//! let orig_area = installer.find_method(&hooks, "origArea", "(Lcom/example/Shape;)Ljava/lang/Number;")?;
//! installer.find_and_backup_and_hook(&shape, "area", "()Ljava/lang/Number;", &fake_area, Some(&orig_area))?;
//!
//! let square = Object::new(&shape)?;
//! square.set("side", 3);
//! assert_eq!(square.invoke_virtual("area", "()Ljava/lang/Number;", &[])?, Value::Int(-1));
//! assert_eq!(orig_area.invoke(&[Value::from(square)])?, Value::Int(9));
//! # Ok::<(), methodhook::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`hook`] - The protocol: locator, compatibility checker, installer, descriptor loader
//! - [`runtime`] - In-process managed-runtime model the protocol operates on
//! - [`config`] - [`HookConfig`] and the re-application policy
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Progress is reported through the [`log`] facade: `info` for installed hooks and batch
//! progress, `warn` for skipped descriptors and abstract targets, `error` for descriptors
//! that failed inside a batch, `debug` for compatibility checks and native calls. No
//! logger is installed by this crate.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use methodhook::prelude::*;
///
/// let installer = HookInstaller::with_config(InProcessHooker::new(), HookConfig::strict());
/// assert_eq!(installer.config().reapply_policy, ReapplyPolicy::Reject);
/// ```
pub mod prelude;

pub mod config;
pub mod hook;
pub mod runtime;

/// `methodhook` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use config::{HookConfig, ReapplyPolicy};
pub use error::{Error, Incompatibility, MethodRole};
