use std::fmt;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The hook protocol itself only ever produces four conditions:
///
/// - [`Error::InvalidArgument`] - A required input is absent, or a hook/backup is not static
/// - [`Error::NotFound`] - The method locator could not resolve the requested method
/// - [`Error::Incompatible`] - The compatibility checker rejected a hook or backup
/// - [`Error::HookInstallationFailed`] - The native capability reported a failed swap
///
/// The remaining variants are raised by descriptor loading and by the managed-runtime model
/// (descriptor parsing, class resolution, method invocation).
///
/// # Examples
///
/// ```rust,no_run
/// use methodhook::{Error, prelude::*};
///
/// fn report(installer: &HookInstaller<InProcessHooker>, target: &MethodRc, hook: &MethodRc) {
///     match installer.hook(target, hook) {
///         Ok(()) => println!("installed"),
///         Err(Error::Incompatible(mismatch)) => eprintln!("rejected: {}", mismatch),
///         Err(Error::HookInstallationFailed { target, hook }) => {
///             eprintln!("native swap failed for {} -> {}", target, hook)
///         }
///         Err(e) => eprintln!("other error: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A required input is absent or violates a precondition.
    ///
    /// Raised for empty method names or signatures passed to the locator, and for hook or
    /// backup methods that are not static. Always a local precondition violation; never
    /// recovered by the installer itself.
    #[error("{0}")]
    InvalidArgument(String),

    /// The method locator could not resolve a method.
    ///
    /// # Fields
    ///
    /// * `class` - Fully qualified name of the class that was searched
    /// * `name` - The requested method name
    /// * `signature` - The requested method descriptor
    #[error("Method not found: {class}.{name}{signature}")]
    NotFound {
        /// Class that was searched
        class: String,
        /// Requested method name
        name: String,
        /// Requested method descriptor
        signature: String,
    },

    /// The compatibility checker rejected a hook/backup pairing.
    ///
    /// The associated [`Incompatibility`] names the precise mismatch.
    #[error("{0}")]
    Incompatible(Incompatibility),

    /// The native capability reported that the backup-and-redirect swap failed.
    ///
    /// This is fatal for the hook in question and is never retried.
    #[error("Failed to hook {target} with {hook}")]
    HookInstallationFailed {
        /// The target method
        target: String,
        /// The hook method
        hook: String,
    },

    /// A class could not be resolved by a class loader (including its parents).
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// A class does not expose a static field required by the descriptor source contract,
    /// or the field holds a value of the wrong shape.
    #[error("Missing or unreadable field {class}.{field}")]
    MissingField {
        /// Class that was searched
        class: String,
        /// Name of the field
        field: String,
    },

    /// A descriptor unit does not declare a static `hook` method.
    #[error("Cannot find hook for {0}")]
    MissingHook(String),

    /// A descriptor unit declares several static methods under the `hook` or `backup` name.
    #[error("Ambiguous {name} in {class}: {count} static candidates")]
    AmbiguousMethod {
        /// The descriptor unit class
        class: String,
        /// The contract method name
        name: String,
        /// Number of static methods declared under that name
        count: usize,
    },

    /// A descriptor source has already been applied and the re-application policy rejects it.
    #[error("Hooks from {0} have already been applied")]
    AlreadyApplied(String),

    /// A descriptor or definition is damaged and could not be parsed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Recursion limit reached.
    ///
    /// Array descriptors nest recursively; the associated value shows the limit that was
    /// reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A method without code (abstract, native, or not yet defined) was invoked.
    #[error("Method has no invocable code: {0}")]
    NotInvocable(String),

    /// General error during type system usage, e.g. conflicting definitions or argument
    /// values that do not fit the declared parameter types.
    #[error("{0}")]
    TypeError(String),
}

/// The role a method plays in a compatibility check, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MethodRole {
    /// The method whose dispatched behavior is being replaced
    Original,
    /// The replacement implementation
    Hook,
    /// The method that receives the original behavior
    Backup,
}

/// The precise reason two methods are not calling-compatible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    /// The replacement's return type is not assignable to the original's
    ReturnType {
        /// Role of the method in the `original` position
        original_role: MethodRole,
        /// Its declared return type
        original: String,
        /// Role of the method in the `replacement` position
        replacement_role: MethodRole,
        /// Its declared return type
        replacement: String,
    },
    /// The effective parameter counts differ
    Arity {
        /// Role of the method in the `original` position
        original_role: MethodRole,
        /// Its effective parameter count
        original: usize,
        /// Role of the method in the `replacement` position
        replacement_role: MethodRole,
        /// Its effective parameter count
        replacement: usize,
    },
    /// The replacement cannot accept the original's argument at `index`
    Parameter {
        /// Index into the effective parameter list
        index: usize,
        /// Role of the method in the `original` position
        original_role: MethodRole,
        /// The original's effective parameter type
        original: String,
        /// Role of the method in the `replacement` position
        replacement_role: MethodRole,
        /// The replacement's effective parameter type
        replacement: String,
    },
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Incompatibility::ReturnType {
                original_role,
                original,
                replacement_role,
                replacement,
            } => write!(
                f,
                "Incompatible return types. {original_role}: {original}, {replacement_role}: {replacement}"
            ),
            Incompatibility::Arity {
                original_role,
                original,
                replacement_role,
                replacement,
            } => write!(
                f,
                "Number of arguments don't match. {original_role}: {original}, {replacement_role}: {replacement}"
            ),
            Incompatibility::Parameter {
                index,
                original_role,
                original,
                replacement_role,
                replacement,
            } => write!(
                f,
                "Incompatible argument #{index}: {original_role}: {original}, {replacement_role}: {replacement}"
            ),
        }
    }
}

impl From<Incompatibility> for Error {
    fn from(value: Incompatibility) -> Self {
        Error::Incompatible(value)
    }
}
