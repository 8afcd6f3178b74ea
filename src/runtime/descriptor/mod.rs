//! Method and field descriptor parsing.
//!
//! Descriptors are the runtime's textual encoding of types. The hook protocol treats a
//! method descriptor as an opaque exact-match key; the runtime model parses descriptors
//! when classes are defined so that declared parameter and return types can be resolved.
//!
//! # Grammar
//!
//! ```text
//! MethodDescriptor := '(' FieldType* ')' ReturnType
//! ReturnType       := FieldType | 'V'
//! FieldType        := 'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z'
//!                   | 'L' BinaryName ';'
//!                   | '[' FieldType
//! ```
//!
//! Binary names use `/` as package separator inside descriptors and are converted to the
//! dotted form (`java.lang.String`) used by class loaders.
//!
//! # Examples
//!
//! ```rust
//! use methodhook::runtime::descriptor::parse_method_descriptor;
//!
//! let descriptor = parse_method_descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")?;
//! assert_eq!(descriptor.params[0].to_string(), "com.example.Shape");
//! assert_eq!(descriptor.return_type.to_string(), "java.lang.Integer");
//! # Ok::<(), methodhook::Error>(())
//! ```

mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a `MethodDescriptor` from descriptor text
///
/// ## Arguments
/// * 'data' - The descriptor to parse, e.g. `(IJ)Ljava/lang/String;`
///
/// # Errors
/// Returns an error if the descriptor is malformed
pub fn parse_method_descriptor(data: &str) -> Result<MethodDescriptor> {
    let mut parser = DescriptorParser::new(data);
    parser.parse_method_descriptor()
}

/// Parse a field `TypeDescriptor` from descriptor text
///
/// ## Arguments
/// * 'data' - The descriptor to parse, e.g. `[Ljava/lang/String;`
///
/// # Errors
/// Returns an error if the descriptor is malformed
pub fn parse_field_descriptor(data: &str) -> Result<TypeDescriptor> {
    let mut parser = DescriptorParser::new(data);
    parser.parse_field_descriptor()
}
