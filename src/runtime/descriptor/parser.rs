use crate::{
    runtime::{
        descriptor::{MethodDescriptor, TypeDescriptor},
        parser::Parser,
        typesystem::PrimitiveKind,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum number of array dimensions a descriptor may declare
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Descriptor parser for field and method descriptors
///
/// # Example
///
/// ```rust
/// use methodhook::runtime::descriptor::DescriptorParser;
///
/// let mut parser = DescriptorParser::new("(Lcom/example/Shape;I)Ljava/lang/Number;");
/// let descriptor = parser.parse_method_descriptor()?;
/// assert_eq!(descriptor.params.len(), 2);
/// # Ok::<(), methodhook::Error>(())
/// ```
///
/// ## Notes:
/// - A parser instance is meant to parse exactly one descriptor; trailing data is an error.
pub struct DescriptorParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> DescriptorParser<'a> {
    /// Create a new `DescriptorParser` over descriptor text
    #[must_use]
    pub fn new(data: &'a str) -> Self {
        DescriptorParser {
            parser: Parser::new(data.as_bytes()),
            depth: 0,
        }
    }

    /// Parse a single field type (everything but `void`)
    fn parse_field_type(&mut self) -> Result<TypeDescriptor> {
        let offset = self.parser.pos();
        let current = self.parser.read_byte()?;
        match current {
            b'L' => {
                let name = self.parser.read_until(b';')?;
                if name.is_empty() {
                    return Err(malformed_error!("Empty class name at offset {}", offset));
                }
                if name.contains(['.', '[', ';']) || name.starts_with('/') || name.ends_with('/')
                {
                    return Err(malformed_error!(
                        "Invalid class name '{}' at offset {}",
                        name,
                        offset
                    ));
                }
                Ok(TypeDescriptor::Object(name.replace('/', ".")))
            }
            b'[' => {
                self.depth += 1;
                if self.depth > MAX_ARRAY_DIMENSIONS {
                    return Err(RecursionLimit(MAX_ARRAY_DIMENSIONS));
                }
                let component = self.parse_field_type()?;
                self.depth -= 1;
                Ok(TypeDescriptor::Array(Box::new(component)))
            }
            other => match PrimitiveKind::from_descriptor(other) {
                Some(PrimitiveKind::Void) | None => Err(malformed_error!(
                    "Invalid field type '{}' at offset {}",
                    char::from(other),
                    offset
                )),
                Some(kind) => Ok(TypeDescriptor::Primitive(kind)),
            },
        }
    }

    /// Parse a return type, which is either a field type or `V`
    fn parse_return_type(&mut self) -> Result<TypeDescriptor> {
        if self.parser.peek_byte()? == b'V' {
            self.parser.read_byte()?;
            return Ok(TypeDescriptor::Primitive(PrimitiveKind::Void));
        }

        self.parse_field_type()
    }

    fn ensure_consumed(&self) -> Result<()> {
        if self.parser.has_more_data() {
            return Err(malformed_error!(
                "Trailing data after descriptor at offset {}",
                self.parser.pos()
            ));
        }
        Ok(())
    }

    /// Parse a complete method descriptor, `( FieldType* ) ReturnType`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`], [`crate::Error::OutOfBounds`] or
    /// [`crate::Error::RecursionLimit`] for invalid descriptors.
    pub fn parse_method_descriptor(&mut self) -> Result<MethodDescriptor> {
        if self.parser.read_byte()? != b'(' {
            return Err(malformed_error!("Method descriptor must start with '('"));
        }

        let mut params = Vec::new();
        while self.parser.peek_byte()? != b')' {
            params.push(self.parse_field_type()?);
        }
        self.parser.read_byte()?;

        let return_type = self.parse_return_type()?;
        self.ensure_consumed()?;

        Ok(MethodDescriptor {
            params,
            return_type,
        })
    }

    /// Parse a complete field descriptor
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`], [`crate::Error::OutOfBounds`] or
    /// [`crate::Error::RecursionLimit`] for invalid descriptors.
    pub fn parse_field_descriptor(&mut self) -> Result<TypeDescriptor> {
        let field_type = self.parse_field_type()?;
        self.ensure_consumed()?;
        Ok(field_type)
    }
}
