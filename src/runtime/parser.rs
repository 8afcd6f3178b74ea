//! Low-level cursor over descriptor text.
//!
//! [`Parser`] is a bounds-checked cursor over the bytes of a textual type or method
//! descriptor. It only knows about bytes and positions; the grammar lives in
//! [`crate::runtime::descriptor::DescriptorParser`].
//!
//! # Examples
//!
//! ```rust
//! use methodhook::runtime::Parser;
//!
//! let mut parser = Parser::new(b"Ljava/lang/String;I");
//! assert_eq!(parser.read_byte()?, b'L');
//! assert_eq!(parser.read_until(b';')?, "java/lang/String");
//! assert_eq!(parser.peek_byte()?, b'I');
//! # Ok::<(), methodhook::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// A cursor-based parser for descriptor text.
///
/// The parser maintains an internal position and refuses to read past the end of the
/// underlying data, returning [`crate::Error::OutOfBounds`] instead.
pub struct Parser<'a> {
    /// The data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] from a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there are unread bytes left.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Returns the current position of the cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the byte at the current position without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the cursor is at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data.get(self.position).copied().ok_or(OutOfBounds)
    }

    /// Reads the byte at the current position and advances by one.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the cursor is at the end of the data.
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads bytes up to (not including) `terminator`, consumes the terminator and
    /// returns the bytes read as UTF-8.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the terminator never appears, or
    /// [`crate::Error::Malformed`] if the bytes are not valid UTF-8.
    pub fn read_until(&mut self, terminator: u8) -> Result<&'a str> {
        let start = self.position;
        let Some(offset) = self.data[start..].iter().position(|b| *b == terminator) else {
            return Err(OutOfBounds);
        };

        let end = start + offset;
        self.position = end + 1;
        std::str::from_utf8(&self.data[start..end])
            .map_err(|_| malformed_error!("Invalid UTF-8 at offset {}", start))
    }
}
