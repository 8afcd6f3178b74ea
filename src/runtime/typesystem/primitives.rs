use strum::{EnumCount, EnumIter};

/// Built-in primitive types of the runtime, including the `void` pseudo-type.
///
/// Primitives are only ever assignable from themselves; there is no widening between
/// primitive kinds at the calling-convention level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum PrimitiveKind {
    /// `void`, only valid as a return type
    Void,
    /// `boolean`
    Boolean,
    /// signed 8bit integer
    Byte,
    /// unsigned 16bit UTF-16 code unit
    Char,
    /// signed 16bit integer
    Short,
    /// signed 32bit integer
    Int,
    /// signed 64bit integer
    Long,
    /// 32bit floating-point
    Float,
    /// 64bit floating-point
    Double,
}

impl PrimitiveKind {
    /// The keyword name of this primitive (`int`, `void`, ...)
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// The descriptor character of this primitive
    #[must_use]
    pub fn descriptor(self) -> char {
        match self {
            PrimitiveKind::Void => 'V',
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Char => 'C',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
        }
    }

    /// Map a descriptor byte to its primitive, if it denotes one
    #[must_use]
    pub fn from_descriptor(byte: u8) -> Option<Self> {
        match byte {
            b'V' => Some(PrimitiveKind::Void),
            b'Z' => Some(PrimitiveKind::Boolean),
            b'B' => Some(PrimitiveKind::Byte),
            b'C' => Some(PrimitiveKind::Char),
            b'S' => Some(PrimitiveKind::Short),
            b'I' => Some(PrimitiveKind::Int),
            b'J' => Some(PrimitiveKind::Long),
            b'F' => Some(PrimitiveKind::Float),
            b'D' => Some(PrimitiveKind::Double),
            _ => None,
        }
    }
}
