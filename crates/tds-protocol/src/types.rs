//! TDS data type catalog.
//!
//! Every parameter sent to SQL Server is tagged with one of these type
//! identifiers. The identifier alone decides how the value bytes are framed
//! on the wire, so the rules here are the single source of truth for
//! parameter encoding.

/// TDS data type identifiers.
///
/// These correspond to the type bytes sent in parameter TYPE_INFO and column
/// metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    // Fixed-length types (no length prefix)
    /// Null type.
    Null = 0x1F,
    /// 8-bit unsigned integer.
    Int1 = 0x30,
    /// Bit (boolean).
    Bit = 0x32,
    /// 16-bit signed integer.
    Int2 = 0x34,
    /// 32-bit signed integer.
    Int4 = 0x38,
    /// 64-bit signed integer.
    Int8 = 0x7F,
    /// 32-bit floating point.
    Float4 = 0x3B,
    /// 64-bit floating point.
    Float8 = 0x3E,
    /// 8-byte money.
    Money = 0x3C,
    /// 4-byte money.
    Money4 = 0x7A,
    /// 8-byte legacy datetime.
    DateTime = 0x3D,
    /// 4-byte small datetime.
    DateTime4 = 0x3A,

    // Byte-length-prefixed nullable types
    /// Nullable GUID.
    Guid = 0x24,
    /// Nullable integer (1, 2, 4 or 8 bytes).
    IntN = 0x26,
    /// Legacy decimal.
    Decimal = 0x37,
    /// Legacy numeric.
    Numeric = 0x3F,
    /// Nullable bit.
    BitN = 0x68,
    /// Nullable decimal.
    DecimalN = 0x6A,
    /// Nullable numeric.
    NumericN = 0x6C,
    /// Nullable float (4 or 8 bytes).
    FloatN = 0x6D,
    /// Nullable money (4 or 8 bytes).
    MoneyN = 0x6E,
    /// Nullable legacy datetime (4 or 8 bytes).
    DateTimeN = 0x6F,
    /// Nullable date (3 bytes).
    DateN = 0x28,
    /// Nullable time with scale.
    TimeN = 0x29,
    /// Nullable datetime2 with scale.
    DateTime2N = 0x2A,
    /// Nullable datetimeoffset with scale.
    DateTimeOffsetN = 0x2B,
    /// Short fixed-length character.
    Char = 0x2F,
    /// Short variable-length character.
    VarChar = 0x27,
    /// Short fixed-length binary.
    Binary = 0x2D,
    /// Short variable-length binary.
    VarBinary = 0x25,

    // Two-byte-length-prefixed types
    /// Large variable-length character.
    BigVarChar = 0xA7,
    /// Large variable-length binary.
    BigVarBinary = 0xA5,
    /// Large fixed-length character.
    BigChar = 0xAF,
    /// Large fixed-length binary.
    BigBinary = 0xAD,
    /// Fixed-length Unicode character.
    NChar = 0xEF,
    /// Variable-length Unicode character.
    NVarChar = 0xE7,

    // Four-byte-length-prefixed large objects
    /// Text (deprecated, use varchar(max)).
    Text = 0x23,
    /// Image (deprecated, use varbinary(max)).
    Image = 0x22,
    /// NText (deprecated, use nvarchar(max)).
    NText = 0x63,
    /// SQL Variant.
    Variant = 0x62,

    // Partially length-prefixed and self-delimiting types
    /// User-defined type.
    Udt = 0xF0,
    /// XML type.
    Xml = 0xF1,
    /// Table-valued parameter.
    Tvp = 0xF3,
}

/// Largest declared size of a two-byte-prefixed type before it is sent as MAX.
pub const MAX_SHORT_LEN: i32 = 8000;

/// How the value bytes of a parameter are framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPrefix {
    /// Fixed-size value, no prefix.
    None,
    /// One-byte length prefix (`0` means NULL).
    Byte,
    /// Two-byte length prefix (`0xFFFF` means NULL).
    UShort,
    /// Four-byte length prefix.
    Long,
    /// Partially length-prefixed chunks (MAX types, XML, UDT).
    Plp,
}

impl TypeId {
    /// Create a type ID from a raw byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x1F => Self::Null,
            0x30 => Self::Int1,
            0x32 => Self::Bit,
            0x34 => Self::Int2,
            0x38 => Self::Int4,
            0x7F => Self::Int8,
            0x3B => Self::Float4,
            0x3E => Self::Float8,
            0x3C => Self::Money,
            0x7A => Self::Money4,
            0x3D => Self::DateTime,
            0x3A => Self::DateTime4,
            0x24 => Self::Guid,
            0x26 => Self::IntN,
            0x37 => Self::Decimal,
            0x3F => Self::Numeric,
            0x68 => Self::BitN,
            0x6A => Self::DecimalN,
            0x6C => Self::NumericN,
            0x6D => Self::FloatN,
            0x6E => Self::MoneyN,
            0x6F => Self::DateTimeN,
            0x28 => Self::DateN,
            0x29 => Self::TimeN,
            0x2A => Self::DateTime2N,
            0x2B => Self::DateTimeOffsetN,
            0x2F => Self::Char,
            0x27 => Self::VarChar,
            0x2D => Self::Binary,
            0x25 => Self::VarBinary,
            0xA7 => Self::BigVarChar,
            0xA5 => Self::BigVarBinary,
            0xAF => Self::BigChar,
            0xAD => Self::BigBinary,
            0xEF => Self::NChar,
            0xE7 => Self::NVarChar,
            0x23 => Self::Text,
            0x22 => Self::Image,
            0x63 => Self::NText,
            0x62 => Self::Variant,
            0xF0 => Self::Udt,
            0xF1 => Self::Xml,
            0xF3 => Self::Tvp,
            _ => return None,
        })
    }

    /// Check if this is a fixed-length type.
    #[must_use]
    pub const fn is_fixed_length(&self) -> bool {
        self.fixed_size().is_some()
    }

    /// Check if this is a date/time type.
    #[must_use]
    pub const fn is_datetime(&self) -> bool {
        matches!(
            self,
            Self::DateTime
                | Self::DateTime4
                | Self::DateTimeN
                | Self::DateN
                | Self::TimeN
                | Self::DateTime2N
                | Self::DateTimeOffsetN
        )
    }

    /// Check if this type carries a collation in its TYPE_INFO.
    #[must_use]
    pub const fn has_collation(&self) -> bool {
        matches!(
            self,
            Self::BigVarChar
                | Self::BigChar
                | Self::NVarChar
                | Self::NChar
                | Self::Text
                | Self::NText
        )
    }

    /// Check if this type carries a scale byte in its TYPE_INFO.
    #[must_use]
    pub const fn has_scale(&self) -> bool {
        matches!(self, Self::TimeN | Self::DateTime2N | Self::DateTimeOffsetN)
    }

    /// Check if this type carries precision and scale bytes in its TYPE_INFO.
    #[must_use]
    pub const fn has_precision(&self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::Numeric | Self::DecimalN | Self::NumericN
        )
    }

    /// Check if a non-NULL value must fill the declared size exactly.
    ///
    /// Holds for the nullable fixed-format types, whose length byte only
    /// distinguishes NULL from one of the valid widths.
    #[must_use]
    pub const fn has_exact_size(&self) -> bool {
        matches!(
            self,
            Self::IntN
                | Self::BitN
                | Self::FloatN
                | Self::MoneyN
                | Self::DateTimeN
                | Self::Guid
                | Self::DateN
                | Self::TimeN
                | Self::DateTime2N
                | Self::DateTimeOffsetN
        )
    }

    /// Get the size of this type in bytes for types without a length prefix.
    #[must_use]
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Null => Some(0),
            Self::Int1 | Self::Bit => Some(1),
            Self::Int2 => Some(2),
            Self::Int4 | Self::Float4 | Self::Money4 | Self::DateTime4 => Some(4),
            Self::Int8 | Self::Float8 | Self::Money | Self::DateTime => Some(8),
            _ => None,
        }
    }

    /// How a value of this type is length-prefixed when declared with `size`.
    ///
    /// Two-byte-prefixed types switch to PLP framing when the declared size
    /// is zero or beyond the 8000-byte in-row limit (including the MAX marker
    /// `0xFFFF`).
    #[must_use]
    pub const fn length_prefix(&self, size: i32) -> LengthPrefix {
        match self {
            Self::Null
            | Self::Int1
            | Self::Bit
            | Self::Int2
            | Self::Int4
            | Self::Int8
            | Self::Float4
            | Self::Float8
            | Self::Money
            | Self::Money4
            | Self::DateTime
            | Self::DateTime4
            | Self::Tvp => LengthPrefix::None,
            Self::BigVarChar
            | Self::BigVarBinary
            | Self::BigChar
            | Self::BigBinary
            | Self::NChar
            | Self::NVarChar => {
                if size == 0 || size > MAX_SHORT_LEN {
                    LengthPrefix::Plp
                } else {
                    LengthPrefix::UShort
                }
            }
            Self::Text | Self::Image | Self::NText | Self::Variant => LengthPrefix::Long,
            Self::Xml | Self::Udt => LengthPrefix::Plp,
            _ => LengthPrefix::Byte,
        }
    }
}
