//! Protocol-ready parameter descriptors.
//!
//! A [`ParamDescriptor`] is the encoded form of one bound parameter: the
//! wire type, its declared size/scale/precision, the status flags and the
//! raw value bytes. Descriptors are checked against the type catalog when
//! they are built and are immutable afterwards.
//!
//! ## Wire Format
//!
//! ```text
//! RPC parameter:
//! +-------------------+
//! | Name              | (B_VARCHAR, UTF-16LE)
//! +-------------------+
//! | Status flags      | (1 byte, fByRefValue = 0x01)
//! +-------------------+
//! | TYPE_INFO         | (type byte + size/scale/precision/collation)
//! +-------------------+
//! | Value             | (framed per LengthPrefix)
//! +-------------------+
//! ```

use bitflags::bitflags;
use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{utf16_byte_len, write_b_varchar, write_utf16_string};
use crate::error::ProtocolError;
use crate::prelude::*;
use crate::types::{LengthPrefix, TypeId};

/// Default collation sent with character parameters (Latin1_General_CI_AS).
pub const DEFAULT_COLLATION: [u8; 5] = [0x09, 0x04, 0xD0, 0x00, 0x34];

/// Scale used for temporal types when none is specified (100ns precision).
pub const DEFAULT_TIME_SCALE: u8 = 7;

bitflags! {
    /// RPC parameter status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        /// Parameter is passed by reference (OUTPUT parameter).
        const BY_REF_VALUE = 0x01;
        /// Parameter uses its default value.
        const DEFAULT_VALUE = 0x02;
        /// Parameter is encrypted (Always Encrypted).
        const ENCRYPTED = 0x08;
    }
}

/// Number of bytes used by the time portion of TIME/DATETIME2/DATETIMEOFFSET.
#[must_use]
pub const fn time_len(scale: u8) -> i32 {
    match scale {
        0..=2 => 3,
        3..=4 => 4,
        _ => 5,
    }
}

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamType {
    /// Wire type identifier.
    pub type_id: TypeId,
    /// Declared size in bytes. For variable-length character and binary
    /// types this is the value length; zero or anything beyond 8000 selects
    /// MAX (PLP) framing.
    pub size: i32,
    /// Scale for temporal and decimal types.
    pub scale: u8,
    /// Precision for decimal types.
    pub precision: u8,
    /// Collation for character types.
    pub collation: Option<[u8; 5]>,
}

impl ParamType {
    /// Create a type declaration with the given size.
    pub fn new(type_id: TypeId, size: i32) -> Self {
        Self {
            type_id,
            size,
            scale: 0,
            precision: 0,
            collation: type_id.has_collation().then_some(DEFAULT_COLLATION),
        }
    }

    /// Set the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale;
        self
    }

    /// Set the precision.
    #[must_use]
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// Override the collation of a character type.
    #[must_use]
    pub fn with_collation(mut self, collation: [u8; 5]) -> Self {
        self.collation = Some(collation);
        self
    }

    /// VARCHAR declared with the byte length of its value.
    pub fn big_varchar(len: i32) -> Self {
        Self::new(TypeId::BigVarChar, len)
    }

    /// NVARCHAR declared with the UTF-16 byte length of its value.
    pub fn nvarchar(byte_len: i32) -> Self {
        Self::new(TypeId::NVarChar, byte_len)
    }

    /// VARBINARY declared with the length of its value.
    pub fn big_varbinary(len: i32) -> Self {
        Self::new(TypeId::BigVarBinary, len)
    }

    /// Nullable integer of 1, 2, 4 or 8 bytes.
    pub fn intn(size: i32) -> Self {
        Self::new(TypeId::IntN, size)
    }

    /// Nullable bit.
    pub fn bitn() -> Self {
        Self::new(TypeId::BitN, 1)
    }

    /// Nullable float of 4 or 8 bytes.
    pub fn floatn(size: i32) -> Self {
        Self::new(TypeId::FloatN, size)
    }

    /// UNIQUEIDENTIFIER.
    pub fn guid() -> Self {
        Self::new(TypeId::Guid, 16)
    }

    /// DECIMAL with the given precision and scale.
    pub fn decimaln(precision: u8, scale: u8) -> Self {
        Self::new(TypeId::DecimalN, 17)
            .with_precision(precision)
            .with_scale(scale)
    }

    /// Legacy DATETIME (8 bytes) or SMALLDATETIME (4 bytes).
    pub fn datetimen(size: i32) -> Self {
        Self::new(TypeId::DateTimeN, size)
    }

    /// DATE.
    pub fn daten() -> Self {
        Self::new(TypeId::DateN, 3)
    }

    /// TIME with the given scale.
    pub fn timen(scale: u8) -> Self {
        Self::new(TypeId::TimeN, time_len(scale)).with_scale(scale)
    }

    /// DATETIME2 with the given scale.
    pub fn datetime2n(scale: u8) -> Self {
        Self::new(TypeId::DateTime2N, time_len(scale) + 3).with_scale(scale)
    }

    /// DATETIMEOFFSET with the given scale.
    pub fn datetimeoffsetn(scale: u8) -> Self {
        Self::new(TypeId::DateTimeOffsetN, time_len(scale) + 5).with_scale(scale)
    }

    /// How the value of this declaration is framed on the wire.
    #[must_use]
    pub fn length_prefix(&self) -> LengthPrefix {
        self.type_id.length_prefix(self.size)
    }

    /// The type as written in an `sp_executesql` parameter declaration.
    pub fn declaration(&self) -> String {
        let max = self.length_prefix() == LengthPrefix::Plp;
        match self.type_id {
            TypeId::BigVarChar | TypeId::VarChar if max => "varchar(max)".to_string(),
            TypeId::BigVarChar | TypeId::VarChar => format!("varchar({})", self.size),
            TypeId::BigChar | TypeId::Char => format!("char({})", self.size.max(1)),
            TypeId::NVarChar if max => "nvarchar(max)".to_string(),
            TypeId::NVarChar => format!("nvarchar({})", self.size / 2),
            TypeId::NChar => format!("nchar({})", (self.size / 2).max(1)),
            TypeId::BigVarBinary | TypeId::VarBinary if max => "varbinary(max)".to_string(),
            TypeId::BigVarBinary | TypeId::VarBinary => format!("varbinary({})", self.size),
            TypeId::BigBinary | TypeId::Binary => format!("binary({})", self.size.max(1)),
            TypeId::Int1 => "tinyint".to_string(),
            TypeId::Int2 => "smallint".to_string(),
            TypeId::Int4 => "int".to_string(),
            TypeId::Int8 => "bigint".to_string(),
            TypeId::IntN => match self.size {
                1 => "tinyint".to_string(),
                2 => "smallint".to_string(),
                8 => "bigint".to_string(),
                _ => "int".to_string(),
            },
            TypeId::Bit | TypeId::BitN => "bit".to_string(),
            TypeId::Float4 => "real".to_string(),
            TypeId::Float8 => "float".to_string(),
            TypeId::FloatN if self.size == 4 => "real".to_string(),
            TypeId::FloatN => "float".to_string(),
            TypeId::Money4 => "smallmoney".to_string(),
            TypeId::Money => "money".to_string(),
            TypeId::MoneyN if self.size == 4 => "smallmoney".to_string(),
            TypeId::MoneyN => "money".to_string(),
            TypeId::DateTime4 => "smalldatetime".to_string(),
            TypeId::DateTime => "datetime".to_string(),
            TypeId::DateTimeN if self.size == 4 => "smalldatetime".to_string(),
            TypeId::DateTimeN => "datetime".to_string(),
            TypeId::DateN => "date".to_string(),
            TypeId::TimeN => format!("time({})", self.scale),
            TypeId::DateTime2N => format!("datetime2({})", self.scale),
            TypeId::DateTimeOffsetN => format!("datetimeoffset({})", self.scale),
            TypeId::Decimal | TypeId::DecimalN => {
                format!("decimal({}, {})", self.precision, self.scale)
            }
            TypeId::Numeric | TypeId::NumericN => {
                format!("numeric({}, {})", self.precision, self.scale)
            }
            TypeId::Guid => "uniqueidentifier".to_string(),
            TypeId::Text => "text".to_string(),
            TypeId::NText => "ntext".to_string(),
            TypeId::Image => "image".to_string(),
            TypeId::Xml => "xml".to_string(),
            TypeId::Null | TypeId::Variant | TypeId::Udt | TypeId::Tvp => {
                "sql_variant".to_string()
            }
        }
    }

    fn encode(&self, buf: &mut BytesMut) -> Result<(), ProtocolError> {
        let prefix = self.length_prefix();

        // TVP TYPE_INFO is written by the TVP value itself.
        if self.type_id != TypeId::Tvp {
            buf.put_u8(self.type_id as u8);
        }

        match prefix {
            LengthPrefix::None => {}
            LengthPrefix::Byte => {
                if self.type_id.has_scale() {
                    buf.put_u8(self.scale);
                } else if self.type_id != TypeId::DateN {
                    buf.put_u8(self.size as u8);
                    if self.type_id.has_precision() {
                        buf.put_u8(self.precision);
                        buf.put_u8(self.scale);
                    }
                }
            }
            LengthPrefix::UShort => buf.put_u16_le(self.size as u16),
            LengthPrefix::Long => buf.put_i32_le(self.size),
            LengthPrefix::Plp => match self.type_id {
                TypeId::Xml => buf.put_u8(0), // no schema collection
                TypeId::Udt => {
                    return Err(ProtocolError::InvalidParameter {
                        type_id: self.type_id,
                        reason: "UDT parameters are not supported".to_string(),
                    });
                }
                _ => buf.put_u16_le(0xFFFF),
            },
        }

        if self.type_id.has_collation() {
            buf.put_slice(&self.collation.unwrap_or(DEFAULT_COLLATION));
        }

        Ok(())
    }
}

/// One encoded parameter: declared type, status flags and value bytes.
///
/// `buffer` is `None` for SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamDescriptor {
    type_info: ParamType,
    flags: ParamFlags,
    buffer: Option<Bytes>,
}

impl ParamDescriptor {
    /// Create a descriptor, checking the buffer against the declared type.
    pub fn new(type_info: ParamType, buffer: Option<Bytes>) -> Result<Self, ProtocolError> {
        let invalid = |reason: String| ProtocolError::InvalidParameter {
            type_id: type_info.type_id,
            reason,
        };

        if type_info.size < 0 {
            return Err(invalid(format!("negative size {}", type_info.size)));
        }

        let prefix = type_info.length_prefix();
        match (&buffer, prefix) {
            (None, LengthPrefix::None) if type_info.type_id != TypeId::Null => {
                return Err(invalid("fixed-length types cannot carry NULL".to_string()));
            }
            (None, _) => {}
            (Some(value), LengthPrefix::None) => {
                if let Some(fixed) = type_info.type_id.fixed_size() {
                    if value.len() != fixed {
                        return Err(invalid(format!(
                            "expected {fixed} bytes, got {}",
                            value.len()
                        )));
                    }
                }
            }
            (Some(value), LengthPrefix::Byte | LengthPrefix::UShort) => {
                if type_info.type_id.has_exact_size() && value.len() != type_info.size as usize {
                    return Err(invalid(format!(
                        "expected {} bytes, got {}",
                        type_info.size,
                        value.len()
                    )));
                }
                if value.len() > type_info.size as usize {
                    return Err(invalid(format!(
                        "{} bytes exceed declared size {}",
                        value.len(),
                        type_info.size
                    )));
                }
            }
            (Some(value), LengthPrefix::Long) => {
                if value.len() > i32::MAX as usize {
                    return Err(ProtocolError::TooLong {
                        what: "LONGLEN value",
                        len: value.len(),
                        max: i32::MAX as usize,
                    });
                }
            }
            (Some(_), LengthPrefix::Plp) => {}
        }

        if type_info.size > 0xFF && prefix == LengthPrefix::Byte {
            return Err(invalid(format!(
                "size {} does not fit a byte length",
                type_info.size
            )));
        }

        Ok(Self {
            type_info,
            flags: ParamFlags::empty(),
            buffer,
        })
    }

    /// Create a NULL parameter of the given type.
    pub fn null(type_info: ParamType) -> Result<Self, ProtocolError> {
        Self::new(type_info, None)
    }

    /// Create an NVARCHAR parameter holding `value` as UTF-16LE.
    pub fn nvarchar(value: &str) -> Self {
        let byte_len = utf16_byte_len(value);
        let mut buf = BytesMut::with_capacity(byte_len);
        write_utf16_string(&mut buf, value);
        // Lengths beyond i32 are clamped; they select PLP framing either way.
        let size = i32::try_from(byte_len).unwrap_or(i32::MAX);
        Self {
            type_info: ParamType::nvarchar(size),
            flags: ParamFlags::empty(),
            buffer: Some(buf.freeze()),
        }
    }

    /// Mark as output parameter.
    #[must_use]
    pub fn output(mut self) -> Self {
        self.flags |= ParamFlags::BY_REF_VALUE;
        self
    }

    /// Check if the parameter is bound for return-value retrieval.
    #[must_use]
    pub fn is_output(&self) -> bool {
        self.flags.contains(ParamFlags::BY_REF_VALUE)
    }

    /// Declared type.
    #[must_use]
    pub fn type_info(&self) -> &ParamType {
        &self.type_info
    }

    /// Wire type identifier.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_info.type_id
    }

    /// Declared size in bytes.
    #[must_use]
    pub fn size(&self) -> i32 {
        self.type_info.size
    }

    /// Declared scale.
    #[must_use]
    pub fn scale(&self) -> u8 {
        self.type_info.scale
    }

    /// Status flags.
    #[must_use]
    pub fn flags(&self) -> ParamFlags {
        self.flags
    }

    /// Raw value bytes, `None` for NULL.
    #[must_use]
    pub fn buffer(&self) -> Option<&Bytes> {
        self.buffer.as_ref()
    }

    /// Check if the value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.buffer.is_none()
    }

    /// The type as written in an `sp_executesql` parameter declaration.
    pub fn declaration(&self) -> String {
        let decl = self.type_info.declaration();
        if self.is_output() {
            format!("{decl} output")
        } else {
            decl
        }
    }

    /// Encode the parameter, including its name, to buffer.
    pub fn encode(&self, name: &str, buf: &mut BytesMut) -> Result<(), ProtocolError> {
        write_b_varchar(buf, name)?;
        buf.put_u8(self.flags.bits());
        self.type_info.encode(buf)?;

        let prefix = self.type_info.length_prefix();
        match (&self.buffer, prefix) {
            (None, LengthPrefix::None) => {}
            (None, LengthPrefix::Byte) => buf.put_u8(0),
            (None, LengthPrefix::UShort) => buf.put_u16_le(0xFFFF),
            (None, LengthPrefix::Long) => buf.put_u32_le(0xFFFF_FFFF),
            (None, LengthPrefix::Plp) => buf.put_u64_le(0xFFFF_FFFF_FFFF_FFFF),
            (Some(value), LengthPrefix::None) => buf.put_slice(value),
            (Some(value), LengthPrefix::Byte) => {
                buf.put_u8(value.len() as u8);
                buf.put_slice(value);
            }
            (Some(value), LengthPrefix::UShort) => {
                buf.put_u16_le(value.len() as u16);
                buf.put_slice(value);
            }
            (Some(value), LengthPrefix::Long) => {
                buf.put_u32_le(value.len() as u32);
                buf.put_slice(value);
            }
            (Some(value), LengthPrefix::Plp) => {
                // Single chunk followed by the terminator.
                buf.put_u64_le(value.len() as u64);
                if !value.is_empty() {
                    let chunk = u32::try_from(value.len()).map_err(|_| ProtocolError::TooLong {
                        what: "PLP chunk",
                        len: value.len(),
                        max: u32::MAX as usize,
                    })?;
                    buf.put_u32_le(chunk);
                    buf.put_slice(value);
                }
                buf.put_u32_le(0);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_param_flags_bits() {
        assert_eq!(ParamFlags::BY_REF_VALUE.bits(), 0x01);
        assert_eq!((ParamFlags::BY_REF_VALUE | ParamFlags::ENCRYPTED).bits(), 0x09);
    }

    #[test]
    fn test_output_sets_by_ref() {
        let param = ParamDescriptor::nvarchar("x");
        assert!(!param.is_output());
        let param = param.output();
        assert!(param.is_output());
        assert_eq!(param.flags(), ParamFlags::BY_REF_VALUE);
    }

    #[test]
    fn test_fixed_size_mismatch_rejected() {
        let err = ParamDescriptor::new(
            ParamType::new(TypeId::Int4, 4),
            Some(Bytes::from_static(&[1, 2])),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidParameter {
                type_id: TypeId::Int4,
                ..
            }
        ));
    }

    #[test]
    fn test_buffer_larger_than_size_rejected() {
        let result = ParamDescriptor::new(
            ParamType::datetimen(8),
            Some(Bytes::from_static(&[0; 9])),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_short_fixed_format_buffer_rejected() {
        let err = ParamDescriptor::new(
            ParamType::datetimen(8),
            Some(Bytes::from_static(&[0; 3])),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidParameter {
                type_id: TypeId::DateTimeN,
                ..
            }
        ));

        assert!(ParamDescriptor::new(ParamType::guid(), Some(Bytes::from_static(&[0; 5]))).is_err());
        assert!(ParamDescriptor::new(ParamType::intn(4), Some(Bytes::from_static(&[1, 0]))).is_err());
        assert!(
            ParamDescriptor::new(ParamType::datetimeoffsetn(7), Some(Bytes::from_static(&[0; 8])))
                .is_err()
        );
    }

    #[test]
    fn test_variable_length_buffer_may_be_shorter() {
        let param = ParamDescriptor::new(
            ParamType::big_varbinary(10),
            Some(Bytes::from_static(&[1, 2, 3])),
        );
        assert!(param.is_ok());
    }

    #[test]
    fn test_negative_size_rejected() {
        assert!(ParamDescriptor::null(ParamType::big_varchar(-1)).is_err());
    }

    #[test]
    fn test_fixed_type_null_rejected() {
        assert!(ParamDescriptor::null(ParamType::new(TypeId::Int4, 4)).is_err());
        assert!(ParamDescriptor::null(ParamType::intn(4)).is_ok());
    }

    #[test]
    fn test_declarations() {
        assert_eq!(ParamType::big_varchar(12).declaration(), "varchar(12)");
        assert_eq!(ParamType::big_varchar(0).declaration(), "varchar(max)");
        assert_eq!(ParamType::big_varchar(9000).declaration(), "varchar(max)");
        assert_eq!(ParamType::nvarchar(10).declaration(), "nvarchar(5)");
        assert_eq!(ParamType::datetimen(8).declaration(), "datetime");
        assert_eq!(ParamType::datetimeoffsetn(7).declaration(), "datetimeoffset(7)");
        assert_eq!(ParamType::intn(8).declaration(), "bigint");
        assert_eq!(ParamType::decimaln(38, 4).declaration(), "decimal(38, 4)");
    }

    #[test]
    fn test_output_declaration() {
        let param = ParamDescriptor::new(ParamType::intn(4), Some(Bytes::from_static(&[1, 0, 0, 0])))
            .unwrap()
            .output();
        assert_eq!(param.declaration(), "int output");
    }

    #[test]
    fn test_encode_datetimen() {
        let param = ParamDescriptor::new(
            ParamType::datetimen(8),
            Some(Bytes::from_static(&[1, 0, 0, 0, 2, 0, 0, 0])),
        )
        .unwrap();
        let mut buf = BytesMut::new();
        param.encode("@d", &mut buf).unwrap();
        assert_eq!(
            &buf[..],
            &[
                2, b'@', 0, b'd', 0, // name
                0x00, // flags
                0x6F, 8, // TYPE_INFO
                8, 1, 0, 0, 0, 2, 0, 0, 0, // value
            ]
        );
    }

    #[test]
    fn test_encode_datetimeoffset_type_info_has_scale_only() {
        let param = ParamDescriptor::new(
            ParamType::datetimeoffsetn(7),
            Some(Bytes::from_static(&[0; 10])),
        )
        .unwrap()
        .output();
        let mut buf = BytesMut::new();
        param.encode("", &mut buf).unwrap();
        assert_eq!(&buf[..5], &[0, 0x01, 0x2B, 7, 10]);
        assert_eq!(buf.len(), 5 + 10);
    }

    #[test]
    fn test_encode_big_varchar_with_collation() {
        let param = ParamDescriptor::new(
            ParamType::big_varchar(2),
            Some(Bytes::from_static(b"hi")),
        )
        .unwrap();
        let mut buf = BytesMut::new();
        param.encode("", &mut buf).unwrap();
        assert_eq!(
            &buf[..],
            &[0, 0, 0xA7, 2, 0, 0x09, 0x04, 0xD0, 0x00, 0x34, 2, 0, b'h', b'i']
        );
    }

    #[test]
    fn test_encode_empty_varchar_as_plp() {
        let param =
            ParamDescriptor::new(ParamType::big_varchar(0), Some(Bytes::new())).unwrap();
        let mut buf = BytesMut::new();
        param.encode("", &mut buf).unwrap();
        // name, flags, type, 0xFFFF, collation, PLP length 0, terminator
        assert_eq!(&buf[3..5], &[0xFF, 0xFF]);
        assert_eq!(&buf[10..], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_nulls() {
        let mut buf = BytesMut::new();
        ParamDescriptor::null(ParamType::intn(4))
            .unwrap()
            .encode("", &mut buf)
            .unwrap();
        assert_eq!(&buf[..], &[0, 0, 0x26, 4, 0]);

        let mut buf = BytesMut::new();
        ParamDescriptor::null(ParamType::nvarchar(2))
            .unwrap()
            .encode("", &mut buf)
            .unwrap();
        assert_eq!(&buf[buf.len() - 2..], &[0xFF, 0xFF]);
    }

    proptest! {
        #[test]
        fn prop_short_varchar_value_is_length_prefixed(s in "[a-z]{1,200}") {
            let len = s.len() as i32;
            let param = ParamDescriptor::new(
                ParamType::big_varchar(len),
                Some(Bytes::copy_from_slice(s.as_bytes())),
            ).unwrap();
            let mut buf = BytesMut::new();
            param.encode("", &mut buf).unwrap();
            // name(1) + flags(1) + type(1) + size(2) + collation(5)
            let value = &buf[10..];
            prop_assert_eq!(u16::from_le_bytes([value[0], value[1]]) as usize, s.len());
            prop_assert_eq!(&value[2..], s.as_bytes());
        }
    }
}
