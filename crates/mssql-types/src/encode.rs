//! Parameter descriptors for values.
//!
//! Turns a [`SqlValue`] or a [`TypedValue`] into the protocol-ready
//! [`ParamDescriptor`] sent in an RPC request. Every call builds a fresh
//! descriptor, so encoding the same value twice yields equal results.

use bytes::{BufMut, Bytes, BytesMut};
use tds_protocol::{ParamDescriptor, ParamType, TypeId};

use crate::error::TypeError;
use crate::typed::TypedValue;
use crate::value::SqlValue;

/// Values that can be encoded as an RPC parameter.
pub trait TdsEncode {
    /// Build the parameter descriptor for this value.
    fn encode_param(&self) -> Result<ParamDescriptor, TypeError>;

    /// The TDS type the value is sent as.
    fn type_id(&self) -> TypeId;
}

impl TdsEncode for SqlValue {
    fn encode_param(&self) -> Result<ParamDescriptor, TypeError> {
        encode_value(self)
    }

    fn type_id(&self) -> TypeId {
        match self {
            SqlValue::Null | SqlValue::String(_) | SqlValue::Xml(_) => TypeId::NVarChar,
            #[cfg(feature = "json")]
            SqlValue::Json(_) => TypeId::NVarChar,
            SqlValue::Bool(_) => TypeId::BitN,
            SqlValue::TinyInt(_) | SqlValue::SmallInt(_) | SqlValue::Int(_) | SqlValue::BigInt(_) => {
                TypeId::IntN
            }
            SqlValue::Float(_) | SqlValue::Double(_) => TypeId::FloatN,
            SqlValue::Binary(_) => TypeId::BigVarBinary,
            #[cfg(feature = "decimal")]
            SqlValue::Decimal(_) => TypeId::DecimalN,
            #[cfg(feature = "uuid")]
            SqlValue::Uuid(_) => TypeId::Guid,
            #[cfg(feature = "chrono")]
            SqlValue::Date(_) => TypeId::DateN,
            #[cfg(feature = "chrono")]
            SqlValue::Time(_) => TypeId::TimeN,
            #[cfg(feature = "chrono")]
            SqlValue::DateTime(_) => TypeId::DateTime2N,
            #[cfg(feature = "chrono")]
            SqlValue::DateTimeOffset(_) => TypeId::DateTimeOffsetN,
        }
    }
}

impl TdsEncode for TypedValue {
    fn encode_param(&self) -> Result<ParamDescriptor, TypeError> {
        encode_typed(self)
    }

    fn type_id(&self) -> TypeId {
        match self {
            TypedValue::VarChar(_) => TypeId::BigVarChar,
            #[cfg(feature = "chrono")]
            TypedValue::DateTime1(_) => TypeId::DateTimeN,
            #[cfg(feature = "chrono")]
            TypedValue::DateTimeOffset(_) => TypeId::DateTimeOffsetN,
        }
    }
}

fn declared_len(target_type: &'static str, len: usize) -> Result<i32, TypeError> {
    i32::try_from(len).map_err(|_| TypeError::OutOfRange {
        target_type,
        detail: format!("{len} bytes exceed the maximum parameter length"),
    })
}

/// Encode an explicitly typed value.
///
/// - `VarChar`: `BigVarChar` sized to the string's byte length, value bytes
///   copied verbatim
/// - `DateTime1`: 8-byte `DateTimeN`
/// - `DateTimeOffset`: `DateTimeOffsetN` at scale 7 (10 bytes)
pub fn encode_typed(value: &TypedValue) -> Result<ParamDescriptor, TypeError> {
    match value {
        TypedValue::VarChar(s) => {
            let size = declared_len("VARCHAR", s.len())?;
            Ok(ParamDescriptor::new(
                ParamType::big_varchar(size),
                Some(Bytes::copy_from_slice(s.as_bytes())),
            )?)
        }
        #[cfg(feature = "chrono")]
        TypedValue::DateTime1(dt) => {
            let mut buf = BytesMut::with_capacity(8);
            crate::temporal::encode_datetime1(dt, &mut buf);
            Ok(ParamDescriptor::new(ParamType::datetimen(8), Some(buf.freeze()))?)
        }
        #[cfg(feature = "chrono")]
        TypedValue::DateTimeOffset(dt) => {
            let ty = ParamType::datetimeoffsetn(tds_protocol::DEFAULT_TIME_SCALE);
            let mut buf = BytesMut::with_capacity(ty.size as usize);
            crate::temporal::encode_datetimeoffset(dt, &mut buf)?;
            Ok(ParamDescriptor::new(ty, Some(buf.freeze()))?)
        }
    }
}

/// Encode a plain driver value with the SQL type inferred from it.
///
/// NULL is sent as an `NVARCHAR(1)` NULL, which SQL Server converts to any
/// target type.
pub fn encode_value(value: &SqlValue) -> Result<ParamDescriptor, TypeError> {
    let fixed = |ty: ParamType, bytes: &[u8]| -> Result<ParamDescriptor, TypeError> {
        Ok(ParamDescriptor::new(ty, Some(Bytes::copy_from_slice(bytes)))?)
    };

    match value {
        SqlValue::Null => Ok(ParamDescriptor::null(ParamType::nvarchar(2))?),
        SqlValue::Bool(v) => fixed(ParamType::bitn(), &[u8::from(*v)]),
        SqlValue::TinyInt(v) => fixed(ParamType::intn(1), &[*v]),
        SqlValue::SmallInt(v) => fixed(ParamType::intn(2), &v.to_le_bytes()),
        SqlValue::Int(v) => fixed(ParamType::intn(4), &v.to_le_bytes()),
        SqlValue::BigInt(v) => fixed(ParamType::intn(8), &v.to_le_bytes()),
        SqlValue::Float(v) => fixed(ParamType::floatn(4), &v.to_le_bytes()),
        SqlValue::Double(v) => fixed(ParamType::floatn(8), &v.to_le_bytes()),
        SqlValue::String(s) | SqlValue::Xml(s) => Ok(ParamDescriptor::nvarchar(s)),
        #[cfg(feature = "json")]
        SqlValue::Json(j) => Ok(ParamDescriptor::nvarchar(&j.to_string())),
        SqlValue::Binary(b) => {
            let size = declared_len("VARBINARY", b.len())?;
            Ok(ParamDescriptor::new(ParamType::big_varbinary(size), Some(b.clone()))?)
        }
        #[cfg(feature = "decimal")]
        SqlValue::Decimal(d) => {
            let mut buf = BytesMut::with_capacity(17);
            encode_decimal(*d, &mut buf);
            // rust_decimal scales stay within 0..=28
            let ty = ParamType::decimaln(38, d.scale() as u8);
            Ok(ParamDescriptor::new(ty, Some(buf.freeze()))?)
        }
        #[cfg(feature = "uuid")]
        SqlValue::Uuid(u) => {
            let mut buf = BytesMut::with_capacity(16);
            encode_uuid(*u, &mut buf);
            Ok(ParamDescriptor::new(ParamType::guid(), Some(buf.freeze()))?)
        }
        #[cfg(feature = "chrono")]
        SqlValue::Date(d) => {
            let mut buf = BytesMut::with_capacity(3);
            crate::temporal::encode_date(*d, &mut buf)?;
            Ok(ParamDescriptor::new(ParamType::daten(), Some(buf.freeze()))?)
        }
        #[cfg(feature = "chrono")]
        SqlValue::Time(t) => {
            let ty = ParamType::timen(tds_protocol::DEFAULT_TIME_SCALE);
            let mut buf = BytesMut::with_capacity(ty.size as usize);
            crate::temporal::encode_time(*t, &mut buf);
            Ok(ParamDescriptor::new(ty, Some(buf.freeze()))?)
        }
        #[cfg(feature = "chrono")]
        SqlValue::DateTime(dt) => {
            let ty = ParamType::datetime2n(tds_protocol::DEFAULT_TIME_SCALE);
            let mut buf = BytesMut::with_capacity(ty.size as usize);
            crate::temporal::encode_datetime2(*dt, &mut buf)?;
            Ok(ParamDescriptor::new(ty, Some(buf.freeze()))?)
        }
        #[cfg(feature = "chrono")]
        SqlValue::DateTimeOffset(dt) => encode_typed(&TypedValue::DateTimeOffset(*dt)),
    }
}

/// Encode a UUID in SQL Server's mixed-endian layout.
///
/// The first three groups are little-endian, the last eight bytes are kept
/// in order.
#[cfg(feature = "uuid")]
pub fn encode_uuid(uuid: uuid::Uuid, buf: &mut BytesMut) {
    let (d1, d2, d3, d4) = uuid.as_fields();
    buf.put_u32_le(d1);
    buf.put_u16_le(d2);
    buf.put_u16_le(d3);
    buf.put_slice(d4);
}

/// Encode a decimal as a sign byte (1 = positive) followed by the absolute
/// mantissa as a 16-byte little-endian integer.
#[cfg(feature = "decimal")]
pub fn encode_decimal(decimal: rust_decimal::Decimal, buf: &mut BytesMut) {
    buf.put_u8(u8::from(!decimal.is_sign_negative()));
    buf.put_u128_le(decimal.mantissa().unsigned_abs());
}
