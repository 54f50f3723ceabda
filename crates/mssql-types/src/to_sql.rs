//! Default conversion of Rust values into plain driver values.

use bytes::Bytes;

use crate::error::TypeError;
use crate::value::SqlValue;

/// Trait for types that can be converted to SQL values.
///
/// This is the default parameter conversion: it maps an arbitrary Rust value
/// onto one of the plain scalars in [`SqlValue`]. Conversion may fail, for
/// instance for unsigned integers beyond `BIGINT`.
pub trait ToSql {
    /// Convert this value to a SQL value.
    fn to_sql(&self) -> Result<SqlValue, TypeError>;

    /// Get the SQL type name for this value.
    fn sql_type(&self) -> &'static str;
}

macro_rules! impl_to_sql {
    ($($ty:ty => $variant:ident as $sql:literal),* $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> Result<SqlValue, TypeError> {
                    Ok(SqlValue::$variant((*self).into()))
                }

                fn sql_type(&self) -> &'static str {
                    $sql
                }
            }
        )*
    };
}

impl_to_sql! {
    bool => Bool as "BIT",
    u8 => TinyInt as "TINYINT",
    i8 => SmallInt as "SMALLINT",
    i16 => SmallInt as "SMALLINT",
    u16 => Int as "INT",
    i32 => Int as "INT",
    u32 => BigInt as "BIGINT",
    i64 => BigInt as "BIGINT",
    f32 => Float as "REAL",
    f64 => Double as "FLOAT",
}

impl ToSql for u64 {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        i64::try_from(*self)
            .map(SqlValue::BigInt)
            .map_err(|_| TypeError::OutOfRange {
                target_type: "BIGINT",
                detail: format!("{self} has the high bit set"),
            })
    }

    fn sql_type(&self) -> &'static str {
        "BIGINT"
    }
}

impl ToSql for str {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::String(self.to_owned()))
    }

    fn sql_type(&self) -> &'static str {
        "NVARCHAR"
    }
}

impl ToSql for String {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        self.as_str().to_sql()
    }

    fn sql_type(&self) -> &'static str {
        "NVARCHAR"
    }
}

impl ToSql for [u8] {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::Binary(Bytes::copy_from_slice(self)))
    }

    fn sql_type(&self) -> &'static str {
        "VARBINARY"
    }
}

impl ToSql for Vec<u8> {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        self.as_slice().to_sql()
    }

    fn sql_type(&self) -> &'static str {
        "VARBINARY"
    }
}

impl ToSql for Bytes {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::Binary(self.clone()))
    }

    fn sql_type(&self) -> &'static str {
        "VARBINARY"
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(self.clone())
    }

    fn sql_type(&self) -> &'static str {
        self.type_name()
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        match self {
            Some(v) => v.to_sql(),
            None => Ok(SqlValue::Null),
        }
    }

    fn sql_type(&self) -> &'static str {
        match self {
            Some(v) => v.sql_type(),
            None => "NULL",
        }
    }
}

impl<T: ToSql + ?Sized> ToSql for &T {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        (*self).to_sql()
    }

    fn sql_type(&self) -> &'static str {
        (*self).sql_type()
    }
}

#[cfg(feature = "uuid")]
impl_to_sql! {
    uuid::Uuid => Uuid as "UNIQUEIDENTIFIER",
}

#[cfg(feature = "decimal")]
impl_to_sql! {
    rust_decimal::Decimal => Decimal as "DECIMAL",
}

#[cfg(feature = "chrono")]
impl_to_sql! {
    chrono::NaiveDate => Date as "DATE",
    chrono::NaiveTime => Time as "TIME",
    chrono::NaiveDateTime => DateTime as "DATETIME2",
    chrono::DateTime<chrono::FixedOffset> => DateTimeOffset as "DATETIMEOFFSET",
    chrono::DateTime<chrono::Utc> => DateTimeOffset as "DATETIMEOFFSET",
}

#[cfg(feature = "json")]
impl ToSql for serde_json::Value {
    fn to_sql(&self) -> Result<SqlValue, TypeError> {
        Ok(SqlValue::Json(self.clone()))
    }

    fn sql_type(&self) -> &'static str {
        "NVARCHAR(MAX)"
    }
}
