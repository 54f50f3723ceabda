//! # mssql-types
//!
//! Parameter values for SQL Server and their TDS encodings.
//!
//! A bound parameter is either a plain [`SqlValue`], produced from ordinary
//! Rust values through [`ToSql`], or a [`TypedValue`] that pins the wire
//! type explicitly. Both encode to a [`tds_protocol::ParamDescriptor`].
//!
//! ## Features
//!
//! - `chrono` (default): Enable date/time type support via chrono
//! - `uuid` (default): Enable UUID type support
//! - `decimal` (default): Enable decimal type support via rust_decimal
//! - `json`: Enable JSON type support via serde_json
//!
//! ## Type Mappings
//!
//! | Rust Type | Value | SQL Server Type |
//! |-----------|-------|-----------------|
//! | `bool` | `SqlValue::Bool` | `BIT` |
//! | `u8` | `SqlValue::TinyInt` | `TINYINT` |
//! | `i16` | `SqlValue::SmallInt` | `SMALLINT` |
//! | `i32` | `SqlValue::Int` | `INT` |
//! | `i64` | `SqlValue::BigInt` | `BIGINT` |
//! | `f32` | `SqlValue::Float` | `REAL` |
//! | `f64` | `SqlValue::Double` | `FLOAT` |
//! | `String` | `SqlValue::String` | `NVARCHAR` |
//! | `Vec<u8>` | `SqlValue::Binary` | `VARBINARY` |
//! | `rust_decimal::Decimal` | `SqlValue::Decimal` | `DECIMAL(38, s)` |
//! | `uuid::Uuid` | `SqlValue::Uuid` | `UNIQUEIDENTIFIER` |
//! | `chrono::NaiveDate` | `SqlValue::Date` | `DATE` |
//! | `chrono::NaiveTime` | `SqlValue::Time` | `TIME(7)` |
//! | `chrono::NaiveDateTime` | `SqlValue::DateTime` | `DATETIME2(7)` |
//! | `chrono::DateTime<Tz>` | `SqlValue::DateTimeOffset` | `DATETIMEOFFSET(7)` |
//! | `String` | `TypedValue::VarChar` | `VARCHAR(n)` |
//! | `chrono::DateTime<Tz>` | `TypedValue::DateTime1` | `DATETIME` |
//!
//! ## Example
//!
//! ```rust
//! use mssql_types::{encode_typed, TypedValue};
//!
//! let param = encode_typed(&TypedValue::varchar("abc")).unwrap();
//! assert_eq!(param.declaration(), "varchar(3)");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod encode;
pub mod error;
#[cfg(feature = "chrono")]
pub mod temporal;
pub mod to_sql;
pub mod typed;
pub mod value;

pub use encode::{encode_typed, encode_value, TdsEncode};
pub use error::TypeError;
pub use to_sql::ToSql;
pub use typed::TypedValue;
pub use value::SqlValue;
