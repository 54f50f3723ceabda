//! # mssql-bind
//!
//! Parameter binding for SQL Server statements.
//!
//! This crate turns the values a caller binds to a statement into encoded
//! RPC parameters:
//!
//! - plain [`SqlValue`]s are encoded with their inferred SQL type
//! - [`TypedValue`]s select an explicit wire type (`varchar`, legacy
//!   `datetime`, `datetimeoffset`)
//! - [`Output`] wraps the input value of an `OUTPUT` parameter and the
//!   [`OutputSlot`] receiving its return value
//! - [`CustomValue`]s are handed to the [`ExtendedType`] handlers registered
//!   on the [`Connector`], or fall back to their own conversion
//!
//! ## Example
//!
//! ```rust
//! use mssql_bind::{
//!     Connector, NamedValue, Output, OutputSlot, RpcRequest, SqlValue, TypedValue,
//! };
//!
//! let connector = Connector::builder().build();
//! let stmt = connector.connect().prepare("EXEC dbo.lookup @code, @name OUTPUT");
//!
//! let name = OutputSlot::new();
//! let bound = stmt
//!     .bind([
//!         NamedValue::new("code", TypedValue::varchar("ABC")),
//!         NamedValue::new("name", Output::new(SqlValue::Null, &name)),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(
//!     RpcRequest::declarations(bound.params()),
//!     "@code varchar(3), @name nvarchar(1) output"
//! );
//!
//! bound.deliver("@name", SqlValue::from("widget")).unwrap();
//! assert_eq!(name.get().as_str(), Some("widget"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod connector;
pub mod convert;
pub mod encode;
pub mod error;
pub mod extended;
pub mod named;
pub mod output;
pub mod statement;
pub mod validate;
pub mod value;

pub use config::{BindConfig, MAX_PARAMETERS};
pub use connector::{Connection, Connector, ConnectorBuilder};
pub use convert::default_convert;
pub use encode::make_param;
pub use error::{BoxError, Error, Result};
pub use extended::{ExtendedType, ExtendedTypes, HandlerResult, Verdict};
pub use named::{NamedValue, ParamList};
pub use output::{Output, OutputBindings, OutputSlot};
pub use statement::{BoundParams, Statement};
pub use validate::check_named_value;
pub use value::{CustomValue, ParamValue};

pub use mssql_types::{SqlValue, ToSql, TypeError, TypedValue};
pub use tds_protocol::{ParamDescriptor, RpcParam, RpcRequest};
