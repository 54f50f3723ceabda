//! # tds-protocol
//!
//! Wire-level building blocks of the MS-TDS (Tabular Data Stream) protocol
//! needed to send parameterized requests to Microsoft SQL Server.
//!
//! This crate provides the closed catalog of TDS type identifiers, the
//! protocol-ready parameter descriptor produced for each bound value, and
//! the RPC request encoding (`sp_executesql`) that carries those
//! descriptors to the server.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `alloc`: Enable allocation without full std (requires `alloc` crate)
//!
//! ## Design Philosophy
//!
//! This crate is intentionally IO-agnostic. It contains no networking logic and
//! makes no assumptions about the async runtime. Higher-level crates build upon
//! this foundation to classify and encode caller values.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use tds_protocol::{ParamDescriptor, ParamType};
//!
//! let param = ParamDescriptor::new(
//!     ParamType::big_varchar(5),
//!     Some(Bytes::from_static(b"hello")),
//! )
//! .unwrap()
//! .output();
//!
//! assert!(param.is_output());
//! assert_eq!(param.declaration(), "varchar(5)");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod codec;
pub mod error;
pub mod param;
mod prelude;
pub mod rpc;
pub mod types;

pub use error::ProtocolError;
pub use param::{
    time_len, ParamDescriptor, ParamFlags, ParamType, DEFAULT_COLLATION, DEFAULT_TIME_SCALE,
};
pub use rpc::{ProcId, RpcOptionFlags, RpcParam, RpcRequest};
pub use types::{LengthPrefix, TypeId, MAX_SHORT_LEN};
