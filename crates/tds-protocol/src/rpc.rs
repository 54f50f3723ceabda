//! RPC (Remote Procedure Call) request encoding.
//!
//! Bound parameters reach the server as an `sp_executesql` RPC request
//! (packet type 0x03): the statement text, the parameter declarations and
//! then every parameter descriptor in binding order.
//!
//! ## Wire Format
//!
//! ```text
//! RPC Request:
//! +-------------------+
//! | ALL_HEADERS       | (TDS 7.2+)
//! +-------------------+
//! | ProcName/ProcID   | (procedure identifier)
//! +-------------------+
//! | Option Flags      | (2 bytes)
//! +-------------------+
//! | Parameters        | (repeated)
//! +-------------------+
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::ProtocolError;
use crate::param::ParamDescriptor;
use crate::prelude::*;

/// Well-known stored procedure IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ProcId {
    /// sp_executesql (0x000A) - parameterized statements
    ExecuteSql = 0x000A,
}

/// RPC option flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcOptionFlags {
    /// Recompile the procedure.
    pub with_recompile: bool,
    /// No metadata in response.
    pub no_metadata: bool,
}

impl RpcOptionFlags {
    /// Encode to wire format (2 bytes).
    pub fn encode(&self) -> u16 {
        let mut flags = 0u16;
        if self.with_recompile {
            flags |= 0x0001;
        }
        if self.no_metadata {
            flags |= 0x0002;
        }
        flags
    }
}

/// A named parameter inside an RPC request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcParam {
    /// Parameter name, empty for positional system parameters.
    pub name: String,
    /// Encoded parameter.
    pub descriptor: ParamDescriptor,
}

/// RPC request builder.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    proc_id: ProcId,
    options: RpcOptionFlags,
    params: Vec<RpcParam>,
}

impl RpcRequest {
    /// Create an `sp_executesql` request.
    ///
    /// `params` must already carry their final (`@`-prefixed) names and are
    /// sent in the given order.
    pub fn execute_sql(sql: &str, params: Vec<RpcParam>) -> Self {
        let mut all = Vec::with_capacity(params.len() + 2);
        all.push(RpcParam {
            name: String::new(),
            descriptor: ParamDescriptor::nvarchar(sql),
        });

        if !params.is_empty() {
            all.push(RpcParam {
                name: String::new(),
                descriptor: ParamDescriptor::nvarchar(&Self::declarations(&params)),
            });
        }

        all.extend(params);

        Self {
            proc_id: ProcId::ExecuteSql,
            options: RpcOptionFlags::default(),
            params: all,
        }
    }

    /// Build the parameter declaration string, e.g. `@p1 int, @p2 varchar(5)`.
    pub fn declarations(params: &[RpcParam]) -> String {
        params
            .iter()
            .map(|p| format!("{} {}", p.name, p.descriptor.declaration()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Set option flags.
    #[must_use]
    pub fn with_options(mut self, options: RpcOptionFlags) -> Self {
        self.options = options;
        self
    }

    /// Procedure invoked by this request.
    #[must_use]
    pub fn proc_id(&self) -> ProcId {
        self.proc_id
    }

    /// All parameters, including the statement and declaration parameters.
    #[must_use]
    pub fn params(&self) -> &[RpcParam] {
        &self.params
    }

    /// Encode the RPC request in auto-commit mode.
    pub fn encode(&self) -> Result<Bytes, ProtocolError> {
        self.encode_with_transaction(0)
    }

    /// Encode the RPC request with a transaction descriptor (0 for auto-commit).
    pub fn encode_with_transaction(
        &self,
        transaction_descriptor: u64,
    ) -> Result<Bytes, ProtocolError> {
        let mut buf = BytesMut::with_capacity(256);

        // ALL_HEADERS: total length + transaction descriptor header
        buf.put_u32_le(22);
        buf.put_u32_le(18);
        buf.put_u16_le(0x0002);
        buf.put_u64_le(transaction_descriptor);
        buf.put_u32_le(1); // outstanding request count

        // 0xFFFF name length selects the PROCID form
        buf.put_u16_le(0xFFFF);
        buf.put_u16_le(self.proc_id as u16);

        buf.put_u16_le(self.options.encode());

        for param in &self.params {
            param.descriptor.encode(&param.name, &mut buf)?;
        }

        Ok(buf.freeze())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::param::ParamType;

    fn int_param(name: &str, value: i32) -> RpcParam {
        RpcParam {
            name: name.to_string(),
            descriptor: ParamDescriptor::new(
                ParamType::intn(4),
                Some(Bytes::copy_from_slice(&value.to_le_bytes())),
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_option_flags_encode() {
        let flags = RpcOptionFlags {
            with_recompile: true,
            ..Default::default()
        };
        assert_eq!(flags.encode(), 0x0001);
    }

    #[test]
    fn test_execute_sql_request() {
        let rpc = RpcRequest::execute_sql(
            "SELECT * FROM users WHERE id = @p1",
            vec![int_param("@p1", 42)],
        );

        assert_eq!(rpc.proc_id(), ProcId::ExecuteSql);
        // statement + declarations + actual params
        assert_eq!(rpc.params().len(), 3);
    }

    #[test]
    fn test_execute_sql_without_params() {
        let rpc = RpcRequest::execute_sql("SELECT 1", vec![]);
        assert_eq!(rpc.params().len(), 1);
    }

    #[test]
    fn test_declarations_include_output() {
        let mut out = int_param("@ret", 0);
        out.descriptor = out.descriptor.output();
        let decls = RpcRequest::declarations(&[int_param("@p1", 1), out]);
        assert_eq!(decls, "@p1 int, @ret int output");
    }

    #[test]
    fn test_encode_header_and_proc_id() {
        let rpc = RpcRequest::execute_sql("SELECT 1", vec![]);
        let encoded = rpc.encode().unwrap();
        assert_eq!(&encoded[..4], &22u32.to_le_bytes());
        assert_eq!(&encoded[22..24], &[0xFF, 0xFF]);
        assert_eq!(&encoded[24..26], &[0x0A, 0x00]);
    }
}
