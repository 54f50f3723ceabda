//! Parameter encoding.

use mssql_types::{encode_typed, encode_value};
use tds_protocol::ParamDescriptor;

use crate::error::{Error, Result};
use crate::extended::ExtendedTypes;
use crate::value::ParamValue;

/// Build the wire descriptor for an accepted parameter value.
///
/// - typed values use their fixed encodings
/// - output wrappers encode their input value and are flagged by-reference
/// - plain values are encoded with their inferred SQL type
/// - custom values must be claimed by a handler
pub fn make_param(registry: &ExtendedTypes, value: &ParamValue) -> Result<ParamDescriptor> {
    match value {
        ParamValue::Typed(typed) => Ok(encode_typed(typed)?),
        ParamValue::Output(output) => Ok(make_param(registry, output.value())?.output()),
        ParamValue::Sql(sql) => Ok(encode_value(sql)?),
        ParamValue::Custom(custom) => {
            registry.encode(value)?.ok_or_else(|| {
                tracing::warn!(type_name = custom.type_name(), "no handler encoded value");
                Error::UnsupportedType {
                    type_name: custom.type_name().to_string(),
                }
            })
        }
    }
}
