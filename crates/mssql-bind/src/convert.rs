//! Default parameter conversion.

use crate::error::{Error, Result};
use crate::value::ParamValue;

/// Convert a value nobody claimed into one the encoder understands.
///
/// Plain and typed values are already encodable and pass through. A custom
/// value is replaced by its [`ToSql`](mssql_types::ToSql) conversion when it
/// has one; otherwise it is unsupported. Output wrappers never reach this
/// point and are rejected.
pub fn default_convert(value: &ParamValue) -> Result<ParamValue> {
    match value {
        ParamValue::Sql(_) | ParamValue::Typed(_) => Ok(value.clone()),
        ParamValue::Custom(custom) => match custom.to_sql() {
            Some(converted) => Ok(ParamValue::Sql(converted?)),
            None => Err(Error::UnsupportedType {
                type_name: custom.type_name().to_string(),
            }),
        },
        ParamValue::Output(_) => Err(Error::UnsupportedType {
            type_name: value.type_name().to_string(),
        }),
    }
}
