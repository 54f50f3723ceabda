//! UTF-16 helpers shared by the RPC encoders.
//!
//! SQL Server identifiers and NVARCHAR payloads travel as UTF-16LE. These
//! helpers write them with or without the B_VARCHAR length prefix used
//! by the RPC request layout.

use bytes::BufMut;

use crate::error::ProtocolError;

/// Write a UTF-16LE string prefixed by its length in code units (1 byte).
///
/// Used for RPC parameter names. Names longer than 255 code units cannot be
/// represented and are rejected rather than truncated.
pub fn write_b_varchar(dst: &mut impl BufMut, s: &str) -> Result<(), ProtocolError> {
    let len = s.encode_utf16().count();
    let len = u8::try_from(len).map_err(|_| ProtocolError::TooLong {
        what: "B_VARCHAR",
        len,
        max: u8::MAX as usize,
    })?;
    dst.put_u8(len);
    write_utf16_string(dst, s);
    Ok(())
}

/// Write a UTF-16LE string without length prefix.
pub fn write_utf16_string(dst: &mut impl BufMut, s: &str) {
    for c in s.encode_utf16() {
        dst.put_u16_le(c);
    }
}

/// Calculate the byte length of a UTF-16 encoded string.
#[must_use]
pub fn utf16_byte_len(s: &str) -> usize {
    s.encode_utf16().count() * 2
}
