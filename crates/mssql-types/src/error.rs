//! Type conversion error types.

use thiserror::Error;

/// Errors that can occur while converting or encoding values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TypeError {
    /// Value is out of range for target type.
    #[error("value out of range for {target_type}: {detail}")]
    OutOfRange {
        /// Target type name.
        target_type: &'static str,
        /// What was out of range.
        detail: String,
    },

    /// Unsupported type conversion.
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion {
        /// Source type.
        from: String,
        /// Target type.
        to: &'static str,
    },

    /// The encoded value violates the wire layout of its type.
    #[error("wire encoding failed: {0}")]
    Protocol(#[from] tds_protocol::ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &TypeError) -> &'static str {
        match err {
            TypeError::OutOfRange { .. } => "out of range",
            TypeError::UnsupportedConversion { .. } => "unsupported",
            TypeError::Protocol(_) => "protocol",
        }
    }

    #[test]
    fn test_error_messages() {
        let err = TypeError::OutOfRange {
            target_type: "BIGINT",
            detail: "18446744073709551615 exceeds i64::MAX".to_string(),
        };
        assert_eq!(kind(&err), "out of range");
        assert_eq!(
            err.to_string(),
            "value out of range for BIGINT: 18446744073709551615 exceeds i64::MAX"
        );

        let err = TypeError::UnsupportedConversion {
            from: "Point".to_string(),
            to: "SqlValue",
        };
        assert_eq!(kind(&err), "unsupported");
        assert_eq!(err.to_string(), "unsupported conversion from Point to SqlValue");
    }
}
