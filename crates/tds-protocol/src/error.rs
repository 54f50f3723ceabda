//! Protocol-level error types.

use thiserror::Error;

use crate::prelude::*;
use crate::types::TypeId;

/// Errors raised while building or encoding protocol structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// A parameter buffer does not match the shape its type requires.
    #[error("invalid {type_id:?} parameter: {reason}")]
    InvalidParameter {
        /// Wire type of the offending parameter.
        type_id: TypeId,
        /// What is inconsistent.
        reason: String,
    },

    /// A value is too large to be represented on the wire.
    #[error("{what} too long: {len} exceeds {max}")]
    TooLong {
        /// Item being encoded.
        what: &'static str,
        /// Actual length.
        len: usize,
        /// Largest representable length.
        max: usize,
    },
}
