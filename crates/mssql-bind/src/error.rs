//! Binding error types.

use thiserror::Error;

/// Error type returned by extended type handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while validating or encoding parameters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The default conversion or a value encoder failed.
    #[error(transparent)]
    Type(#[from] mssql_types::TypeError),

    /// A descriptor violated the wire layout of its type.
    #[error("protocol error: {0}")]
    Protocol(#[from] tds_protocol::ProtocolError),

    /// No built-in rule, handler or conversion applies to the value.
    #[error("unsupported parameter type: {type_name}")]
    UnsupportedType {
        /// Runtime type name of the rejected value.
        type_name: String,
    },

    /// An extended type handler failed.
    #[error("extended type handler {handler} failed: {source}")]
    Handler {
        /// Name of the failing handler.
        handler: String,
        /// The handler's error.
        #[source]
        source: BoxError,
    },

    /// An output parameter wraps another output parameter.
    #[error("output parameter {name} wraps another output parameter")]
    NestedOutput {
        /// Parameter name.
        name: String,
    },

    /// More parameters than a single request can carry.
    #[error("too many parameters: {count} (max {max})")]
    TooManyParameters {
        /// Number of parameters supplied.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A return value arrived for a parameter that was not bound as output.
    #[error("no output parameter named {name}")]
    UnknownOutput {
        /// Parameter name reported by the server.
        name: String,
    },
}

impl Error {
    /// Check if the error was raised by an extended type handler.
    #[must_use]
    pub fn is_handler_error(&self) -> bool {
        matches!(self, Self::Handler { .. })
    }
}

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, Error>;
