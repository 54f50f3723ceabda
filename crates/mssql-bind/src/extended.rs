//! Pluggable handlers for caller-defined parameter types.
//!
//! Handlers are registered on a [`ConnectorBuilder`](crate::ConnectorBuilder)
//! and consulted in registration order. For both validation and encoding
//! the first handler that answers wins; a handler that does not recognize a
//! value skips it so the next one gets a chance.

use std::fmt;
use std::sync::Arc;

use tds_protocol::ParamDescriptor;

use crate::error::{BoxError, Error, Result};
use crate::value::ParamValue;

/// Outcome of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The value is acceptable as is.
    Accept,
    /// Not applicable; let the next handler or the default conversion try.
    Skip,
}

/// Result type returned by handlers.
pub type HandlerResult<T> = std::result::Result<T, BoxError>;

/// A handler recognizing and encoding caller-defined values.
///
/// `check` and `encode` are independent: `encode` may be called for a value
/// that never went through `check`.
pub trait ExtendedType: Send + Sync {
    /// Handler name, used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Decide whether the handler accepts `value`.
    fn check(&self, value: &ParamValue) -> HandlerResult<Verdict>;

    /// Encode `value`, or return `Ok(None)` to skip it.
    fn encode(&self, value: &ParamValue) -> HandlerResult<Option<ParamDescriptor>>;
}

/// Ordered, immutable list of extended type handlers.
///
/// Cloning is cheap; clones share the handlers.
#[derive(Clone, Default)]
pub struct ExtendedTypes {
    handlers: Arc<[Arc<dyn ExtendedType>]>,
}

impl ExtendedTypes {
    pub(crate) fn new(handlers: Vec<Arc<dyn ExtendedType>>) -> Self {
        Self {
            handlers: handlers.into(),
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|h| h.name())
    }

    /// Ask the handlers in order whether `value` is acceptable.
    ///
    /// Returns [`Verdict::Skip`] when no handler accepts it.
    pub fn check(&self, value: &ParamValue) -> Result<Verdict> {
        for handler in self.handlers.iter() {
            match handler.check(value) {
                Ok(Verdict::Accept) => {
                    tracing::debug!(handler = handler.name(), "extended type accepted value");
                    return Ok(Verdict::Accept);
                }
                Ok(Verdict::Skip) => {}
                Err(source) => return Err(handler_error(handler.as_ref(), source)),
            }
        }
        Ok(Verdict::Skip)
    }

    /// Let the first handler that answers encode `value`.
    ///
    /// Returns `None` when every handler skips it.
    pub fn encode(&self, value: &ParamValue) -> Result<Option<ParamDescriptor>> {
        for handler in self.handlers.iter() {
            match handler.encode(value) {
                Ok(Some(descriptor)) => {
                    tracing::debug!(handler = handler.name(), "extended type encoded value");
                    return Ok(Some(descriptor));
                }
                Ok(None) => {}
                Err(source) => return Err(handler_error(handler.as_ref(), source)),
            }
        }
        Ok(None)
    }
}

fn handler_error(handler: &dyn ExtendedType, source: BoxError) -> Error {
    tracing::warn!(handler = handler.name(), error = %source, "extended type handler failed");
    Error::Handler {
        handler: handler.name().to_string(),
        source,
    }
}

impl fmt::Debug for ExtendedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mssql_types::SqlValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        verdict: Verdict,
        calls: AtomicUsize,
    }

    impl Counting {
        fn new(verdict: Verdict) -> Arc<Self> {
            Arc::new(Self {
                verdict,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ExtendedType for Counting {
        fn check(&self, _: &ParamValue) -> HandlerResult<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.verdict)
        }

        fn encode(&self, _: &ParamValue) -> HandlerResult<Option<ParamDescriptor>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.verdict == Verdict::Accept).then(|| ParamDescriptor::nvarchar("x")))
        }
    }

    struct Failing;

    impl ExtendedType for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn check(&self, _: &ParamValue) -> HandlerResult<Verdict> {
            Err("bad value".into())
        }

        fn encode(&self, _: &ParamValue) -> HandlerResult<Option<ParamDescriptor>> {
            Err("bad value".into())
        }
    }

    #[test]
    fn test_empty_registry_skips() {
        let registry = ExtendedTypes::default();
        let value = ParamValue::Sql(SqlValue::Int(1));
        assert_eq!(registry.check(&value).unwrap(), Verdict::Skip);
        assert!(registry.encode(&value).unwrap().is_none());
    }

    #[test]
    fn test_first_acceptor_wins() {
        let skip = Counting::new(Verdict::Skip);
        let first = Counting::new(Verdict::Accept);
        let second = Counting::new(Verdict::Accept);
        let registry = ExtendedTypes::new(vec![
            skip.clone() as Arc<dyn ExtendedType>,
            first.clone() as Arc<dyn ExtendedType>,
            second.clone() as Arc<dyn ExtendedType>,
        ]);
        let value = ParamValue::default();

        assert_eq!(registry.check(&value).unwrap(), Verdict::Accept);
        assert!(registry.encode(&value).unwrap().is_some());

        assert_eq!(skip.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.calls.load(Ordering::SeqCst), 2);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_error_stops_traversal() {
        let after = Counting::new(Verdict::Accept);
        let registry = ExtendedTypes::new(vec![
            Arc::new(Failing) as Arc<dyn ExtendedType>,
            after.clone() as Arc<dyn ExtendedType>,
        ]);

        let err = registry.check(&ParamValue::default()).unwrap_err();
        assert!(matches!(&err, Error::Handler { handler, .. } if handler == "failing"));
        assert!(err.is_handler_error());
        assert_eq!(after.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_names_in_order() {
        let registry = ExtendedTypes::new(vec![
            Arc::new(Failing) as Arc<dyn ExtendedType>,
            Counting::new(Verdict::Skip) as Arc<dyn ExtendedType>,
        ]);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names[0], "failing");
        assert!(names[1].ends_with("Counting"));
        assert_eq!(registry.len(), 2);
    }
}
