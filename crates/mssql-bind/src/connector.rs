//! Connectors and connections.
//!
//! A [`Connector`] is built once with its configuration and extended type
//! handlers and is immutable afterwards. Every [`Connection`] derived from
//! it shares the same handlers; each [`Statement`] prepared on a connection
//! owns its own output bindings.

use std::sync::Arc;

use crate::config::BindConfig;
use crate::extended::{ExtendedType, ExtendedTypes};
use crate::statement::Statement;

/// Builder for [`Connector`].
#[derive(Default)]
pub struct ConnectorBuilder {
    config: BindConfig,
    handlers: Vec<Arc<dyn ExtendedType>>,
}

impl ConnectorBuilder {
    /// Create a builder with the default configuration and no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the binding configuration.
    #[must_use]
    pub fn config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an extended type handler.
    ///
    /// Handlers are consulted in registration order.
    #[must_use]
    pub fn register<H: ExtendedType + 'static>(self, handler: H) -> Self {
        self.register_arc(Arc::new(handler))
    }

    /// Register a shared extended type handler.
    #[must_use]
    pub fn register_arc(mut self, handler: Arc<dyn ExtendedType>) -> Self {
        tracing::debug!(handler = handler.name(), "registering extended type");
        self.handlers.push(handler);
        self
    }

    /// Build the connector.
    #[must_use]
    pub fn build(self) -> Connector {
        Connector {
            inner: Arc::new(Shared {
                config: self.config,
                registry: ExtendedTypes::new(self.handlers),
            }),
        }
    }
}

#[derive(Debug)]
struct Shared {
    config: BindConfig,
    registry: ExtendedTypes,
}

/// Immutable, cheaply cloneable source of connections.
#[derive(Debug, Clone)]
pub struct Connector {
    inner: Arc<Shared>,
}

impl Default for Connector {
    fn default() -> Self {
        ConnectorBuilder::new().build()
    }
}

impl Connector {
    /// Start building a connector.
    #[must_use]
    pub fn builder() -> ConnectorBuilder {
        ConnectorBuilder::new()
    }

    /// Open a logical connection sharing this connector's handlers.
    #[must_use]
    pub fn connect(&self) -> Connection {
        Connection {
            shared: Arc::clone(&self.inner),
        }
    }

    /// Binding configuration.
    #[must_use]
    pub fn config(&self) -> &BindConfig {
        &self.inner.config
    }

    /// Registered extended type handlers.
    #[must_use]
    pub fn extended_types(&self) -> &ExtendedTypes {
        &self.inner.registry
    }
}

/// A connection's view of parameter binding.
#[derive(Debug, Clone)]
pub struct Connection {
    shared: Arc<Shared>,
}

impl Connection {
    /// Prepare a statement execution context for `sql`.
    #[must_use]
    pub fn prepare(&self, sql: impl Into<String>) -> Statement {
        Statement::new(
            sql.into(),
            self.shared.config.clone(),
            self.shared.registry.clone(),
        )
    }

    /// Registered extended type handlers.
    #[must_use]
    pub fn extended_types(&self) -> &ExtendedTypes {
        &self.shared.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extended::{HandlerResult, Verdict};
    use crate::value::ParamValue;
    use tds_protocol::ParamDescriptor;

    struct Noop;

    impl ExtendedType for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn check(&self, _: &ParamValue) -> HandlerResult<Verdict> {
            Ok(Verdict::Skip)
        }

        fn encode(&self, _: &ParamValue) -> HandlerResult<Option<ParamDescriptor>> {
            Ok(None)
        }
    }

    #[test]
    fn test_connections_share_handlers() {
        let connector = Connector::builder().register(Noop).register(Noop).build();
        let a = connector.connect();
        let b = connector.clone().connect();
        assert_eq!(a.extended_types().len(), 2);
        assert_eq!(b.extended_types().names().collect::<Vec<_>>(), ["noop", "noop"]);
    }

    #[test]
    fn test_config_reaches_statements() {
        let connector = Connector::builder()
            .config(BindConfig::new().max_parameters(3))
            .build();
        assert_eq!(connector.config().max_parameters, 3);
        let stmt = connector.connect().prepare("SELECT 1");
        assert_eq!(stmt.sql(), "SELECT 1");
    }

    #[test]
    fn test_connector_usable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Connector>();
        assert_send_sync::<Connection>();

        let connector = Connector::builder().register(Noop).build();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let connector = connector.clone();
                std::thread::spawn(move || connector.connect().extended_types().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }

    #[test]
    fn test_default_connector_has_no_handlers() {
        assert!(Connector::default().extended_types().is_empty());
    }
}
