//! Binding configuration.

/// Maximum number of parameters SQL Server accepts in one RPC request.
pub const MAX_PARAMETERS: usize = 2100;

/// Parameter binding configuration.
#[derive(Debug, Clone)]
pub struct BindConfig {
    /// Maximum number of parameters per statement (default: 2100).
    pub max_parameters: usize,
    /// Prefix parameter names lacking `@` with one (default: true).
    pub prefix_names: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            max_parameters: MAX_PARAMETERS,
            prefix_names: true,
        }
    }
}

impl BindConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of parameters per statement.
    ///
    /// Values above the server limit are clamped to it.
    #[must_use]
    pub fn max_parameters(mut self, max: usize) -> Self {
        self.max_parameters = max.min(MAX_PARAMETERS);
        self
    }

    /// Enable or disable `@` prefixing of parameter names.
    #[must_use]
    pub fn prefix_names(mut self, enabled: bool) -> Self {
        self.prefix_names = enabled;
        self
    }

    /// Final wire name of the parameter at 1-based `position`.
    pub(crate) fn param_name(&self, name: &str, position: usize) -> String {
        if name.is_empty() {
            format!("@p{position}")
        } else if self.prefix_names && !name.starts_with('@') {
            format!("@{name}")
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BindConfig::default();
        assert_eq!(config.max_parameters, 2100);
        assert!(config.prefix_names);
    }

    #[test]
    fn test_max_parameters_clamped() {
        assert_eq!(BindConfig::new().max_parameters(10).max_parameters, 10);
        assert_eq!(BindConfig::new().max_parameters(5000).max_parameters, 2100);
    }

    #[test]
    fn test_param_names() {
        let config = BindConfig::default();
        assert_eq!(config.param_name("", 3), "@p3");
        assert_eq!(config.param_name("id", 1), "@id");
        assert_eq!(config.param_name("@id", 1), "@id");

        let raw = BindConfig::new().prefix_names(false);
        assert_eq!(raw.param_name("id", 1), "id");
        assert_eq!(raw.param_name("", 1), "@p1");
    }
}
