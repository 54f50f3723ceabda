//! Statement execution context.
//!
//! A [`Statement`] validates and encodes the parameters of one execution.
//! Parameters are processed strictly in order and the first failure aborts
//! the whole bind; nothing partially encoded is returned.

use tds_protocol::{ParamDescriptor, RpcParam, RpcRequest};

use mssql_types::SqlValue;

use crate::config::BindConfig;
use crate::convert::default_convert;
use crate::encode;
use crate::error::{Error, Result};
use crate::extended::{ExtendedTypes, Verdict};
use crate::named::NamedValue;
use crate::output::OutputBindings;
use crate::validate;
use crate::value::ParamValue;

/// Execution context for one SQL statement.
#[derive(Debug)]
pub struct Statement {
    sql: String,
    config: BindConfig,
    registry: ExtendedTypes,
    outputs: OutputBindings,
}

impl Statement {
    pub(crate) fn new(sql: String, config: BindConfig, registry: ExtendedTypes) -> Self {
        Self {
            sql,
            config,
            registry,
            outputs: OutputBindings::new(),
        }
    }

    /// SQL text of the statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Output destinations recorded so far.
    #[must_use]
    pub fn outputs(&self) -> &OutputBindings {
        &self.outputs
    }

    /// Validate one parameter, recording its destination if it is an output
    /// parameter.
    pub fn check_named_value(&mut self, param: &mut NamedValue) -> Result<Verdict> {
        validate::check_named_value(&self.registry, &mut self.outputs, param)
    }

    /// Encode one accepted parameter value.
    pub fn make_param(&self, value: &ParamValue) -> Result<ParamDescriptor> {
        encode::make_param(&self.registry, value)
    }

    /// Validate, convert and encode all parameters in order.
    ///
    /// Positional parameters are named `@p<n>` by their 1-based position.
    pub fn bind<I>(mut self, params: I) -> Result<BoundParams>
    where
        I: IntoIterator<Item = NamedValue>,
    {
        let params: Vec<NamedValue> = params.into_iter().collect();
        if params.len() > self.config.max_parameters {
            tracing::warn!(
                count = params.len(),
                max = self.config.max_parameters,
                "parameter limit exceeded"
            );
            return Err(Error::TooManyParameters {
                count: params.len(),
                max: self.config.max_parameters,
            });
        }

        let mut bound = Vec::with_capacity(params.len());
        for (i, mut param) in params.into_iter().enumerate() {
            param.name = self.config.param_name(&param.name, i + 1);

            if self.check_named_value(&mut param)? == Verdict::Skip {
                param.value = default_convert(&param.value)?;
            }

            let descriptor = self.make_param(&param.value)?;
            tracing::trace!(
                name = %param.name,
                declaration = %descriptor.declaration(),
                "bound parameter"
            );
            bound.push(RpcParam {
                name: param.name,
                descriptor,
            });
        }

        tracing::debug!(
            params = bound.len(),
            outputs = self.outputs.len(),
            "statement parameters bound"
        );

        Ok(BoundParams {
            sql: self.sql,
            params: bound,
            outputs: self.outputs,
        })
    }
}

/// Encoded parameters of one execution together with its output bindings.
#[derive(Debug)]
pub struct BoundParams {
    sql: String,
    params: Vec<RpcParam>,
    outputs: OutputBindings,
}

impl BoundParams {
    /// SQL text of the statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Encoded parameters in binding order.
    #[must_use]
    pub fn params(&self) -> &[RpcParam] {
        &self.params
    }

    /// Output destinations of this execution.
    #[must_use]
    pub fn outputs(&self) -> &OutputBindings {
        &self.outputs
    }

    /// Write a value returned by the server into its output destination.
    pub fn deliver(&self, name: &str, value: SqlValue) -> Result<()> {
        self.outputs.deliver(name, value)
    }

    /// Build the `sp_executesql` request carrying the parameters.
    #[must_use]
    pub fn request(&self) -> RpcRequest {
        RpcRequest::execute_sql(&self.sql, self.params.clone())
    }

    /// Split into the encoded parameters and the output bindings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<RpcParam>, OutputBindings) {
        (self.params, self.outputs)
    }
}
