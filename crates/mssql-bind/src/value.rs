//! Caller-supplied parameter values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use mssql_types::{SqlValue, ToSql, TypeError, TypedValue};

use crate::output::Output;

/// A value bound to a statement parameter.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// Plain driver value, encoded with its inferred SQL type.
    Sql(SqlValue),
    /// Value with an explicitly selected wire type.
    Typed(TypedValue),
    /// Output parameter wrapping its input value.
    Output(Output),
    /// Caller-defined value, recognized only by extended type handlers or
    /// its own conversion.
    Custom(CustomValue),
}

impl ParamValue {
    /// Runtime type name, as reported in unsupported-type errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Sql(v) => v.type_name(),
            Self::Typed(v) => v.type_name(),
            Self::Output(_) => "Output",
            Self::Custom(v) => v.type_name(),
        }
    }

    /// Check if the value is an output parameter.
    #[must_use]
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// Get the custom value, if this is one.
    #[must_use]
    pub fn as_custom(&self) -> Option<&CustomValue> {
        match self {
            Self::Custom(v) => Some(v),
            _ => None,
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::Sql(SqlValue::Null)
    }
}

impl From<SqlValue> for ParamValue {
    fn from(value: SqlValue) -> Self {
        Self::Sql(value)
    }
}

impl From<TypedValue> for ParamValue {
    fn from(value: TypedValue) -> Self {
        Self::Typed(value)
    }
}

impl From<Output> for ParamValue {
    fn from(value: Output) -> Self {
        Self::Output(value)
    }
}

impl From<CustomValue> for ParamValue {
    fn from(value: CustomValue) -> Self {
        Self::Custom(value)
    }
}

type ConvertFn = fn(&(dyn Any + Send + Sync)) -> Result<SqlValue, TypeError>;

/// A type-erased caller value.
///
/// Extended type handlers recognize these with [`CustomValue::downcast_ref`].
/// Values built with [`CustomValue::convertible`] also carry a default
/// conversion to a plain [`SqlValue`], used when no handler claims them.
#[derive(Clone)]
pub struct CustomValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    convert: Option<ConvertFn>,
}

fn convert_any<T: ToSql + 'static>(value: &(dyn Any + Send + Sync)) -> Result<SqlValue, TypeError> {
    match value.downcast_ref::<T>() {
        Some(v) => v.to_sql(),
        None => Err(TypeError::UnsupportedConversion {
            from: std::any::type_name::<T>().to_string(),
            to: "SqlValue",
        }),
    }
}

impl CustomValue {
    /// Wrap a value that only extended type handlers understand.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
            convert: None,
        }
    }

    /// Wrap a value that falls back to its [`ToSql`] conversion.
    pub fn convertible<T: ToSql + Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
            convert: Some(convert_any::<T>),
        }
    }

    /// Rust type name of the wrapped value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the wrapped value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Check if the value has a default conversion.
    #[must_use]
    pub fn is_convertible(&self) -> bool {
        self.convert.is_some()
    }

    /// Run the default conversion, `None` when the value has none.
    pub fn to_sql(&self) -> Option<Result<SqlValue, TypeError>> {
        self.convert.map(|convert| convert(self.value.as_ref()))
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_name", &self.type_name)
            .field("convertible", &self.is_convertible())
            .finish_non_exhaustive()
    }
}
