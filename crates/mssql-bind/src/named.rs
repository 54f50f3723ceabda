//! Named parameter values.

use mssql_types::{ToSql, TypeError};

use crate::value::ParamValue;

/// A parameter value together with its name.
///
/// An empty name binds the value positionally; it is named `@p<n>` by its
/// 1-based position when the statement is bound.
#[derive(Debug, Clone, Default)]
pub struct NamedValue {
    /// Parameter name, with or without the `@` prefix.
    pub name: String,
    /// Parameter value.
    pub value: ParamValue,
}

impl NamedValue {
    /// Create a named parameter.
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a positional parameter.
    pub fn positional(value: impl Into<ParamValue>) -> Self {
        Self::new(String::new(), value)
    }

    /// Create a named parameter from a value implementing [`ToSql`].
    pub fn from_value<T: ToSql + ?Sized>(
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, TypeError> {
        Ok(Self::new(name, value.to_sql()?))
    }
}

/// An ordered list of parameters for one statement execution.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    params: Vec<NamedValue>,
}

impl ParamList {
    /// Create a new empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the list.
    pub fn push(&mut self, param: NamedValue) {
        self.params.push(param);
    }

    /// Add a parameter by name and value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push(NamedValue::new(name, value));
        self
    }

    /// Add a parameter converted through [`ToSql`].
    pub fn add<T: ToSql + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<(), TypeError> {
        self.params.push(NamedValue::from_value(name, value)?);
        Ok(())
    }

    /// Get the parameters as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NamedValue] {
        &self.params
    }

    /// Get the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl From<Vec<NamedValue>> for ParamList {
    fn from(params: Vec<NamedValue>) -> Self {
        Self { params }
    }
}

impl IntoIterator for ParamList {
    type Item = NamedValue;
    type IntoIter = std::vec::IntoIter<NamedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

impl FromIterator<NamedValue> for ParamList {
    fn from_iter<I: IntoIterator<Item = NamedValue>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mssql_types::{SqlValue, TypedValue};

    #[test]
    fn test_param_list_keeps_order() {
        let mut list = ParamList::new()
            .with("a", SqlValue::Int(1))
            .with("b", TypedValue::varchar("x"));
        list.add("c", "text").unwrap();
        list.push(NamedValue::positional(SqlValue::Null));

        let names: Vec<_> = list.as_slice().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", ""]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_from_value_conversion_error() {
        assert!(NamedValue::from_value("big", &u64::MAX).is_err());
    }
}
