//! Output parameters and their destinations.
//!
//! An [`Output`] wraps the input value of an `OUTPUT` parameter together with
//! an [`OutputSlot`] that receives the value the server returns. While a
//! statement binds its parameters it records every slot by parameter name in
//! its own [`OutputBindings`]; after execution the return values are
//! delivered through that map.

use std::collections::HashMap;
use std::sync::Arc;

use mssql_types::SqlValue;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::value::ParamValue;

/// Shared destination for an output parameter's return value.
///
/// Clones refer to the same destination.
#[derive(Debug, Clone, Default)]
pub struct OutputSlot(Arc<Mutex<SqlValue>>);

impl OutputSlot {
    /// Create an empty (NULL) destination.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the destination.
    #[must_use]
    pub fn get(&self) -> SqlValue {
        self.0.lock().clone()
    }

    /// Overwrite the destination.
    pub fn set(&self, value: SqlValue) {
        *self.0.lock() = value;
    }

    /// Take the value out, leaving NULL behind.
    pub fn take(&self) -> SqlValue {
        std::mem::take(&mut *self.0.lock())
    }

    /// Check if two slots refer to the same destination.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Output parameter wrapper: input value plus exactly one destination.
#[derive(Debug, Clone)]
pub struct Output {
    value: Box<ParamValue>,
    slot: OutputSlot,
}

impl Output {
    /// Bind `value` as input of an output parameter returning into `slot`.
    pub fn new(value: impl Into<ParamValue>, slot: &OutputSlot) -> Self {
        Self {
            value: Box::new(value.into()),
            slot: slot.clone(),
        }
    }

    /// The wrapped input value.
    #[must_use]
    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut ParamValue {
        &mut self.value
    }

    /// The destination of the return value.
    #[must_use]
    pub fn slot(&self) -> &OutputSlot {
        &self.slot
    }

    /// Split into the input value and the destination.
    #[must_use]
    pub fn into_parts(self) -> (ParamValue, OutputSlot) {
        (*self.value, self.slot)
    }
}

/// Parameter name to destination map of one statement execution.
///
/// The map is allocated on the first recorded output parameter.
#[derive(Debug, Default)]
pub struct OutputBindings {
    slots: Option<HashMap<String, OutputSlot>>,
}

impl OutputBindings {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the destination of parameter `name`, replacing an earlier one.
    pub fn record(&mut self, name: &str, slot: OutputSlot) {
        self.slots
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), slot);
    }

    /// Destination recorded for `name`, with or without its `@` prefix.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OutputSlot> {
        let slots = self.slots.as_ref()?;
        slots.get(name).or_else(|| match name.strip_prefix('@') {
            Some(bare) => slots.get(bare),
            None => slots.get(&format!("@{name}")),
        })
    }

    /// Write a value returned by the server into the destination of `name`.
    pub fn deliver(&self, name: &str, value: SqlValue) -> Result<()> {
        match self.get(name) {
            Some(slot) => {
                tracing::trace!(name, "delivering output parameter");
                slot.set(value);
                Ok(())
            }
            None => {
                tracing::warn!(name, "return value for unbound output parameter");
                Err(Error::UnknownOutput {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Number of recorded output parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.as_ref().map_or(0, HashMap::len)
    }

    /// Check if no output parameter was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the recorded output parameters, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().flat_map(|slots| slots.keys().map(String::as_str))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_clones_share_destination() {
        let slot = OutputSlot::new();
        let other = slot.clone();
        other.set(SqlValue::Int(5));
        assert_eq!(slot.get(), SqlValue::Int(5));
        assert!(slot.same_slot(&other));
        assert!(!slot.same_slot(&OutputSlot::new()));
        assert_eq!(slot.take(), SqlValue::Int(5));
        assert!(slot.get().is_null());
    }

    #[test]
    fn test_bindings_start_unallocated() {
        let bindings = OutputBindings::new();
        assert!(bindings.slots.is_none());
        assert!(bindings.is_empty());
        assert_eq!(bindings.names().count(), 0);
    }

    #[test]
    fn test_record_and_deliver() {
        let slot = OutputSlot::new();
        let mut bindings = OutputBindings::new();
        bindings.record("@total", slot.clone());
        assert_eq!(bindings.len(), 1);
        assert!(bindings.get("@total").unwrap().same_slot(&slot));

        bindings.deliver("@total", SqlValue::BigInt(99)).unwrap();
        assert_eq!(slot.get(), SqlValue::BigInt(99));
    }

    #[test]
    fn test_deliver_matches_prefixed_name() {
        let slot = OutputSlot::new();
        let mut bindings = OutputBindings::new();
        bindings.record("total", slot.clone());
        bindings.deliver("@total", SqlValue::Int(1)).unwrap();
        assert_eq!(slot.get(), SqlValue::Int(1));

        let prefixed = OutputSlot::new();
        bindings.record("@count", prefixed.clone());
        bindings.deliver("count", SqlValue::Int(2)).unwrap();
        assert_eq!(prefixed.get(), SqlValue::Int(2));
    }

    #[test]
    fn test_deliver_unknown_name() {
        let bindings = OutputBindings::new();
        let err = bindings.deliver("@missing", SqlValue::Null).unwrap_err();
        assert!(matches!(err, Error::UnknownOutput { name } if name == "@missing"));
    }

    #[test]
    fn test_into_parts() {
        let slot = OutputSlot::new();
        let output = Output::new(SqlValue::Int(3), &slot);
        let (value, returned) = output.into_parts();
        assert!(matches!(value, ParamValue::Sql(SqlValue::Int(3))));
        assert!(returned.same_slot(&slot));
    }
}
