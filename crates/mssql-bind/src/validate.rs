//! Named value validation.
//!
//! Decides, before any byte is encoded, whether a parameter value is
//! acceptable. Output wrappers are unwrapped and their destinations recorded,
//! typed values are always accepted, everything else is offered to the
//! extended type handlers. A [`Verdict::Skip`] means nobody claimed the value
//! and the caller may still apply the default conversion.

use crate::convert::default_convert;
use crate::error::{Error, Result};
use crate::extended::{ExtendedTypes, Verdict};
use crate::named::NamedValue;
use crate::output::OutputBindings;
use crate::value::ParamValue;

/// Validate one named parameter.
///
/// Only `outputs` is mutated, plus the inner value of an output wrapper
/// when it needed the default conversion. A destination is recorded only
/// once its input value has been accepted.
pub fn check_named_value(
    registry: &ExtendedTypes,
    outputs: &mut OutputBindings,
    param: &mut NamedValue,
) -> Result<Verdict> {
    let name = param.name.as_str();
    match &mut param.value {
        ParamValue::Output(output) => {
            if output.value().is_output() {
                tracing::warn!(name, "nested output parameter");
                return Err(Error::NestedOutput {
                    name: name.to_string(),
                });
            }

            let inner = output.value_mut();
            if check_value(registry, inner)? == Verdict::Skip {
                *inner = default_convert(inner)?;
                tracing::debug!(name, "converted output parameter input");
            }

            outputs.record(name, output.slot().clone());
            tracing::debug!(name, "recorded output parameter");
            Ok(Verdict::Accept)
        }
        value => check_value(registry, value),
    }
}

fn check_value(registry: &ExtendedTypes, value: &ParamValue) -> Result<Verdict> {
    match value {
        ParamValue::Typed(_) => Ok(Verdict::Accept),
        _ => registry.check(value),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::output::{Output, OutputSlot};
    use crate::value::CustomValue;
    use mssql_types::{SqlValue, TypedValue};

    struct Opaque;

    fn check(param: &mut NamedValue, outputs: &mut OutputBindings) -> Result<Verdict> {
        check_named_value(&ExtendedTypes::default(), outputs, param)
    }

    #[test]
    fn test_markers_accepted() {
        let mut outputs = OutputBindings::new();
        let mut param = NamedValue::new("@v", TypedValue::varchar("abc"));
        assert_eq!(check(&mut param, &mut outputs).unwrap(), Verdict::Accept);
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_plain_values_skip_without_handlers() {
        let mut outputs = OutputBindings::new();
        let mut param = NamedValue::new("@v", SqlValue::Int(1));
        assert_eq!(check(&mut param, &mut outputs).unwrap(), Verdict::Skip);

        let mut param = NamedValue::new("@v", CustomValue::new(Opaque));
        assert_eq!(check(&mut param, &mut outputs).unwrap(), Verdict::Skip);
    }

    #[test]
    fn test_output_records_destination() {
        let slot = OutputSlot::new();
        let mut outputs = OutputBindings::new();
        let mut param = NamedValue::new("@out", Output::new(TypedValue::varchar("x"), &slot));

        assert_eq!(check(&mut param, &mut outputs).unwrap(), Verdict::Accept);
        assert!(outputs.get("@out").unwrap().same_slot(&slot));
        assert!(param.value.is_output());
    }

    #[test]
    fn test_output_inner_value_converted() {
        let slot = OutputSlot::new();
        let mut outputs = OutputBindings::new();
        let mut param = NamedValue::new(
            "@out",
            Output::new(CustomValue::convertible(12i16), &slot),
        );

        assert_eq!(check(&mut param, &mut outputs).unwrap(), Verdict::Accept);
        assert!(outputs.get("@out").unwrap().same_slot(&slot));
        match &param.value {
            ParamValue::Output(output) => {
                assert!(matches!(output.value(), ParamValue::Sql(SqlValue::SmallInt(12))));
                assert!(output.slot().same_slot(&slot));
            }
            other => panic!("output wrapper lost: {other:?}"),
        }
    }

    #[test]
    fn test_output_inner_unsupported() {
        let mut outputs = OutputBindings::new();
        let output = Output::new(CustomValue::new(Opaque), &OutputSlot::new());
        let mut param = NamedValue::new("@out", output);
        let err = check(&mut param, &mut outputs).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
        assert!(outputs.is_empty());
        assert!(outputs.get("@out").is_none());
    }

    #[test]
    fn test_nested_output_rejected() {
        let slot = OutputSlot::new();
        let inner = Output::new(SqlValue::Int(1), &slot);
        let mut outputs = OutputBindings::new();
        let mut param = NamedValue::new("@out", Output::new(inner, &slot));

        let err = check(&mut param, &mut outputs).unwrap_err();
        assert!(matches!(err, Error::NestedOutput { name } if name == "@out"));
        assert!(outputs.is_empty());
    }
}
