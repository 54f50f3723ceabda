//! Explicit wire-type markers.
//!
//! A plain [`SqlValue`](crate::SqlValue) is encoded with the type SQL Server
//! would infer for it: strings become `NVARCHAR`, timestamps become
//! `DATETIME2`/`DATETIMEOFFSET`. Wrapping a value in a [`TypedValue`] selects
//! the wire type explicitly instead, which matters when comparing against
//! `VARCHAR` columns (index seeks) or legacy `DATETIME` columns.

/// A value tagged with the SQL Server type it must be sent as.
///
/// The set is closed: every marker has exactly one encoding, implemented in
/// [`encode_typed`](crate::encode_typed).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TypedValue {
    /// Single-byte character string, sent as `VARCHAR(n)`.
    ///
    /// The string bytes go over the wire untouched and are interpreted by
    /// the server under the parameter collation.
    VarChar(String),
    /// Legacy `DATETIME`, 1/300 second resolution.
    #[cfg(feature = "chrono")]
    DateTime1(chrono::DateTime<chrono::FixedOffset>),
    /// `DATETIMEOFFSET(7)`, keeping the value's own UTC offset.
    #[cfg(feature = "chrono")]
    DateTimeOffset(chrono::DateTime<chrono::FixedOffset>),
}

impl TypedValue {
    /// Mark a string as `VARCHAR`.
    pub fn varchar(value: impl Into<String>) -> Self {
        Self::VarChar(value.into())
    }

    /// Mark a timestamp as legacy `DATETIME`.
    ///
    /// The wall-clock reading in the timestamp's own zone is what gets sent.
    #[cfg(feature = "chrono")]
    pub fn datetime1<Tz: chrono::TimeZone>(value: chrono::DateTime<Tz>) -> Self {
        Self::DateTime1(value.fixed_offset())
    }

    /// Mark a timestamp as `DATETIMEOFFSET`.
    #[cfg(feature = "chrono")]
    pub fn datetime_offset<Tz: chrono::TimeZone>(value: chrono::DateTime<Tz>) -> Self {
        Self::DateTimeOffset(value.fixed_offset())
    }

    /// The SQL type this marker selects, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::VarChar(_) => "VARCHAR",
            #[cfg(feature = "chrono")]
            Self::DateTime1(_) => "DATETIME",
            #[cfg(feature = "chrono")]
            Self::DateTimeOffset(_) => "DATETIMEOFFSET",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_varchar_from_str() {
        assert_eq!(TypedValue::varchar("abc"), TypedValue::VarChar("abc".into()));
        assert_eq!(TypedValue::varchar("").type_name(), "VARCHAR");
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_datetime_markers_keep_offset() {
        use chrono::{FixedOffset, TimeZone, Utc};

        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        match TypedValue::datetime1(utc) {
            TypedValue::DateTime1(dt) => assert_eq!(dt.offset().local_minus_utc(), 0),
            other => panic!("unexpected marker {other:?}"),
        }

        let zone = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = zone.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
        match TypedValue::datetime_offset(local) {
            TypedValue::DateTimeOffset(dt) => {
                assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
                assert_eq!(dt, utc);
            }
            other => panic!("unexpected marker {other:?}"),
        }
    }
}
