//! Vendor raw-value transforms for zoned timestamps.
//!
//! Some drivers hand back zoned timestamps as vendor text instead of a
//! standard form. The transform is picked once when the dialect is built.

use chrono::{DateTime, FixedOffset};

use crate::error::{DialectError, Result};

/// Closed set of raw zoned-timestamp normalizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawValueTransform {
    /// Values already arrive as RFC 3339 text.
    #[default]
    None,
    /// Oracle `TIMESTAMP WITH TIME ZONE` text: `2024-01-31 10:15:30.5 +02:00`.
    OracleTimestampWithTimeZone,
    /// SQL Server `datetimeoffset` text: `2024-01-31 10:15:30.5000000 +02:00`.
    SqlServerDateTimeOffset,
}

const VENDOR_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %:z";

impl RawValueTransform {
    /// Parses raw zoned timestamp text.
    ///
    /// # Errors
    ///
    /// Returns a malformed payload error when the text does not match the
    /// expected form.
    pub fn parse_timestamp(&self, raw: &str) -> Result<DateTime<FixedOffset>> {
        let raw = raw.trim();
        let parsed = match self {
            Self::None => DateTime::parse_from_rfc3339(raw),
            Self::OracleTimestampWithTimeZone | Self::SqlServerDateTimeOffset => {
                DateTime::parse_from_str(raw, VENDOR_FORMAT)
            }
        };
        parsed.map_err(|e| DialectError::malformed("timestamp", 0, format!("'{raw}': {e}")))
    }

    /// Renders a zoned timestamp in the form this transform parses.
    #[must_use]
    pub fn format_timestamp(&self, value: &DateTime<FixedOffset>) -> String {
        match self {
            Self::None => value.to_rfc3339(),
            Self::OracleTimestampWithTimeZone => value.format("%Y-%m-%d %H:%M:%S%.f %:z").to_string(),
            // datetimeoffset carries 100ns ticks
            Self::SqlServerDateTimeOffset => format!(
                "{}.{:07} {}",
                value.format("%Y-%m-%d %H:%M:%S"),
                value.timestamp_subsec_nanos() / 100,
                value.format("%:z")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_forms() {
        let oracle = RawValueTransform::OracleTimestampWithTimeZone
            .parse_timestamp("2024-01-31 10:15:30.5 +02:00")
            .unwrap();
        let sqlserver = RawValueTransform::SqlServerDateTimeOffset
            .parse_timestamp("2024-01-31 10:15:30.5000000 +02:00")
            .unwrap();
        let standard = RawValueTransform::None
            .parse_timestamp("2024-01-31T10:15:30.5+02:00")
            .unwrap();
        assert_eq!(oracle, standard);
        assert_eq!(sqlserver, standard);
        assert_eq!(oracle.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_format_then_parse() {
        let value = DateTime::parse_from_rfc3339("2023-06-01T00:00:00-05:30").unwrap();
        for transform in [
            RawValueTransform::None,
            RawValueTransform::OracleTimestampWithTimeZone,
            RawValueTransform::SqlServerDateTimeOffset,
        ] {
            let text = transform.format_timestamp(&value);
            assert_eq!(transform.parse_timestamp(&text).unwrap(), value, "{text}");
        }
    }

    #[test]
    fn test_rejects_garbage() {
        let err = RawValueTransform::OracleTimestampWithTimeZone
            .parse_timestamp("yesterday")
            .unwrap_err();
        assert!(matches!(err, DialectError::MalformedPayload { format: "timestamp", .. }));
    }
}
