//! Timestamp rendering for `%{time}` and the JSON `ts` key

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_logspec::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::from_directive("rfc3339");
/// assert_eq!(format, TimestampFormat::Rfc3339);
///
/// let format = TimestampFormat::from_directive("%H:%M:%S");
/// assert!(!format.format(&Utc::now()).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Resolve the argument of a `%{time:...}` directive.
    ///
    /// Preset names are matched case-insensitively; anything else is taken
    /// as a strftime string. An empty argument selects the default.
    pub fn from_directive(arg: &str) -> Self {
        match arg.to_ascii_lowercase().as_str() {
            "" | "iso8601" => TimestampFormat::Iso8601,
            "iso8601micros" => TimestampFormat::Iso8601Micros,
            "rfc3339" => TimestampFormat::Rfc3339,
            "unix" => TimestampFormat::Unix,
            "unixmillis" => TimestampFormat::UnixMillis,
            _ => TimestampFormat::Custom(arg.to_string()),
        }
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Seconds since the epoch with sub-second precision
pub fn epoch_seconds(datetime: &DateTime<Utc>) -> f64 {
    datetime.timestamp() as f64 + f64::from(datetime.timestamp_subsec_nanos()) / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_micros_format() {
        let result = TimestampFormat::Iso8601Micros.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_unix_formats() {
        assert_eq!(TimestampFormat::Unix.format(&fixed_datetime()), "1736332245");
        assert_eq!(
            TimestampFormat::UnixMillis.format(&fixed_datetime()),
            "1736332245123"
        );
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_from_directive() {
        assert_eq!(TimestampFormat::from_directive(""), TimestampFormat::Iso8601);
        assert_eq!(TimestampFormat::from_directive("UNIX"), TimestampFormat::Unix);
        assert_eq!(
            TimestampFormat::from_directive("%H:%M:%S"),
            TimestampFormat::Custom("%H:%M:%S".to_string())
        );
    }

    #[test]
    fn test_epoch_seconds() {
        let secs = epoch_seconds(&fixed_datetime());
        assert!((secs - 1736332245.123456).abs() < 1e-6);
    }
}
