//! Timestamp formats for rendered log lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How senders render the time a message was delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Seconds since the epoch
    Unix,

    UnixMillis,

    UnixMicros,

    /// Any strftime pattern, e.g. `%Y/%m/%d %H:%M:%S`
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(pattern) => datetime.format(pattern).to_string(),
        }
    }

    /// JSON value for structured output. Numeric formats stay numbers.
    pub fn to_json(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => datetime.timestamp().into(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().into(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().into(),
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(TimestampFormat::Iso8601.format(&fixed()), "2025-01-08T10:30:45.123Z");
        assert_eq!(
            TimestampFormat::Iso8601Micros.format(&fixed()),
            "2025-01-08T10:30:45.123456Z"
        );
        assert!(TimestampFormat::Rfc3339
            .format(&fixed())
            .starts_with("2025-01-08T10:30:45"));
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(TimestampFormat::Unix.format(&fixed()), "1736332245");
        assert_eq!(TimestampFormat::UnixMillis.to_json(&fixed()), 1736332245123_i64);
        assert!(TimestampFormat::UnixMicros.is_numeric());
        assert!(!TimestampFormat::Iso8601.is_numeric());
        assert!(TimestampFormat::Iso8601.to_json(&fixed()).is_string());
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed()), "2025/01/08 10:30");
    }

    #[test]
    fn test_serde() {
        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
        assert_eq!(
            serde_json::to_string(&TimestampFormat::Unix).expect("serialize"),
            "\"Unix\""
        );
    }
}
