use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Width of `yyyy-MM-ddTHH:mm:ss`; a fraction, if any, starts right after it.
const SECONDS_PREFIX_LEN: usize = 19;

/// Timestamp shapes accepted from the fixture, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    /// `2025-01-01T10:00:00.123Z` or `2025-01-01T10:00:00.123+03:00`.
    IsoFractional,
    /// `2025-01-01T10:00:00Z` or `2025-01-01T10:00:00+03:00`.
    Iso,
    /// `2025-01-01T10:00:00.123456`, read as UTC.
    PlainFractional,
    /// `2025-01-01T10:00:00+0300`.
    NumericOffset,
}

impl TimestampFormat {
    pub const ATTEMPT_ORDER: [TimestampFormat; 4] = [
        Self::IsoFractional,
        Self::Iso,
        Self::PlainFractional,
        Self::NumericOffset,
    ];

    /// Returns the first format that accepts `raw`.
    pub fn detect(raw: &str) -> Option<Self> {
        Self::ATTEMPT_ORDER
            .into_iter()
            .find(|format| format.parse(raw).is_some())
    }

    pub fn parse(self, raw: &str) -> Option<DateTime<Utc>> {
        match self {
            Self::IsoFractional => {
                if !has_fraction(raw) || !has_zulu_or_colon_offset(raw) {
                    return None;
                }
                DateTime::parse_from_str(&normalize_zulu(raw), "%Y-%m-%dT%H:%M:%S%.f%:z")
                    .ok()
                    .map(|parsed| parsed.with_timezone(&Utc))
            }
            Self::Iso => {
                if has_fraction(raw) || !has_zulu_or_colon_offset(raw) {
                    return None;
                }
                DateTime::parse_from_str(&normalize_zulu(raw), "%Y-%m-%dT%H:%M:%S%:z")
                    .ok()
                    .map(|parsed| parsed.with_timezone(&Utc))
            }
            Self::PlainFractional => {
                if !has_fraction(raw) {
                    return None;
                }
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|parsed| parsed.and_utc())
            }
            Self::NumericOffset => {
                if has_fraction(raw) {
                    return None;
                }
                DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
                    .ok()
                    .map(|parsed| parsed.with_timezone(&Utc))
            }
        }
    }
}

/// Parses a fixture timestamp using the first format that accepts it.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    TimestampFormat::ATTEMPT_ORDER
        .into_iter()
        .find_map(|format| format.parse(raw))
}

/// Canonical outbound shape: RFC 3339, UTC, millisecond precision.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn has_fraction(raw: &str) -> bool {
    raw.as_bytes().get(SECONDS_PREFIX_LEN) == Some(&b'.')
}

/// `%:z` also accepts `+0300`; the colon-separated strategies must leave that to `NumericOffset`.
fn has_zulu_or_colon_offset(raw: &str) -> bool {
    if raw.ends_with(['Z', 'z']) {
        return true;
    }

    let bytes = raw.as_bytes();
    let len = bytes.len();
    len >= 6 && bytes[len - 3] == b':' && matches!(bytes[len - 6], b'+' | b'-')
}

fn normalize_zulu(raw: &str) -> Cow<'_, str> {
    match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(stripped) => Cow::Owned(format!("{stripped}+00:00")),
        None => Cow::Borrowed(raw),
    }
}

/// Serde adapter for fields that carry fixture timestamps.
pub mod flexible {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognized timestamp '{raw}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ten_o_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn every_supported_shape_yields_the_same_instant() {
        let shapes = [
            "2025-01-01T10:00:00.000Z",
            "2025-01-01T10:00:00Z",
            "2025-01-01T10:00:00.000000",
            "2025-01-01T13:00:00+0300",
        ];

        for raw in shapes {
            assert_eq!(parse_timestamp(raw), Some(ten_o_clock()), "shape {raw}");
        }
    }

    #[test]
    fn colon_offsets_are_converted_to_utc() {
        assert_eq!(
            parse_timestamp("2025-01-01T12:00:00+02:00"),
            Some(ten_o_clock())
        );
        assert_eq!(
            parse_timestamp("2025-01-01T12:00:00.000+02:00"),
            Some(ten_o_clock())
        );
    }

    #[test]
    fn fractional_seconds_are_preserved() {
        let parsed = parse_timestamp("2025-01-01T10:00:00.250Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn detect_reports_the_first_matching_strategy() {
        assert_eq!(
            TimestampFormat::detect("2025-01-01T10:00:00.5Z"),
            Some(TimestampFormat::IsoFractional)
        );
        assert_eq!(
            TimestampFormat::detect("2025-01-01T10:00:00Z"),
            Some(TimestampFormat::Iso)
        );
        assert_eq!(
            TimestampFormat::detect("2025-01-01T10:00:00.123456"),
            Some(TimestampFormat::PlainFractional)
        );
        assert_eq!(
            TimestampFormat::detect("2025-01-01T13:00:00+03:00"),
            Some(TimestampFormat::Iso)
        );
        assert_eq!(
            TimestampFormat::detect("2025-01-01T13:00:00+0300"),
            Some(TimestampFormat::NumericOffset)
        );
    }

    #[test]
    fn colon_strategies_leave_compact_offsets_alone() {
        assert_eq!(TimestampFormat::Iso.parse("2025-01-01T13:00:00+0300"), None);
        assert_eq!(
            TimestampFormat::IsoFractional.parse("2025-01-01T13:00:00.000+0300"),
            None
        );
        assert_eq!(
            TimestampFormat::NumericOffset.parse("2025-01-01T13:00:00+0300"),
            Some(ten_o_clock())
        );
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        for raw in [
            "",
            "yesterday",
            "2025-01-01",
            "2025-01-01 10:00:00",
            "2025-13-01T10:00:00Z",
            "2025-01-01T10:00:00",
        ] {
            assert_eq!(parse_timestamp(raw), None, "raw {raw:?}");
        }
    }

    #[test]
    fn formatted_timestamps_parse_back() {
        let formatted = format_timestamp(&ten_o_clock());
        assert_eq!(formatted, "2025-01-01T10:00:00.000Z");
        assert_eq!(parse_timestamp(&formatted), Some(ten_o_clock()));
    }
}
