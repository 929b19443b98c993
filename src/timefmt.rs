use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Format a timestamp the way reports show it (`YYYY-MM-DD HH:MM:SS`).
pub fn format_datetime(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Date labels for `days` consecutive days starting at `start`.
pub fn date_range(start: NaiveDate, days: usize) -> Vec<String> {
    (0..days)
        .map(|offset| format_date(start + Duration::days(offset as i64)))
        .collect()
}

/// Serde adapter writing timestamps with [`format_datetime`].
pub mod datetime_serde {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_datetime(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S").map_err(serde::de::Error::custom)
    }
}
