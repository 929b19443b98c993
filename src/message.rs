/// Chat message value type.
///
/// Messages are created once by an extractor and then shared (`Arc`) between
/// the conversation-wide list and every per-person subset. Nothing mutates a
/// message after construction.
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;

use crate::timefmt;

/// Format of the timestamp handed over by extractors.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Shared, immutable handle to a message.
pub type SharedMessage = Arc<Message>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub username: String,
    pub content: String,
    /// Second resolution, no timezone.
    pub timestamp: NaiveDateTime,
    /// Source line the message was extracted from (diagnostics only).
    pub raw: String,
}

impl Message {
    pub fn new(
        username: impl Into<String>,
        content: impl Into<String>,
        timestamp: NaiveDateTime,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            content: content.into(),
            timestamp,
            raw: raw.into(),
        }
    }

    /// Builds a message from the raw parts produced by an extractor,
    /// parsing the `yyyy-mm-ddThh:mm:ss` timestamp.
    pub fn from_parts(
        username: &str,
        content: &str,
        timestamp: &str,
        raw: &str,
    ) -> Result<Self> {
        Ok(Self::new(username, content, parse_timestamp(timestamp)?, raw))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            timefmt::format_datetime(&self.timestamp),
            self.username,
            self.content
        )
    }
}

/// Parses `yyyy-mm-ddThh:mm:ss`, discarding anything after a `.` (fractional
/// seconds, timezone suffixes written after them).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.split('.').next().unwrap_or(value);
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid message timestamp: '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2017-03-04T05:06:07").unwrap();
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2017, 3, 4)
                .unwrap()
                .and_hms_opt(5, 6, 7)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_drops_fraction() {
        let ts = parse_timestamp("2017-03-04T05:06:07.123456").unwrap();
        assert_eq!(ts, parse_timestamp("2017-03-04T05:06:07").unwrap());
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2017-03-04 05:06:07").is_err());
        assert!(parse_timestamp("2017-02-30T00:00:00").is_err());
    }

    #[test]
    fn test_display() {
        let msg = Message::from_parts("alice", "hello there", "2017-01-01T10:00:00", "raw")
            .unwrap();
        assert_eq!(msg.to_string(), "2017-01-01 10:00:00 alice: hello there");
    }
}
