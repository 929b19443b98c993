use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::WordLists;
use crate::message::Message;
use crate::timefmt::datetime_serde;

/// Snapshot of a message that reports quote (first/last message).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuotedMessage {
    pub username: String,
    pub content: String,
    #[serde(with = "datetime_serde")]
    pub timestamp: NaiveDateTime,
}

impl From<&Message> for QuotedMessage {
    fn from(message: &Message) -> Self {
        Self {
            username: message.username.clone(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// Statistics computed over one ordered run of messages (a whole
/// conversation or one person's share of it).
///
/// Built by [`crate::stats_builder::build_statistics`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Statistics {
    #[serde(with = "datetime_serde")]
    pub first_message_timestamp: NaiveDateTime,
    #[serde(with = "datetime_serde")]
    pub last_message_timestamp: NaiveDateTime,
    pub days_in_range: usize,
    pub active_days: usize,

    pub first_message: QuotedMessage,
    pub last_message: QuotedMessage,

    pub total_messages: usize,
    pub total_words: usize,
    pub total_characters: usize,
    pub total_characters_without_spaces: usize,

    /// 24 slots, hour of day.
    pub active_hours: Vec<usize>,
    /// 7 slots, Monday first.
    pub active_days_of_week: Vec<usize>,
    /// 168 slots, `weekday * 24 + hour`.
    pub active_weekly_hours: Vec<usize>,
    /// One slot per day in range, indexed by days since the first message.
    pub active_days_all_time: Vec<usize>,

    /// Word counts, most frequent first.
    pub word_freq: Vec<(String, usize)>,
    pub swears: usize,
    pub questions: usize,
    pub urls: Vec<String>,

    #[serde(with = "datetime_serde")]
    pub most_active_day: NaiveDateTime,
    pub most_messages_said: usize,
    /// Daily totals, appended when a day boundary is crossed. The last day
    /// of the range is never flushed.
    pub messages_said_all_time: Vec<usize>,
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

impl Statistics {
    pub fn inactive_days(&self) -> usize {
        self.days_in_range.saturating_sub(self.active_days)
    }

    /// Share of days in range with at least one message, in percent.
    pub fn active_day_ratio(&self) -> Option<f64> {
        ratio(self.active_days, self.days_in_range).map(|r| r * 100.0)
    }

    pub fn messages_per_active_day(&self) -> Option<f64> {
        ratio(self.total_messages, self.active_days)
    }

    pub fn messages_per_day(&self) -> Option<f64> {
        ratio(self.total_messages, self.days_in_range)
    }

    pub fn words_per_message(&self) -> Option<f64> {
        ratio(self.total_words, self.total_messages)
    }

    pub fn characters_per_message(&self) -> Option<f64> {
        ratio(self.total_characters, self.total_messages)
    }

    /// `None` when no words were counted.
    pub fn letters_per_word(&self) -> Option<f64> {
        ratio(self.total_characters_without_spaces, self.total_words)
    }

    /// Most frequent words, skipping stopwords and words shorter than
    /// `min_len` characters.
    pub fn top_words(&self, words: &WordLists, min_len: usize, limit: usize) -> Vec<(&str, usize)> {
        self.word_freq
            .iter()
            .filter(|(word, _)| word.chars().count() >= min_len && !words.is_stopword(word))
            .take(limit)
            .map(|(word, count)| (word.as_str(), *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats_builder::build_statistics;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn message(day: u32, hour: u32, content: &str) -> Arc<Message> {
        let ts = NaiveDate::from_ymd_opt(2017, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        Arc::new(Message::new("alice", content, ts, content))
    }

    #[test]
    fn test_ratios() {
        let messages = vec![
            message(1, 9, "one two"),
            message(1, 10, "three four five six"),
            message(4, 9, "seven"),
        ];
        let stats = build_statistics(&messages, &WordLists::default());

        assert_eq!(stats.days_in_range, 4);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.inactive_days(), 2);
        assert_eq!(stats.active_day_ratio(), Some(50.0));
        assert_eq!(stats.messages_per_active_day(), Some(1.5));
        assert_eq!(stats.messages_per_day(), Some(0.75));
        assert_eq!(stats.words_per_message(), Some(7.0 / 3.0));
    }

    #[test]
    fn test_letters_per_word_without_words() {
        let mut stats = build_statistics(&[message(1, 9, "hi")], &WordLists::default());
        stats.total_words = 0;
        assert_eq!(stats.letters_per_word(), None);
    }

    #[test]
    fn test_top_words_filters_stopwords_and_short_words() {
        let messages = vec![message(1, 9, "the pizza is ok the pizza ok ok ok")];
        let stats = build_statistics(&messages, &WordLists::default());

        assert_eq!(stats.word_freq[0], ("ok".to_string(), 4));
        let top = stats.top_words(&WordLists::default(), 3, 10);
        assert_eq!(top, vec![("pizza", 2)]);

        let top = stats.top_words(&WordLists::default(), 0, 1);
        assert_eq!(top, vec![("ok", 4)]);
    }

    #[test]
    fn test_serialized_keys_are_flat() {
        let stats = build_statistics(&[message(1, 9, "hello")], &WordLists::default());
        let value = serde_json::to_value(&stats).unwrap();

        assert_eq!(value["first_message_timestamp"], "2017-01-01 09:00:00");
        assert_eq!(value["most_active_day"], "2017-01-01 09:00:00");
        assert_eq!(value["word_freq"], serde_json::json!([["hello", 1]]));
        assert_eq!(value["active_hours"].as_array().unwrap().len(), 24);

        let back: Statistics = serde_json::from_value(value).unwrap();
        assert_eq!(back, stats);
    }
}
