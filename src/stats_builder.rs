/// Statistics aggregation module.
///
/// Walks an ordered run of messages once and produces a [`Statistics`]
/// snapshot: totals, temporal histograms, the daily timeline and the lexical
/// counters.
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use crate::config::WordLists;
use crate::message::SharedMessage;
use crate::stats::{QuotedMessage, Statistics};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .unwrap()
});

const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

// ============================================================================
// Day boundary tracking (shared with person timelines)
// ============================================================================

/// A day whose tally was closed because a later day started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FinishedDay {
    pub date: NaiveDate,
    pub messages: usize,
    /// Calendar days between the finished day and the day that closed it.
    pub days_elapsed: i64,
}

/// Counts messages per calendar day over an ordered message run.
///
/// A day is only reported once the first message of a later day arrives;
/// the day in progress when the run ends is never reported.
#[derive(Debug)]
pub(crate) struct DayCursor {
    current: NaiveDate,
    messages: usize,
}

impl DayCursor {
    pub(crate) fn new(first_day: NaiveDate) -> Self {
        Self {
            current: first_day,
            messages: 0,
        }
    }

    /// Counts a message sent on `date`, returning the day it closed, if any.
    pub(crate) fn record(&mut self, date: NaiveDate) -> Option<FinishedDay> {
        let finished = if date != self.current {
            let finished = FinishedDay {
                date: self.current,
                messages: self.messages,
                days_elapsed: (date - self.current).num_days(),
            };
            self.current = date;
            self.messages = 0;
            Some(finished)
        } else {
            None
        };

        self.messages += 1;
        finished
    }
}

// ============================================================================
// Intermediate Aggregation Structs (private, internal to stats_builder)
// ============================================================================

/// Message, word and character totals (private).
#[derive(Default)]
struct Totals {
    words: usize,
    characters: usize,
    characters_without_spaces: usize,
}

impl Totals {
    fn record(&mut self, content: &str) {
        self.words += content.split(' ').count();
        self.characters += content.chars().count();
        self.characters_without_spaces += content.chars().filter(|c| *c != ' ').count();
    }
}

/// Hour, weekday and per-day histograms (private).
struct TemporalAggregates {
    first_day: NaiveDate,
    by_hour: Vec<usize>,
    by_weekday: Vec<usize>,
    by_weekly_hour: Vec<usize>,
    by_day: Vec<usize>,
}

impl TemporalAggregates {
    fn new(first_day: NaiveDate, days_in_range: usize) -> Self {
        Self {
            first_day,
            by_hour: vec![0; 24],
            by_weekday: vec![0; 7],
            by_weekly_hour: vec![0; 7 * 24],
            by_day: vec![0; days_in_range],
        }
    }

    fn record(&mut self, ts: &NaiveDateTime) {
        let hour = ts.hour() as usize;
        let weekday = ts.weekday().num_days_from_monday() as usize;
        let day_offset = (ts.date() - self.first_day).num_days() as usize;

        self.by_day[day_offset] += 1;
        self.by_hour[hour] += 1;
        self.by_weekday[weekday] += 1;
        self.by_weekly_hour[weekday * 24 + hour] += 1;
    }
}

/// Daily timeline and most-active-day tracking (private).
struct DailyActivity {
    cursor: DayCursor,
    active_days: usize,
    most_active_day: NaiveDateTime,
    most_messages_said: usize,
    messages_said_all_time: Vec<usize>,
}

impl DailyActivity {
    fn new(first: NaiveDateTime) -> Self {
        Self {
            cursor: DayCursor::new(first.date()),
            active_days: 1,
            most_active_day: first,
            most_messages_said: 0,
            messages_said_all_time: Vec::new(),
        }
    }

    fn record(&mut self, ts: NaiveDateTime) {
        let Some(finished) = self.cursor.record(ts.date()) else {
            return;
        };

        // The day that just ended, then a zero per fully skipped day, so the
        // series stays chronological: two messages on day one followed by
        // one on day three yields [2, 0].
        self.messages_said_all_time.push(finished.messages);
        for _ in 1..finished.days_elapsed {
            self.messages_said_all_time.push(0);
        }
        self.active_days += 1;

        // The marker takes the timestamp of the message that opened the new
        // day, not the date of the day holding the maximum.
        if finished.messages > self.most_messages_said {
            self.most_messages_said = finished.messages;
            self.most_active_day = ts;
        }
    }
}

/// Question, swear, URL and word counters (private).
struct LexicalAggregates {
    swear_patterns: Vec<String>,
    swears: usize,
    questions: usize,
    urls: Vec<String>,
    word_count: IndexMap<String, usize>,
}

impl LexicalAggregates {
    fn new(words: &WordLists) -> Self {
        Self {
            swear_patterns: words.swears.iter().map(|s| format!(" {} ", s)).collect(),
            swears: 0,
            questions: 0,
            urls: Vec::new(),
            word_count: IndexMap::new(),
        }
    }

    fn record(&mut self, content: &str) {
        if content.contains('?') {
            self.questions += 1;
        }

        let padded = format!(" {} ", content);
        if self.swear_patterns.iter().any(|p| padded.contains(p.as_str())) {
            self.swears += 1;
        }

        self.urls
            .extend(URL_PATTERN.find_iter(content).map(|m| m.as_str().to_string()));

        for token in content.split_whitespace() {
            if let Some(word) = normalize_word(token) {
                *self.word_count.entry(word).or_insert(0) += 1;
            }
        }
    }

    /// Word counts, most frequent first; equal counts keep first-seen order.
    fn sorted_words(self) -> Vec<(String, usize)> {
        let mut words: Vec<(String, usize)> = self.word_count.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1));
        words
    }
}

/// Lowercases a token and keeps its ASCII letters. Tokens carrying a URL
/// scheme, and tokens without letters, are not words.
fn normalize_word(token: &str) -> Option<String> {
    let lowered = token.to_lowercase();
    if URL_SCHEMES.iter().any(|scheme| lowered.contains(scheme)) {
        return None;
    }

    let word: String = lowered.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Builds a [`Statistics`] snapshot from messages sorted by timestamp.
///
/// Single forward pass over `messages`.
///
/// # Panics
///
/// `messages` must be non-empty and sorted ascending by timestamp. An empty
/// slice panics; unsorted input gives undefined results (and may panic on a
/// negative day offset).
pub fn build_statistics(messages: &[SharedMessage], words: &WordLists) -> Statistics {
    let first = &messages[0];
    let last = &messages[messages.len() - 1];
    let first_ts = first.timestamp;
    let last_ts = last.timestamp;
    let days_in_range = (last_ts.date() - first_ts.date()).num_days() as usize + 1;

    let mut totals = Totals::default();
    let mut temporal = TemporalAggregates::new(first_ts.date(), days_in_range);
    let mut daily = DailyActivity::new(first_ts);
    let mut lexical = LexicalAggregates::new(words);

    for message in messages {
        totals.record(&message.content);
        daily.record(message.timestamp);
        temporal.record(&message.timestamp);
        lexical.record(&message.content);
    }

    tracing::debug!(
        messages = messages.len(),
        days_in_range,
        active_days = daily.active_days,
        distinct_words = lexical.word_count.len(),
        "Built statistics"
    );

    Statistics {
        first_message_timestamp: first_ts,
        last_message_timestamp: last_ts,
        days_in_range,
        active_days: daily.active_days,
        first_message: QuotedMessage::from(first.as_ref()),
        last_message: QuotedMessage::from(last.as_ref()),
        total_messages: messages.len(),
        total_words: totals.words,
        total_characters: totals.characters,
        total_characters_without_spaces: totals.characters_without_spaces,
        active_hours: temporal.by_hour,
        active_days_of_week: temporal.by_weekday,
        active_weekly_hours: temporal.by_weekly_hour,
        active_days_all_time: temporal.by_day,
        swears: lexical.swears,
        questions: lexical.questions,
        urls: std::mem::take(&mut lexical.urls),
        word_freq: lexical.sorted_words(),
        most_active_day: daily.most_active_day,
        most_messages_said: daily.most_messages_said,
        messages_said_all_time: daily.messages_said_all_time,
    }
}
