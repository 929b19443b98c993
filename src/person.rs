/// Per-person profile: statistics for one participant plus the extras shown
/// in their section of a report.
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use rand::Rng;

use crate::config::WordLists;
use crate::message::SharedMessage;
use crate::stats::Statistics;
use crate::stats_builder::{build_statistics, DayCursor};

/// Sampling attempts spent looking for a quote longer than
/// [`QUOTE_MIN_WORDS`] words.
pub const QUOTE_ATTEMPTS: usize = 15;
pub const QUOTE_MIN_WORDS: usize = 5;
/// Responses are messages shorter than this many words.
pub const RESPONSE_MAX_WORDS: usize = 5;

/// Date range of the whole conversation, used to align person timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSpan {
    pub start: NaiveDate,
    pub days: usize,
}

impl TimelineSpan {
    pub fn new(first_timestamp: NaiveDateTime, days_in_range: usize) -> Self {
        Self {
            start: first_timestamp.date(),
            days: days_in_range,
        }
    }

    pub fn of(stats: &Statistics) -> Self {
        Self::new(stats.first_message_timestamp, stats.days_in_range)
    }
}

#[derive(Debug, Clone)]
pub struct Person {
    /// Display name (aliased and escaped).
    pub name: String,
    pub messages: Vec<SharedMessage>,
    pub analysis: Statistics,
    /// Messages per day over the conversation's range, not the person's.
    pub messages_all_time: Vec<usize>,
    pub random_quote: String,
    /// Short reactive messages; may contain duplicates.
    pub common_responses: Vec<String>,
}

impl Person {
    /// Builds a profile from one person's messages, in timestamp order.
    ///
    /// # Panics
    ///
    /// `messages` must be non-empty.
    pub fn build<R: Rng + ?Sized>(
        name: String,
        messages: Vec<SharedMessage>,
        span: TimelineSpan,
        words: &WordLists,
        rng: &mut R,
    ) -> Self {
        let analysis = build_statistics(&messages, words);
        let messages_all_time = messages_all_time(&messages, span);
        let random_quote = pick_quote(&messages, rng);
        let common_responses = common_responses(&messages, words);

        tracing::debug!(
            person = %name,
            messages = messages.len(),
            responses = common_responses.len(),
            "Built person profile"
        );

        Self {
            name,
            messages,
            analysis,
            messages_all_time,
            random_quote,
            common_responses,
        }
    }

    /// Distinct responses in first-seen order, at most `limit` of them.
    pub fn unique_responses(&self, limit: usize) -> Vec<&str> {
        unique_responses(&self.common_responses, limit)
    }

    /// Percentage of `total_messages` sent by this person.
    pub fn share_of(&self, total_messages: usize) -> Option<f64> {
        if total_messages == 0 {
            None
        } else {
            Some(self.analysis.total_messages as f64 / total_messages as f64 * 100.0)
        }
    }
}

/// Daily message counts aligned to the conversation's first day.
///
/// A day's count is written when the next active day starts, so the
/// person's last active day stays at zero.
pub fn messages_all_time(messages: &[SharedMessage], span: TimelineSpan) -> Vec<usize> {
    let mut timeline = vec![0; span.days];
    let mut cursor = DayCursor::new(messages[0].timestamp.date());

    for message in messages {
        if let Some(finished) = cursor.record(message.timestamp.date()) {
            let offset = (finished.date - span.start).num_days() as usize;
            timeline[offset] = finished.messages;
        }
    }

    timeline
}

/// Picks a random message, preferring one with more than
/// [`QUOTE_MIN_WORDS`] words. After [`QUOTE_ATTEMPTS`] draws the last draw
/// is kept whatever its length.
pub fn pick_quote<R: Rng + ?Sized>(messages: &[SharedMessage], rng: &mut R) -> String {
    let mut quote = "";
    for _ in 0..QUOTE_ATTEMPTS {
        quote = messages[rng.gen_range(0..messages.len())].content.as_str();
        if quote.split_whitespace().count() > QUOTE_MIN_WORDS {
            break;
        }
    }
    quote.to_string()
}

/// Distinct responses in first-seen order, at most `limit` of them.
pub fn unique_responses(responses: &[String], limit: usize) -> Vec<&str> {
    let distinct: IndexSet<&str> = responses.iter().map(String::as_str).collect();
    distinct.into_iter().take(limit).collect()
}

/// Contents of short messages containing a response phrase.
pub fn common_responses(messages: &[SharedMessage], words: &WordLists) -> Vec<String> {
    let patterns: Vec<String> = words.responses.iter().map(|r| format!(" {} ", r)).collect();

    messages
        .iter()
        .filter(|message| message.content.split_whitespace().count() < RESPONSE_MAX_WORDS)
        .filter(|message| {
            let padded = format!(" {} ", message.content.to_lowercase());
            patterns.iter().any(|p| padded.contains(p.as_str()))
        })
        .map(|message| message.content.clone())
        .collect()
}
