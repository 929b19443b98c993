use crate::config::WordLists;
use crate::person::unique_responses;
use crate::report::{PersonReport, Report};
use crate::stats::{QuotedMessage, Statistics};
use crate::timefmt;
use anyhow::Result;

const URLS_SHOWN: usize = 8;
const COMMON_WORDS_SHOWN: usize = 15;
const PERSON_WORDS_SHOWN: usize = 30;
const PERSON_WORD_MIN_LEN: usize = 3;
const RESPONSES_SHOWN: usize = 15;
const BUSIEST_DAYS_SHOWN: usize = 5;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Render a conversation report to Markdown.
pub fn render(report: &Report, words: &WordLists) -> Result<String> {
    let mut output = String::new();
    let analysis = &report.analysis;

    // 1. Title and range
    render_header(&mut output, analysis);

    // 2. Overview, totals, averages, content
    render_overview(&mut output, analysis, report.users.len());
    render_totals(&mut output, analysis);
    render_averages(&mut output, analysis);
    render_content(&mut output, analysis);

    // 3. First message
    output.push_str("### 🥇 First Message Sent\n");
    render_quote(&mut output, &analysis.first_message, &report.first_message_author);

    // 4. Share of activity
    render_share(&mut output, report);

    // 5. Activity
    render_activity(&mut output, analysis);

    // 6. Common words
    render_common_words(&mut output, analysis, words);

    // 7. Per person
    output.push_str("## 👥 Per Person Statistics\n\n");
    for (name, user) in report.users_in_order() {
        render_person(&mut output, name, user, analysis, words);
    }

    Ok(output)
}

fn render_header(output: &mut String, analysis: &Statistics) {
    output.push_str("# 💬 Chat Statistics\n");
    output.push_str(&format!(
        "*{} to {} ({} days)*\n\n",
        timefmt::format_date(analysis.first_message_timestamp.date()),
        timefmt::format_date(analysis.last_message_timestamp.date()),
        format_number(analysis.days_in_range)
    ));

    output.push_str(&format!(
        "The most active day was **{} ({} messages)**.\n",
        timefmt::format_date(analysis.most_active_day.date()),
        format_number(analysis.most_messages_said)
    ));
    if let Some(ratio) = analysis.active_day_ratio() {
        output.push_str(&format!(
            "Active days account for **{:.2}%** of all days.\n",
            ratio
        ));
    }
    output.push('\n');
}

fn render_overview(output: &mut String, analysis: &Statistics, persons: usize) {
    output.push_str("### 📊 Overview\n");
    output.push_str(&format!("- 👥 **Persons involved:** {}\n", format_number(persons)));
    output.push_str(&format!(
        "- 🔥 **Active days:** {}\n",
        format_number(analysis.active_days)
    ));
    output.push_str(&format!(
        "- 💤 **Inactive days:** {}\n",
        format_number(analysis.inactive_days())
    ));
    output.push('\n');
}

fn render_totals(output: &mut String, analysis: &Statistics) {
    output.push_str("### 🧮 Totals\n");
    output.push_str("| Messages | Words | Characters | Chars. (no spaces) |\n");
    output.push_str("| -------- | ----- | ---------- | ------------------ |\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_number(analysis.total_messages),
        format_number(analysis.total_words),
        format_number(analysis.total_characters),
        format_number(analysis.total_characters_without_spaces)
    ));
}

fn render_averages(output: &mut String, analysis: &Statistics) {
    output.push_str("### ⚖️ Averages\n");
    output.push_str("| msg / day (active) | msg / day (all) | Words per message | Letters per word |\n");
    output.push_str("| ------------------ | --------------- | ----------------- | ---------------- |\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_ratio(analysis.messages_per_active_day()),
        format_ratio(analysis.messages_per_day()),
        format_ratio(analysis.words_per_message()),
        format_ratio(analysis.letters_per_word())
    ));
}

fn render_content(output: &mut String, analysis: &Statistics) {
    output.push_str("### 🗯️ Content\n");
    output.push_str(&format!("- 🤬 **Swears:** {}\n", format_number(analysis.swears)));
    output.push_str(&format!(
        "- ❓ **Questions:** {}\n",
        format_number(analysis.questions)
    ));
    output.push_str(&format!("- 🔗 **URLs:** {}\n", format_number(analysis.urls.len())));
    output.push('\n');

    if !analysis.urls.is_empty() {
        output.push_str("**Some URLs posted**\n\n");
        for url in analysis.urls.iter().take(URLS_SHOWN) {
            output.push_str(&format!("- <{}>\n", url));
        }
        output.push('\n');
    }
}

fn render_quote(output: &mut String, message: &QuotedMessage, author: &str) {
    output.push_str(&format!("> {}\n>\n> — *{}*\n\n", message.content, author));
}

fn render_share(output: &mut String, report: &Report) {
    output.push_str("### 🥧 Share of Activity\n");
    output.push_str("| Person | Messages | % of total |\n");
    output.push_str("| ------ | -------- | ---------- |\n");

    let total = report.analysis.total_messages;
    for (name, user) in report.users_in_order() {
        let messages = user.analysis.total_messages;
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            name,
            format_number(messages),
            format_ratio(percentage(messages, total))
        ));
    }
    output.push('\n');
}

fn render_activity(output: &mut String, analysis: &Statistics) {
    output.push_str("### 📈 Activity\n");

    // By weekday - horizontal display
    output.push_str("#### 📅 By weekday\n");
    output.push_str("| Mon | Tue | Wed | Thu | Fri | Sat | Sun |\n");
    output.push_str("| --- | --- | --- | --- | --- | --- | --- |\n");
    output.push('|');
    for count in &analysis.active_days_of_week {
        output.push_str(&format!(" {} |", format_number(*count)));
    }
    output.push_str("\n\n");

    // By hour - horizontal display in 2 tables (00-11 and 12-23)
    output.push_str("#### 🕐 By hour\n");
    output.push_str("| 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 08 | 09 | 10 | 11 |\n");
    output.push_str("| -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- |\n");
    output.push('|');
    for hour in 0..12 {
        let count = analysis.active_hours.get(hour).copied().unwrap_or(0);
        output.push_str(&format!(" {} |", format_number(count)));
    }
    output.push('\n');

    output.push_str("\n| 12 | 13 | 14 | 15 | 16 | 17 | 18 | 19 | 20 | 21 | 22 | 23 |\n");
    output.push_str("| -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- |\n");
    output.push('|');
    for hour in 12..24 {
        let count = analysis.active_hours.get(hour).copied().unwrap_or(0);
        output.push_str(&format!(" {} |", format_number(count)));
    }
    output.push_str("\n\n");

    // Busiest days
    let labels = timefmt::date_range(
        analysis.first_message_timestamp.date(),
        analysis.active_days_all_time.len(),
    );
    let mut days: Vec<(&String, usize)> = labels
        .iter()
        .zip(analysis.active_days_all_time.iter().copied())
        .filter(|(_, count)| *count > 0)
        .collect();
    days.sort_by(|a, b| b.1.cmp(&a.1));
    if !days.is_empty() {
        output.push_str("#### 📍 Busiest days\n");
        output.push_str("| Date | Messages |\n");
        output.push_str("| ---- | -------- |\n");
        for (date, count) in days.into_iter().take(BUSIEST_DAYS_SHOWN) {
            output.push_str(&format!("| {} | {} |\n", date, format_number(count)));
        }
        output.push('\n');
    }

    // Busiest hour of the week
    if let Some((day, hour, count)) = busiest_weekly_hour(&analysis.active_weekly_hours) {
        output.push_str(&format!(
            "- 🚀 **Busiest hour of the week:** {} {:02}:00 ({} messages)\n\n",
            day,
            hour,
            format_number(count)
        ));
    }
}

/// Weekday, hour and count of the busiest weekly slot; `None` when every
/// slot is empty or the busiest slot lies outside the week.
fn busiest_weekly_hour(slots: &[usize]) -> Option<(&'static str, usize, usize)> {
    let (slot, count) = slots
        .iter()
        .copied()
        .enumerate()
        .max_by_key(|(slot, count)| (*count, std::cmp::Reverse(*slot)))?;
    if count == 0 {
        return None;
    }
    let day = *WEEKDAYS.get(slot / 24)?;
    Some((day, slot % 24, count))
}

/// Per-day message counts of one person over the conversation's range.
fn render_timeline(output: &mut String, timeline: &[usize], conversation: &Statistics) {
    let labels = timefmt::date_range(conversation.first_message_timestamp.date(), timeline.len());
    let days: Vec<(&String, usize)> = labels
        .iter()
        .zip(timeline.iter().copied())
        .filter(|(_, count)| *count > 0)
        .collect();
    if days.is_empty() {
        return;
    }

    output.push_str("**Daily messages**\n\n");
    output.push_str("| Date | Messages |\n");
    output.push_str("| ---- | -------- |\n");
    for (date, count) in days {
        output.push_str(&format!("| {} | {} |\n", date, format_number(count)));
    }
    output.push('\n');
}

fn render_common_words(output: &mut String, analysis: &Statistics, words: &WordLists) {
    let top = analysis.top_words(words, 0, COMMON_WORDS_SHOWN);
    if top.is_empty() {
        return;
    }

    output.push_str("### 🔤 Commonly Used Words\n");
    output.push_str("| Rank | Word | Count |\n");
    output.push_str("| ---- | ---- | ----- |\n");
    for (i, (word, count)) in top.iter().enumerate() {
        output.push_str(&format!("| {} | {} | {} |\n", i + 1, word, format_number(*count)));
    }
    output.push_str("\n*Excluding common english stopwords.*\n\n");
}

fn render_person(
    output: &mut String,
    name: &str,
    user: &PersonReport,
    conversation: &Statistics,
    words: &WordLists,
) {
    let analysis = &user.analysis;
    output.push_str(&format!("### 🧑 {}\n", name));

    let top = analysis.top_words(words, PERSON_WORD_MIN_LEN, PERSON_WORDS_SHOWN);
    if !top.is_empty() {
        let listed: Vec<String> = top
            .iter()
            .map(|(word, count)| format!("{} ({})", word, count))
            .collect();
        output.push_str(&format!("**Common words:** {}\n\n", listed.join(", ")));
    }

    output.push_str("| Stat | Value |\n");
    output.push_str("| ---- | ----- |\n");
    output.push_str(&format!(
        "| Total messages | {} |\n",
        format_number(analysis.total_messages)
    ));
    output.push_str(&format!("| Total words | {} |\n", format_number(analysis.total_words)));
    output.push_str(&format!("| Active days | {} |\n", format_number(analysis.active_days)));
    output.push_str(&format!(
        "| Words per message | {} |\n",
        format_compared(analysis.words_per_message(), conversation.words_per_message())
    ));
    output.push_str(&format!(
        "| Chars per message | {} |\n",
        format_compared(
            analysis.characters_per_message(),
            conversation.characters_per_message()
        )
    ));
    output.push_str(&format!(
        "| Letters per word | {} |\n",
        format_compared(analysis.letters_per_word(), conversation.letters_per_word())
    ));
    output.push_str(&format!("| Swears | {} |\n", format_number(analysis.swears)));
    output.push_str(&format!("| Questions | {} |\n", format_number(analysis.questions)));
    output.push_str(&format!("| URLs | {} |\n", format_number(analysis.urls.len())));
    output.push('\n');

    render_timeline(output, &user.messages_all_time, conversation);

    output.push_str("**First message sent**\n\n");
    render_quote(output, &analysis.first_message, name);
    output.push_str("**Random quote**\n\n");
    output.push_str(&format!("> {}\n\n", user.random_quote));

    let responses = unique_responses(&user.common_responses, RESPONSES_SHOWN);
    if !responses.is_empty() {
        let badges: Vec<String> = responses.iter().map(|r| format!("`{}`", r)).collect();
        output.push_str(&format!("**Common responses:** {}\n\n", badges.join(" ")));
    }
}

fn percentage(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64 * 100.0)
    }
}

/// Format an optional ratio with two decimals, `-` when undefined.
fn format_ratio(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Format a value with its deviation from the conversation average.
fn format_compared(value: Option<f64>, average: Option<f64>) -> String {
    match (value, average) {
        (Some(value), Some(average)) if value >= average => {
            format!("{:.2} (+{:.2})", value, value - average)
        }
        (Some(value), Some(average)) => format!("{:.2} (-{:.2})", value, average - value),
        (value, _) => format_ratio(value),
    }
}

/// Format a number with thousand separators (raw integers, no abbreviation)
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped_rev = String::new();

    // Insert commas every three digits, starting from the right
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped_rev.push(',');
        }
        grouped_rev.push(ch);
    }

    grouped_rev.chars().rev().collect()
}
