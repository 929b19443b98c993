/// Splits a conversation into per-user message runs.
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::message::SharedMessage;

/// Escape text for embedding in HTML/Markdown markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Display name for a username: its alias if one is configured, escaped.
pub fn display_name(username: &str, name_map: &HashMap<String, String>) -> String {
    let name = name_map.get(username).map(String::as_str).unwrap_or(username);
    escape_html(name)
}

/// Groups messages by display name.
///
/// Each message lands in exactly one group, groups keep the order of
/// `messages`, and groups are ordered by the first message of each name.
/// Several usernames aliased to the same name share one group.
pub fn partition_by_user(
    messages: &[SharedMessage],
    name_map: &HashMap<String, String>,
) -> IndexMap<String, Vec<SharedMessage>> {
    let mut groups: IndexMap<String, Vec<SharedMessage>> = IndexMap::new();
    for message in messages {
        groups
            .entry(display_name(&message.username, name_map))
            .or_default()
            .push(message.clone());
    }

    tracing::debug!(users = groups.len(), "Partitioned messages by user");
    groups
}
