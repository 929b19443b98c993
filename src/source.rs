/// Pluggable parsing strategies for chat log sources.
///
/// Log formats differ per chat client, so the coordinator only relies on
/// three capabilities: ordering source identifiers, splitting raw text into
/// candidate message strings, and turning one candidate into message parts.

/// Message fields as produced by an extractor, before timestamp parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub username: String,
    pub content: String,
    /// `yyyy-mm-ddThh:mm:ss`, optionally followed by `.fraction`.
    pub timestamp: String,
    pub raw: String,
}

/// Splits the raw text of one source into candidate message strings.
pub trait MessageSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Turns a candidate string into a message, or `None` if the line is not a
/// message (headers, system notices, blank lines).
pub trait MessageExtractor {
    fn extract(&self, line: &str) -> Option<ExtractedMessage>;
}

/// Puts source identifiers into chronological order.
pub trait SourceOrder {
    fn order(&self, sources: Vec<String>) -> Vec<String>;
}

/// One message per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineSplitter;

impl MessageSplitter for LineSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }
}

/// Lines shaped like `2017-01-01T10:00:00 <alice> hello`.
///
/// Lines starting with `--` are comments.
#[derive(Debug, Default, Clone, Copy)]
pub struct BracketLineExtractor;

impl MessageExtractor for BracketLineExtractor {
    fn extract(&self, line: &str) -> Option<ExtractedMessage> {
        if line.starts_with("--") {
            return None;
        }

        let (timestamp, rest) = line.split_once(' ')?;
        let rest = rest.strip_prefix('<')?;
        let (username, content) = rest.split_once("> ")?;
        if timestamp.is_empty() || username.is_empty() {
            return None;
        }

        Some(ExtractedMessage {
            username: username.to_string(),
            content: content.to_string(),
            timestamp: timestamp.to_string(),
            raw: line.to_string(),
        })
    }
}

/// Lexical order of identifiers; works for date-stamped file names.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalOrder;

impl SourceOrder for LexicalOrder {
    fn order(&self, mut sources: Vec<String>) -> Vec<String> {
        sources.sort();
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_splitter_trims_carriage_returns() {
        let lines = LineSplitter.split("a\r\nb\nc");
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bracket_extractor() {
        let msg = BracketLineExtractor
            .extract("2017-01-01T10:00:00 <alice> hello > world")
            .unwrap();
        assert_eq!(msg.username, "alice");
        assert_eq!(msg.content, "hello > world");
        assert_eq!(msg.timestamp, "2017-01-01T10:00:00");
        assert_eq!(msg.raw, "2017-01-01T10:00:00 <alice> hello > world");
    }

    #[test]
    fn test_bracket_extractor_rejects() {
        assert!(BracketLineExtractor.extract("-- log opened").is_none());
        assert!(BracketLineExtractor.extract("").is_none());
        assert!(BracketLineExtractor
            .extract("2017-01-01T10:00:00 * alice waves")
            .is_none());
        assert!(BracketLineExtractor
            .extract("2017-01-01T10:00:00 <alice>")
            .is_none());
    }

    #[test]
    fn test_lexical_order() {
        let ordered = LexicalOrder.order(vec![
            "chat - 2018".to_string(),
            "chat - 2017".to_string(),
        ]);
        assert_eq!(ordered, vec!["chat - 2017", "chat - 2018"]);
    }
}
