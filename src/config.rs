/// Analysis configuration: word lists and display-name aliases.
///
/// Loaded once at startup and passed explicitly to the aggregator, the
/// partitioner and the person profiles.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_SWEARS: &[&str] = &[
    "damn", "dammit", "darn", "hell", "crap", "shit", "fuck", "fucking", "bitch", "bastard",
    "ass", "asshole", "bullshit", "piss", "wtf", "omfg",
];

const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "dont", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "im", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

const DEFAULT_RESPONSES: &[&str] = &[
    "lol", "lmao", "haha", "hahaha", "xd", "ok", "okay", "k", "thanks", "thank you", "thx", "ty",
    "nice", "cool", "good job", "great", "awesome", "yes", "yeah", "yep", "no", "nope", "sure",
    "same", "oh", "wow", "rip", "gg",
];

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_swears() -> Vec<String> {
    to_strings(DEFAULT_SWEARS)
}

fn default_stopwords() -> Vec<String> {
    to_strings(DEFAULT_STOPWORDS)
}

fn default_responses() -> Vec<String> {
    to_strings(DEFAULT_RESPONSES)
}

/// Phrase lists consulted while analysing message content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordLists {
    /// Matched as space-delimited phrases, case sensitive.
    #[serde(default = "default_swears")]
    pub swears: Vec<String>,
    /// Only used by renderers to filter word frequencies.
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
    /// Short acknowledgement phrases, matched against lowercased content.
    #[serde(default = "default_responses")]
    pub responses: Vec<String>,
}

impl Default for WordLists {
    fn default() -> Self {
        Self {
            swears: default_swears(),
            stopwords: default_stopwords(),
            responses: default_responses(),
        }
    }
}

impl WordLists {
    pub fn is_stopword(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        self.stopwords.iter().any(|s| *s == lowered)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Name as it appears in the log -> name to display.
    #[serde(default)]
    pub name_map: HashMap<String, String>,
    #[serde(flatten)]
    pub words: WordLists,
}

impl AnalysisConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AnalysisConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

        tracing::debug!(
            aliases = config.name_map.len(),
            swears = config.words.swears.len(),
            responses = config.words.responses.len(),
            "Loaded analysis config from {}",
            path.display()
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "name_map": { "+15550100": "Bob" } }"#).unwrap();
        assert_eq!(config.name_map.get("+15550100").map(String::as_str), Some("Bob"));
        assert!(config.words.swears.iter().any(|s| s == "darn"));
        assert!(config.words.responses.iter().any(|s| s == "lol"));
        assert!(!config.words.stopwords.is_empty());
    }

    #[test]
    fn test_lists_override_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "swears": ["heck"], "responses": [] }"#).unwrap();
        assert_eq!(config.words.swears, vec!["heck".to_string()]);
        assert!(config.words.responses.is_empty());
        assert!(config.name_map.is_empty());
    }

    #[test]
    fn test_is_stopword_ignores_case() {
        let words = WordLists::default();
        assert!(words.is_stopword("The"));
        assert!(!words.is_stopword("pizza"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "name_map": { "a": "Alice" }, "stopwords": ["x"] }"#)
            .unwrap();

        let config = AnalysisConfig::load_from_file(&path).unwrap();
        assert_eq!(config.name_map.get("a").map(String::as_str), Some("Alice"));
        assert_eq!(config.words.stopwords, vec!["x".to_string()]);
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AnalysisConfig::load_from_file(&path).unwrap_err();
        assert!(format!("{:?}", err).contains("Failed to parse JSON"));
    }
}
