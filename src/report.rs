/// Serializable report of an analysed conversation.
///
/// The JSON form lists every message, the conversation statistics and one
/// entry per person; object keys are written in sorted order.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::conversation::Conversation;
use crate::person::Person;
use crate::stats::Statistics;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PersonReport {
    pub analysis: Statistics,
    pub messages: Vec<String>,
    pub messages_all_time: Vec<usize>,
    pub common_responses: Vec<String>,
    pub random_quote: String,
}

impl From<&Person> for PersonReport {
    fn from(person: &Person) -> Self {
        Self {
            analysis: person.analysis.clone(),
            messages: person.messages.iter().map(|m| m.to_string()).collect(),
            messages_all_time: person.messages_all_time.clone(),
            common_responses: person.common_responses.clone(),
            random_quote: person.random_quote.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Report {
    pub messages: Vec<String>,
    pub analysis: Statistics,
    /// Display name of the first message's author.
    pub first_message_author: String,
    /// Display names in order of first appearance.
    pub user_order: Vec<String>,
    pub users: BTreeMap<String, PersonReport>,
}

impl Report {
    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            messages: conversation.messages.iter().map(|m| m.to_string()).collect(),
            analysis: conversation.analysis.clone(),
            first_message_author: conversation
                .display_name(&conversation.analysis.first_message.username),
            user_order: conversation.persons.keys().cloned().collect(),
            users: conversation
                .persons
                .iter()
                .map(|(name, person)| (name.clone(), PersonReport::from(person)))
                .collect(),
        }
    }

    /// Persons in order of first appearance.
    pub fn users_in_order(&self) -> impl Iterator<Item = (&str, &PersonReport)> {
        self.user_order
            .iter()
            .filter_map(|name| self.users.get(name).map(|user| (name.as_str(), user)))
    }

    /// Pretty JSON with sorted object keys.
    pub fn to_json(&self) -> Result<String> {
        // Going through `Value` sorts keys (serde_json maps are ordered by key).
        let value = serde_json::to_value(self).context("Failed to serialize report")?;
        serde_json::to_string_pretty(&value).context("Failed to format report JSON")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stats file: {}", path.display()))?;

        let report: Report = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::source::{BracketLineExtractor, LineSplitter};
    use jsonschema::{Draft, JSONSchema};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    const LOG: &str = "\
2017-01-01T10:00:00 <zed> first!
2017-01-01T10:05:00 <amy> hi zed https://example.com
2017-01-02T09:00:00 <zed> lol";

    fn sample_report() -> Report {
        let mut config = AnalysisConfig::default();
        config.name_map.insert("zed".to_string(), "Zed".to_string());
        let conversation = Conversation::from_texts(
            [LOG],
            &LineSplitter,
            &BracketLineExtractor,
            &config,
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        Report::from_conversation(&conversation)
    }

    fn load_schema() -> JSONSchema {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("report_schema.json");
        let content = std::fs::read_to_string(path).expect("Failed to read schema");
        let schema: serde_json::Value = serde_json::from_str(&content).expect("Invalid schema JSON");
        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .expect("Failed to compile schema")
    }

    #[test]
    fn test_report_contents() {
        let report = sample_report();

        assert_eq!(report.messages[0], "2017-01-01 10:00:00 zed: first!");
        assert_eq!(report.first_message_author, "Zed");
        assert_eq!(report.user_order, vec!["Zed", "amy"]);
        assert_eq!(report.users["Zed"].analysis.total_messages, 2);
        assert_eq!(report.users["Zed"].common_responses, vec!["lol"]);
        assert_eq!(report.users["amy"].messages_all_time, vec![0, 0]);

        let order: Vec<&str> = report.users_in_order().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["Zed", "amy"]);
    }

    #[test]
    fn test_json_keys_sorted() {
        let json = sample_report().to_json().unwrap();
        let analysis = json.find("\"analysis\"").unwrap();
        let messages = json.find("\"messages\"").unwrap();
        let users = json.find("\"users\"").unwrap();
        assert!(analysis < messages && messages < users);
    }

    #[test]
    fn test_save_and_load() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        report.save(&path).unwrap();
        let loaded = Report::load_from_file(&path).unwrap();
        assert_eq!(loaded, report);
    }

    fn validate_report(value: &serde_json::Value, schema: &JSONSchema) -> Result<()> {
        match schema.validate(value) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let messages: Vec<String> = errors
                    .map(|e| format!("  - {}: {}", e.instance_path, e))
                    .collect();
                anyhow::bail!("Report validation failed:\n{}", messages.join("\n"))
            }
        }
    }

    #[test]
    fn test_report_matches_schema() -> Result<()> {
        let schema = load_schema();
        let value = serde_json::to_value(sample_report())?;
        validate_report(&value, &schema)
    }

    #[test]
    fn test_schema_rejects_short_histogram() {
        let schema = load_schema();
        let mut value = serde_json::to_value(sample_report()).unwrap();
        value["analysis"]["active_hours"] = serde_json::json!([1, 2, 3]);
        assert!(!schema.is_valid(&value));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Report::load_from_file(Path::new("/nonexistent/stats.json")).unwrap_err();
        assert!(format!("{:?}", err).contains("Failed to read stats file"));
    }
}
