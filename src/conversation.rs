/// Conversation pipeline: extract messages from sources, merge and sort
/// them, then build the global statistics and one profile per person.
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use rand::Rng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::message::{Message, SharedMessage};
use crate::partition::{display_name, partition_by_user};
use crate::person::{Person, TimelineSpan};
use crate::source::{MessageExtractor, MessageSplitter, SourceOrder};
use crate::stats::Statistics;
use crate::stats_builder::build_statistics;

/// Messages pulled out of one source.
#[derive(Debug, Default)]
pub struct Extraction {
    pub messages: Vec<Message>,
    /// Lines the extractor did not recognise as messages.
    pub rejected: usize,
    /// Lines accepted by the extractor whose timestamp did not parse.
    pub invalid: usize,
}

/// Splits `text` into candidate lines and extracts a message from each.
pub fn extract_messages(
    text: &str,
    splitter: &dyn MessageSplitter,
    extractor: &dyn MessageExtractor,
) -> Extraction {
    let mut extraction = Extraction::default();

    for line in splitter.split(text) {
        let Some(parts) = extractor.extract(line) else {
            extraction.rejected += 1;
            continue;
        };

        match Message::from_parts(&parts.username, &parts.content, &parts.timestamp, &parts.raw) {
            Ok(message) => extraction.messages.push(message),
            Err(e) => {
                tracing::warn!("Skipping line with bad timestamp: {:#}", e);
                extraction.invalid += 1;
            }
        }
    }

    extraction
}

/// Expands glob patterns into source paths, in the order given by `order`.
pub fn find_sources(patterns: &[String], order: &dyn SourceOrder) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for pattern in patterns {
        let paths =
            glob::glob(pattern).with_context(|| format!("Invalid input pattern: {}", pattern))?;
        for path in paths {
            let path = path.with_context(|| format!("Failed to read match for: {}", pattern))?;
            found.push(path.to_string_lossy().into_owned());
        }
    }

    Ok(order.order(found).into_iter().map(PathBuf::from).collect())
}

/// A fully analysed conversation.
#[derive(Debug)]
pub struct Conversation {
    /// All messages, ascending by timestamp.
    pub messages: Vec<SharedMessage>,
    pub analysis: Statistics,
    /// Display name -> profile, in order of each name's first message.
    pub persons: IndexMap<String, Person>,
    pub name_map: HashMap<String, String>,
}

impl Conversation {
    /// Builds a conversation from extracted messages in any order.
    ///
    /// Fails if `messages` is empty.
    pub fn from_messages<R: Rng + ?Sized>(
        mut messages: Vec<Message>,
        config: &AnalysisConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if messages.is_empty() {
            bail!("No messages found in the given sources");
        }

        // Stable: messages with equal timestamps keep source order.
        messages.sort_by_key(|m| m.timestamp);
        let messages: Vec<SharedMessage> = messages.into_iter().map(Arc::new).collect();

        let analysis = build_statistics(&messages, &config.words);
        let span = TimelineSpan::of(&analysis);

        let persons: IndexMap<String, Person> = partition_by_user(&messages, &config.name_map)
            .into_iter()
            .map(|(name, subset)| {
                let person = Person::build(name.clone(), subset, span, &config.words, rng);
                (name, person)
            })
            .collect();

        tracing::info!(
            messages = messages.len(),
            persons = persons.len(),
            days = analysis.days_in_range,
            "Conversation analysed"
        );

        Ok(Self {
            messages,
            analysis,
            persons,
            name_map: config.name_map.clone(),
        })
    }

    /// Builds a conversation from the raw text of each source, given in
    /// chronological source order.
    pub fn from_texts<'a, I, R>(
        texts: I,
        splitter: &dyn MessageSplitter,
        extractor: &dyn MessageExtractor,
        config: &AnalysisConfig,
        rng: &mut R,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
        R: Rng + ?Sized,
    {
        let mut messages = Vec::new();
        for (index, text) in texts.into_iter().enumerate() {
            let extraction = extract_messages(text, splitter, extractor);
            tracing::debug!(
                source = index,
                messages = extraction.messages.len(),
                rejected = extraction.rejected,
                invalid = extraction.invalid,
                "Extracted messages"
            );
            messages.extend(extraction.messages);
        }

        Self::from_messages(messages, config, rng)
    }

    /// Reads every file matching `patterns` and builds the conversation.
    pub fn load<R: Rng + ?Sized>(
        patterns: &[String],
        order: &dyn SourceOrder,
        splitter: &dyn MessageSplitter,
        extractor: &dyn MessageExtractor,
        config: &AnalysisConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let paths = find_sources(patterns, order)?;
        if paths.is_empty() {
            bail!("No input files match: {}", patterns.join(", "));
        }

        let mut texts = Vec::with_capacity(paths.len());
        for path in &paths {
            tracing::info!("Reading {}", path.display());
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read chat log: {}", path.display()))?;
            texts.push(text);
        }

        Self::from_texts(texts.iter().map(String::as_str), splitter, extractor, config, rng)
    }

    /// Display name for a username as it appears in the logs.
    pub fn display_name(&self, username: &str) -> String {
        display_name(username, &self.name_map)
    }
}
