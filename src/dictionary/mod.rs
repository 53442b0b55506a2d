//! Dictionary lookups against the free dictionary API.
//!
//! The API returns a list of entries per headword; only the first one is used.
//! Parsing keeps at most three meanings and two example sentences.

pub mod client;
pub mod worker;

pub use client::DictionaryClient;
pub use worker::LookupWorker;

use serde::{Deserialize, Serialize};

const MAX_MEANINGS: usize = 3;
const MAX_EXAMPLES: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("word '{0}' not found")]
    NotFound(String),

    #[error("dictionary API returned status {0}")]
    Api(u16),

    #[error("no entries returned for '{0}'")]
    Empty(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid dictionary URL '{0}'")]
    InvalidUrl(String),

    #[error("invalid response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    pub definition: String,
}

/// A looked-up word in the shape the application stores and displays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub meaning_text: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Deserialize)]
struct ApiEntry {
    word: String,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Deserialize)]
struct ApiDefinition {
    definition: String,
    #[serde(default)]
    example: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl From<ApiEntry> for DictionaryEntry {
    fn from(entry: ApiEntry) -> Self {
        let pronunciation = non_empty(&entry.phonetic)
            .or_else(|| entry.phonetics.iter().find_map(|p| non_empty(&p.text)))
            .unwrap_or_default()
            .to_string();

        let audio_url = entry
            .phonetics
            .iter()
            .find_map(|p| non_empty(&p.audio))
            .unwrap_or_default()
            .to_string();

        let mut meanings = Vec::new();
        let mut examples = Vec::new();
        for meaning in &entry.meanings {
            for def in &meaning.definitions {
                if meanings.len() < MAX_MEANINGS {
                    meanings.push(Meaning {
                        part_of_speech: meaning.part_of_speech.clone(),
                        definition: def.definition.clone(),
                    });
                }
                if let Some(example) = non_empty(&def.example) {
                    if examples.len() < MAX_EXAMPLES {
                        examples.push(example.to_string());
                    }
                }
            }
        }

        let meaning_text = meanings
            .iter()
            .map(|m| format!("({}) {}", m.part_of_speech, m.definition))
            .collect::<Vec<_>>()
            .join(" / ");

        Self {
            word: entry.word,
            pronunciation,
            audio_url,
            meanings,
            meaning_text,
            examples,
        }
    }
}

/// Parses a raw API response body. `None` when the API returned no entries.
pub fn parse_response(body: &str) -> Result<Option<DictionaryEntry>, serde_json::Error> {
    let entries: Vec<ApiEntry> = serde_json::from_str(body)?;
    Ok(entries.into_iter().next().map(DictionaryEntry::from))
}
