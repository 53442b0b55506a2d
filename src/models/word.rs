//! Word is a study candidate: a headword with its descriptive content.
use crate::dictionary::DictionaryEntry;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl Word {
    /// A bare headword with no looked-up content yet.
    pub fn new(id: i64, word: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
            meaning: String::new(),
            pronunciation: String::new(),
            audio_url: String::new(),
            examples: Vec::new(),
            is_custom: false,
        }
    }

    /// Copies dictionary content onto this word.
    ///
    /// Overwrites `pronunciation`, `audio_url` and `examples`. `meaning` is only
    /// filled when empty so a meaning typed by the learner is kept. `id`, `word`
    /// and `is_custom` are never touched.
    pub fn apply_entry(&mut self, entry: &DictionaryEntry) {
        self.pronunciation = entry.pronunciation.clone();
        self.audio_url = entry.audio_url.clone();
        self.examples = entry.examples.clone();
        if self.meaning.is_empty() {
            self.meaning = entry.meaning_text.clone();
        }
    }
}
