//! A learned word together with its spaced-repetition state.
use super::Word;
use crate::dictionary::DictionaryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewableWord {
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
    pub learned_at: DateTime<Utc>,
    #[serde(default)]
    pub review_level: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewableWord {
    /// Enters `word` into the review pool at level 0, due immediately.
    pub fn learned(word: &Word, now: DateTime<Utc>) -> Self {
        Self {
            id: word.id,
            word: word.word.clone(),
            meaning: word.meaning.clone(),
            pronunciation: word.pronunciation.clone(),
            audio_url: word.audio_url.clone(),
            examples: word.examples.clone(),
            learned_at: now,
            review_level: 0,
            review_count: 0,
            next_review_date: Some(now),
            last_reviewed_at: None,
        }
    }

    /// Fills content that is still empty from a dictionary entry.
    ///
    /// Review state is untouched. Returns true when any field changed.
    pub fn fill_missing(&mut self, entry: &DictionaryEntry) -> bool {
        let mut changed = false;
        if self.meaning.is_empty() && !entry.meaning_text.is_empty() {
            self.meaning = entry.meaning_text.clone();
            changed = true;
        }
        if self.pronunciation.is_empty() && !entry.pronunciation.is_empty() {
            self.pronunciation = entry.pronunciation.clone();
            changed = true;
        }
        if self.audio_url.is_empty() && !entry.audio_url.is_empty() {
            self.audio_url = entry.audio_url.clone();
            changed = true;
        }
        if self.examples.is_empty() && !entry.examples.is_empty() {
            self.examples = entry.examples.clone();
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_learned_starts_due_at_level_zero() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut word = Word::new(7, "candid");
        word.meaning = "truthful and straightforward".to_string();

        let learned = ReviewableWord::learned(&word, now);

        assert_eq!(learned.id, 7);
        assert_eq!(learned.meaning, word.meaning);
        assert_eq!(learned.learned_at, now);
        assert_eq!(learned.review_level, 0);
        assert_eq!(learned.review_count, 0);
        assert_eq!(learned.next_review_date, Some(now));
        assert_eq!(learned.last_reviewed_at, None);
    }

    fn entry() -> DictionaryEntry {
        DictionaryEntry {
            word: "abandon".to_string(),
            pronunciation: "/əˈbændən/".to_string(),
            audio_url: "https://example.org/abandon.mp3".to_string(),
            meanings: Vec::new(),
            meaning_text: "(verb) to leave behind".to_string(),
            examples: vec!["They abandoned the car.".to_string()],
        }
    }

    #[test]
    fn test_word_learned_before_lookup_gets_content_later() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut learned = ReviewableWord::learned(&Word::new(1001, "abandon"), now);
        learned.review_level = 2;
        assert!(learned.meaning.is_empty());

        assert!(learned.fill_missing(&entry()));
        assert_eq!(learned.meaning, "(verb) to leave behind");
        assert_eq!(learned.pronunciation, "/əˈbændən/");
        assert_eq!(learned.audio_url, "https://example.org/abandon.mp3");
        assert_eq!(learned.examples, vec!["They abandoned the car.".to_string()]);
        assert_eq!(learned.review_level, 2);
        assert_eq!(learned.learned_at, now);

        assert!(!learned.fill_missing(&entry()));
    }

    #[test]
    fn test_fill_missing_keeps_existing_content() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut word = Word::new(5, "abandon");
        word.meaning = "give up".to_string();
        let mut learned = ReviewableWord::learned(&word, now);

        assert!(learned.fill_missing(&entry()));
        assert_eq!(learned.meaning, "give up");
        assert_eq!(learned.examples.len(), 1);
    }

    #[test]
    fn test_json_field_names() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let learned = ReviewableWord::learned(&Word::new(1, "candid"), now);
        let value = serde_json::to_value(&learned).unwrap();

        for key in [
            "learnedAt",
            "reviewLevel",
            "reviewCount",
            "nextReviewDate",
            "lastReviewedAt",
            "audioUrl",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let json = r#"{
            "id": 4,
            "word": "lucid",
            "learnedAt": "2024-01-15T10:00:00Z"
        }"#;
        let parsed: ReviewableWord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.review_level, 0);
        assert_eq!(parsed.review_count, 0);
        assert_eq!(parsed.next_review_date, None);
        assert!(parsed.examples.is_empty());
    }
}
