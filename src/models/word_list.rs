//! Searching and sorting for the "my words" screen.

use super::{ReviewableWord, Word};
use std::cmp::Reverse;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WordSort {
    #[default]
    Recent,
    Alphabetical,
    ReviewLevel,
}

/// Progress bucket shown as a badge next to each learned word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelClass {
    New,
    Learning,
    Familiar,
    Mastered,
}

impl LevelClass {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 => LevelClass::New,
            1..=2 => LevelClass::Learning,
            3..=4 => LevelClass::Familiar,
            _ => LevelClass::Mastered,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LevelClass::New => "new",
            LevelClass::Learning => "learning",
            LevelClass::Familiar => "familiar",
            LevelClass::Mastered => "mastered",
        }
    }
}

fn matches(term: &str, meaning: &str, query: &str) -> bool {
    query.is_empty()
        || term.to_lowercase().contains(&query.to_lowercase())
        || meaning.contains(query)
}

/// Filters learned words by `query` and orders them by `sort`.
pub fn learned_view<'a>(
    words: &'a [ReviewableWord],
    query: &str,
    sort: WordSort,
) -> Vec<&'a ReviewableWord> {
    let mut view: Vec<&ReviewableWord> = words
        .iter()
        .filter(|w| matches(&w.word, &w.meaning, query))
        .collect();

    match sort {
        WordSort::Recent => view.sort_by_key(|w| Reverse(w.learned_at)),
        WordSort::Alphabetical => view.sort_by_key(|w| w.word.to_lowercase()),
        WordSort::ReviewLevel => view.sort_by_key(|w| Reverse(w.review_level)),
    }
    view
}

/// Filters custom words by `query`. Only alphabetical sorting applies to them;
/// other orders keep insertion order.
pub fn custom_view<'a>(words: &'a [Word], query: &str, sort: WordSort) -> Vec<&'a Word> {
    let mut view: Vec<&Word> = words
        .iter()
        .filter(|w| matches(&w.word, &w.meaning, query))
        .collect();

    if sort == WordSort::Alphabetical {
        view.sort_by_key(|w| w.word.to_lowercase());
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn learned() -> Vec<ReviewableWord> {
        let base = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        [("mellow", "soft", 2), ("Arduous", "hard", 5), ("brisk", "quick", 0)]
            .iter()
            .enumerate()
            .map(|(i, (word, meaning, level))| {
                let mut w = ReviewableWord::learned(
                    &Word::new(i as i64 + 1, *word),
                    base + Duration::days(i as i64),
                );
                w.meaning = meaning.to_string();
                w.review_level = *level;
                w
            })
            .collect()
    }

    fn words_of<'a>(view: &[&'a ReviewableWord]) -> Vec<&'a str> {
        view.iter().map(|w| w.word.as_str()).collect()
    }

    #[test]
    fn test_recent_first() {
        let words = learned();
        let view = learned_view(&words, "", WordSort::Recent);
        assert_eq!(words_of(&view), vec!["brisk", "Arduous", "mellow"]);
    }

    #[test]
    fn test_review_level_descending() {
        let words = learned();
        let view = learned_view(&words, "", WordSort::ReviewLevel);
        assert_eq!(words_of(&view), vec!["Arduous", "mellow", "brisk"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_headword() {
        let words = learned();
        assert_eq!(words_of(&learned_view(&words, "ARD", WordSort::Recent)), vec!["Arduous"]);
        assert_eq!(words_of(&learned_view(&words, "quick", WordSort::Recent)), vec!["brisk"]);
        assert!(learned_view(&words, "QUICK", WordSort::Recent).is_empty());
    }

    #[test]
    fn test_custom_view_keeps_order_unless_alphabetical() {
        let words = vec![Word::new(20, "zeal"), Word::new(10, "apt")];
        let ids: Vec<i64> = custom_view(&words, "", WordSort::ReviewLevel)
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![20, 10]);
        let ids: Vec<i64> = custom_view(&words, "", WordSort::Alphabetical)
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn test_level_classes() {
        assert_eq!(LevelClass::for_level(0), LevelClass::New);
        assert_eq!(LevelClass::for_level(2), LevelClass::Learning);
        assert_eq!(LevelClass::for_level(4), LevelClass::Familiar);
        assert_eq!(LevelClass::for_level(5).label(), "mastered");
    }
}
