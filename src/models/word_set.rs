//! Word sets are numbered, named lists of built-in headwords
use super::Word;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WordSet {
    pub number: u32,
    pub name: String,
    pub headwords: Vec<String>,
}

impl WordSet {
    /// Study words for this set.
    ///
    /// Ids are `number * 1000 + position` (position starting at 1), so words of
    /// different sets never share an id.
    pub fn words(&self) -> Vec<Word> {
        let base = i64::from(self.number) * 1000;
        self.headwords
            .iter()
            .enumerate()
            .map(|(i, headword)| Word::new(base + i as i64 + 1, headword.clone()))
            .collect()
    }
}

/// Sets shipped with the application.
pub fn builtin_sets() -> Vec<WordSet> {
    let set = |number: u32, name: &str, headwords: &[&str]| WordSet {
        number,
        name: name.to_string(),
        headwords: headwords.iter().map(|h| h.to_string()).collect(),
    };

    vec![
        set(
            1,
            "Everyday verbs",
            &[
                "abandon", "accept", "achieve", "acquire", "adapt", "admire", "afford", "allow",
                "announce", "apply", "argue", "arrange", "attempt", "avoid", "borrow", "consider",
            ],
        ),
        set(
            2,
            "Academic vocabulary",
            &[
                "analyze", "approach", "assess", "assume", "authority", "benefit", "concept",
                "consist", "context", "derive", "distribute", "economy", "environment", "establish",
                "estimate", "evident",
            ],
        ),
        set(
            3,
            "Describing people",
            &[
                "ambitious", "candid", "cautious", "diligent", "generous", "humble", "impulsive",
                "meticulous", "modest", "naive", "obstinate", "reliable", "sincere", "stubborn",
                "tactful", "witty",
            ],
        ),
    ]
}
