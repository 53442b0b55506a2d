//! Folders group custom words for focused study.
use super::Word;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Steps through the words of one folder in order.
#[derive(Clone, Debug, Default)]
pub struct FolderSession {
    pub folder_id: i64,
    pub words: Vec<Word>,
    pub current_index: usize,
    pub show_meaning: bool,
}

impl FolderSession {
    pub fn new(folder_id: i64, words: Vec<Word>) -> Self {
        Self {
            folder_id,
            words,
            current_index: 0,
            show_meaning: false,
        }
    }

    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.current_index)
    }

    pub fn toggle_meaning(&mut self) {
        self.show_meaning = !self.show_meaning;
    }

    pub fn next(&mut self) {
        if self.current_index + 1 < self.words.len() {
            self.current_index += 1;
            self.show_meaning = false;
        }
    }

    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
            self.show_meaning = false;
        }
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.words.len()
    }
}
