//! JSON backup of the learned word list.
//! Saves and loads the full review state, field names in camelCase
//! (`learnedAt`, `reviewLevel`, `reviewCount`, `nextReviewDate`, `lastReviewedAt`).

use crate::error::AppResult;
use crate::models::ReviewableWord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the learned words to a JSON file at `path`.
pub fn export_learned_words(words: &[ReviewableWord], path: &Path) -> AppResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, words)?;
    writer.flush()?;
    tracing::info!(count = words.len(), path = %path.display(), "learned words exported");
    Ok(())
}

/// Reads learned words from a JSON file.
/// Fails if the file doesn't exist or isn't a list of learned words.
pub fn import_learned_words(path: &Path) -> AppResult<Vec<ReviewableWord>> {
    let reader = BufReader::new(File::open(path)?);
    let words: Vec<ReviewableWord> = serde_json::from_reader(reader)?;
    tracing::info!(count = words.len(), path = %path.display(), "learned words imported");
    Ok(words)
}
