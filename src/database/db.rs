//! Database operations for the vocabulary application
//!
//! Handles SQLite initialization and CRUD for learned words, custom words,
//! known word ids, folders, and the dictionary lookup cache. Review state is
//! written back exactly as the scheduler returns it.

use crate::dictionary::DictionaryEntry;
use crate::models::{Folder, ReviewableWord, Word};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use std::path::Path;

const SELECTED_SET_KEY: &str = "selected_word_set";

/// Opens (or creates) the database file and makes sure every table exists
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    tracing::info!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Creates tables for learned words, custom words, known ids, folders,
/// the dictionary cache and app state.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS learned_words (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id INTEGER NOT NULL UNIQUE,
            word TEXT NOT NULL,
            meaning TEXT NOT NULL DEFAULT '',
            pronunciation TEXT NOT NULL DEFAULT '',
            audio_url TEXT NOT NULL DEFAULT '',
            examples TEXT NOT NULL DEFAULT '[]',
            learned_at TEXT NOT NULL,
            review_level INTEGER NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            next_review_date TEXT,
            last_reviewed_at TEXT
        );

        CREATE TABLE IF NOT EXISTS custom_words (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id INTEGER NOT NULL UNIQUE,
            word TEXT NOT NULL,
            meaning TEXT NOT NULL DEFAULT '',
            pronunciation TEXT NOT NULL DEFAULT '',
            audio_url TEXT NOT NULL DEFAULT '',
            examples TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS known_words (
            word_id INTEGER PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS folders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS folder_words (
            folder_id INTEGER NOT NULL,
            word_id INTEGER NOT NULL,
            PRIMARY KEY (folder_id, word_id),
            FOREIGN KEY (folder_id) REFERENCES folders(id) ON DELETE CASCADE,
            FOREIGN KEY (word_id) REFERENCES custom_words(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS word_cache (
            word TEXT PRIMARY KEY,
            entry TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
}

fn examples_to_sql(examples: &[String]) -> Result<String> {
    serde_json::to_string(examples)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn examples_from_row(row: &Row, idx: usize) -> Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Negative counters from a hand-edited database read as 0. The scheduler
/// clamps review levels at the upper end.
fn counter_from_row(row: &Row, idx: usize) -> Result<u32> {
    let raw: i64 = row.get(idx)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}

const LEARNED_COLUMNS: &str = "id, word, meaning, pronunciation, audio_url, examples, learned_at,
     review_level, review_count, next_review_date, last_reviewed_at";

fn learned_from_row(row: &Row) -> Result<ReviewableWord> {
    Ok(ReviewableWord {
        id: row.get(0)?,
        word: row.get(1)?,
        meaning: row.get(2)?,
        pronunciation: row.get(3)?,
        audio_url: row.get(4)?,
        examples: examples_from_row(row, 5)?,
        learned_at: row.get(6)?,
        review_level: counter_from_row(row, 7)?,
        review_count: counter_from_row(row, 8)?,
        next_review_date: row.get(9)?,
        last_reviewed_at: row.get(10)?,
    })
}

const WORD_COLUMNS: &str = "id, word, meaning, pronunciation, audio_url, examples";

fn custom_from_row(row: &Row) -> Result<Word> {
    Ok(Word {
        id: row.get(0)?,
        word: row.get(1)?,
        meaning: row.get(2)?,
        pronunciation: row.get(3)?,
        audio_url: row.get(4)?,
        examples: examples_from_row(row, 5)?,
        is_custom: true,
    })
}

/// Adds a word to the review pool
///
/// Returns false when a word with the same id is already learned; the
/// existing record is left untouched.
pub fn add_learned_word(word: &ReviewableWord, conn: &Connection) -> Result<bool> {
    let inserted = conn.execute(
        &format!(
            "INSERT OR IGNORE INTO learned_words ({LEARNED_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        params![
            word.id,
            word.word,
            word.meaning,
            word.pronunciation,
            word.audio_url,
            examples_to_sql(&word.examples)?,
            word.learned_at,
            word.review_level,
            word.review_count,
            word.next_review_date,
            word.last_reviewed_at,
        ],
    )?;

    if inserted > 0 {
        tracing::info!(id = word.id, word = %word.word, "word learned");
    }
    Ok(inserted > 0)
}

/// Writes back the review state of a learned word after a review decision
///
/// Only the review fields are updated; `learned_at` and the descriptive
/// content keep their stored values.
pub fn update_learned_word(word: &ReviewableWord, conn: &Connection) -> Result<()> {
    let updated = conn.execute(
        "UPDATE learned_words
         SET review_level = ?1, review_count = ?2, next_review_date = ?3, last_reviewed_at = ?4
         WHERE id = ?5",
        params![
            word.review_level,
            word.review_count,
            word.next_review_date,
            word.last_reviewed_at,
            word.id
        ],
    )?;

    if updated == 0 {
        tracing::warn!(id = word.id, "review update for a word that is not learned");
    }
    Ok(())
}

/// Stores dictionary content filled in after a word was learned
///
/// Review fields are left as they are.
pub fn update_learned_content(word: &ReviewableWord, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE learned_words
         SET meaning = ?1, pronunciation = ?2, audio_url = ?3, examples = ?4
         WHERE id = ?5",
        params![
            word.meaning,
            word.pronunciation,
            word.audio_url,
            examples_to_sql(&word.examples)?,
            word.id
        ],
    )?;
    Ok(())
}

pub fn remove_learned_word(id: i64, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM learned_words WHERE id = ?1", params![id])?;
    tracing::info!(id, "word removed from review pool");
    Ok(())
}

/// Retrieves all learned words in the order they were learned
pub fn get_learned_words(conn: &Connection) -> Result<Vec<ReviewableWord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LEARNED_COLUMNS} FROM learned_words ORDER BY seq"
    ))?;
    let words = stmt
        .query_map([], learned_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(words)
}

/// Inserts every record whose id is not learned yet, returning how many were added
///
/// Runs in one transaction: a failed insert leaves the table as it was.
pub fn restore_learned_words(words: &[ReviewableWord], conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut added = 0;
    for word in words {
        if add_learned_word(word, &tx)? {
            added += 1;
        }
    }
    tx.commit()?;
    Ok(added)
}

pub fn add_custom_word(word: &Word, conn: &Connection) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO custom_words ({WORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        params![
            word.id,
            word.word,
            word.meaning,
            word.pronunciation,
            word.audio_url,
            examples_to_sql(&word.examples)?,
        ],
    )?;
    tracing::info!(id = word.id, word = %word.word, "custom word added");
    Ok(())
}

/// Stores looked-up content for a custom word
pub fn update_custom_word(word: &Word, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE custom_words
         SET meaning = ?1, pronunciation = ?2, audio_url = ?3, examples = ?4
         WHERE id = ?5",
        params![
            word.meaning,
            word.pronunciation,
            word.audio_url,
            examples_to_sql(&word.examples)?,
            word.id
        ],
    )?;
    Ok(())
}

/// Deletes a custom word and its folder memberships
pub fn remove_custom_word(id: i64, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM custom_words WHERE id = ?1", params![id])?;
    Ok(())
}

pub fn get_custom_words(conn: &Connection) -> Result<Vec<Word>> {
    let mut stmt = conn.prepare(&format!("SELECT {WORD_COLUMNS} FROM custom_words ORDER BY seq"))?;
    let words = stmt
        .query_map([], custom_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(words)
}

/// Marks a word as already known so it never shows up in study mode
pub fn mark_known(word_id: i64, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO known_words (word_id) VALUES (?1)",
        params![word_id],
    )?;
    Ok(())
}

pub fn get_known_ids(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT word_id FROM known_words ORDER BY word_id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>>>()?;
    Ok(ids)
}

/// Creates a folder; blank names are ignored and yield `None`
pub fn create_folder(name: &str, now: DateTime<Utc>, conn: &Connection) -> Result<Option<Folder>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    conn.execute(
        "INSERT INTO folders (name, created_at) VALUES (?1, ?2)",
        params![name, now],
    )?;
    let folder = Folder {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        created_at: now,
    };
    tracing::info!(id = folder.id, name = %folder.name, "folder created");
    Ok(Some(folder))
}

/// Retrieves all folders, newest first
pub fn get_folders(conn: &Connection) -> Result<Vec<Folder>> {
    let mut stmt =
        conn.prepare("SELECT id, name, created_at FROM folders ORDER BY created_at DESC, id DESC")?;
    let folders = stmt
        .query_map([], |row| {
            Ok(Folder {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(folders)
}

pub fn delete_folder(id: i64, conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM folders WHERE id = ?1", params![id])?;
    tracing::info!(id, "folder deleted");
    Ok(())
}

pub fn add_word_to_folder(folder_id: i64, word_id: i64, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO folder_words (folder_id, word_id) VALUES (?1, ?2)",
        params![folder_id, word_id],
    )?;
    Ok(())
}

pub fn remove_word_from_folder(folder_id: i64, word_id: i64, conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM folder_words WHERE folder_id = ?1 AND word_id = ?2",
        params![folder_id, word_id],
    )?;
    Ok(())
}

/// Retrieves the custom words filed in a folder, in the order they were added as custom words
pub fn get_folder_words(folder_id: i64, conn: &Connection) -> Result<Vec<Word>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.word, c.meaning, c.pronunciation, c.audio_url, c.examples
         FROM custom_words c
         JOIN folder_words f ON f.word_id = c.id
         WHERE f.folder_id = ?1
         ORDER BY c.seq",
    )?;
    let words = stmt
        .query_map(params![folder_id], custom_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(words)
}

/// Caches a dictionary entry under the headword that was looked up
pub fn cache_entry(headword: &str, entry: &DictionaryEntry, conn: &Connection) -> Result<()> {
    let json = serde_json::to_string(entry)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        "INSERT OR REPLACE INTO word_cache (word, entry) VALUES (?1, ?2)",
        params![headword.trim().to_lowercase(), json],
    )?;
    Ok(())
}

/// Returns the cached entry for a headword; unreadable cache rows count as missing
pub fn get_cached_entry(headword: &str, conn: &Connection) -> Result<Option<DictionaryEntry>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT entry FROM word_cache WHERE word = ?1",
            params![headword.trim().to_lowercase()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(raw.and_then(|json| match serde_json::from_str(&json) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(headword, "discarding unreadable cache entry: {e}");
            None
        }
    }))
}

pub fn get_selected_set(conn: &Connection) -> Result<Option<u32>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![SELECTED_SET_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(raw.and_then(|v| v.parse().ok()))
}

pub fn set_selected_set(number: u32, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        params![SELECTED_SET_KEY, number.to_string()],
    )?;
    Ok(())
}
