use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lexa_core::preprocess::capitalize;
use rusqlite::{Connection, ErrorCode, params};

use crate::error::BookmarkStoreError;

/// Outcome of [`BookmarkStore::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Persistent set of bookmarked words, stored in a `word_list` table
/// with a unique `word` column. The store is the only writer, so an
/// in-memory mirror answers membership queries.
pub struct BookmarkStore {
    conn: Option<Connection>,
    words: HashSet<String>,
    location: String,
}

impl BookmarkStore {
    /// Open (or create) the bookmark database at `path`
    pub fn open(path: &Path) -> Result<Self, BookmarkStoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn, path.display().to_string())
    }

    pub fn open_in_memory() -> Result<Self, BookmarkStoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self, BookmarkStoreError> {
        let mut store = Self {
            conn: Some(conn),
            words: HashSet::new(),
            location,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the table exists and resync the membership mirror.
    /// Safe to call any number of times.
    pub fn initialize(&mut self) -> Result<(), BookmarkStoreError> {
        self.conn()?
            .execute_batch("CREATE TABLE IF NOT EXISTS word_list (word TEXT NOT NULL UNIQUE);")?;

        self.words = self.list()?.into_iter().collect();
        tracing::info!(
            "Bookmark store ready at {} ({} words)",
            self.location,
            self.words.len()
        );
        Ok(())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&capitalize(word))
    }

    /// Insert `word`; if it is already bookmarked, remove it instead
    pub fn toggle(&mut self, word: &str) -> Result<Toggle, BookmarkStoreError> {
        let word = normalize(word)?;
        let conn = self.conn()?;

        match conn.execute("INSERT INTO word_list (word) VALUES (?1)", params![word]) {
            Ok(_) => {
                tracing::debug!("Bookmarked {word}");
                self.words.insert(word);
                Ok(Toggle::Added)
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                conn.execute("DELETE FROM word_list WHERE word = ?1", params![word])?;
                tracing::debug!("Removed bookmark {word}");
                self.words.remove(&word);
                Ok(Toggle::Removed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove `word` once `confirm` agrees. Returns whether a row was deleted.
    pub fn delete<F>(&mut self, word: &str, confirm: F) -> Result<bool, BookmarkStoreError>
    where
        F: FnOnce() -> bool,
    {
        let word = normalize(word)?;
        self.conn()?;

        if !confirm() {
            tracing::debug!("Deletion of {word} declined");
            return Ok(false);
        }

        let removed = self
            .conn()?
            .execute("DELETE FROM word_list WHERE word = ?1", params![word])?;
        self.words.remove(&word);

        Ok(removed > 0)
    }

    /// All bookmarks in storage order
    pub fn list(&self) -> Result<Vec<String>, BookmarkStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT word FROM word_list ORDER BY rowid")?;
        let words = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the database handle. Later calls are no-ops.
    pub fn shutdown(&mut self) -> Result<(), BookmarkStoreError> {
        let Some(conn) = self.conn.take() else {
            tracing::debug!("Bookmark store {} already closed", self.location);
            return Ok(());
        };

        self.words.clear();
        conn.close().map_err(|(_, e)| e)?;
        tracing::info!("Bookmark store {} closed", self.location);
        Ok(())
    }

    fn conn(&self) -> Result<&Connection, BookmarkStoreError> {
        self.conn.as_ref().ok_or(BookmarkStoreError::Closed)
    }
}

fn normalize(word: &str) -> Result<String, BookmarkStoreError> {
    let word = capitalize(word);
    if word.is_empty() {
        return Err(BookmarkStoreError::EmptyWord);
    }
    Ok(word)
}
