use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    "bookmarks.db".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BookmarkConfig {
    /// SQLite file holding the `word_list` table
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for BookmarkConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}
