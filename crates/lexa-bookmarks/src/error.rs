#[derive(Debug, thiserror::Error)]
pub enum BookmarkStoreError {
    #[error("Bookmark storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot prepare bookmark storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bookmark store is closed")]
    Closed,

    #[error("Cannot bookmark an empty word")]
    EmptyWord,
}
