#[derive(Debug, Clone)]
pub enum AppEvent {
    // UI -> app
    Lookup(String),
    ToggleBookmark(String),
    /// Confirmation is decided by the UI before the event is sent
    DeleteBookmark {
        word: String,
        confirmed: bool,
    },
    ListBookmarks,
    Translate {
        word: String,
        to_lang: Option<String>,
    },
    WordCount,
    Shutdown,

    // app -> UI
    BackendReady,
    ShowEntry(DisplayEntry),
    NotFound(String),
    BookmarkToggled {
        word: String,
        added: bool,
    },
    BookmarkDeleted {
        word: String,
        removed: bool,
    },
    ShowBookmarks(Vec<String>),
    TranslationStarted {
        word: String,
        to_lang: String,
        job: u64,
    },
    ShowTranslation {
        word: String,
        text: String,
        to_lang: String,
    },
    TranslationFailed {
        word: String,
        error: String,
    },
    Status(String),
}

#[derive(Debug, Clone)]
pub struct DisplayEntry {
    pub word: String,
    /// Fully composed card text
    pub card: String,
    pub bookmarked: bool,
}
