use lexa_bookmarks::{BookmarkStore, Toggle};
use lexa_types::AppEvent;

pub fn handle_toggle(bookmarks: &mut BookmarkStore, word: &str) -> AppEvent {
    match bookmarks.toggle(word) {
        Ok(toggle) => AppEvent::BookmarkToggled {
            word: lexa_core::preprocess::capitalize(word),
            added: toggle == Toggle::Added,
        },
        Err(e) => {
            tracing::error!("Bookmark toggle failed for '{word}': {e}");
            AppEvent::Status(e.to_string())
        }
    }
}

/// `confirm` runs only once the store accepts the word
pub fn handle_delete<F>(bookmarks: &mut BookmarkStore, word: &str, confirm: F) -> AppEvent
where
    F: FnOnce() -> bool,
{
    match bookmarks.delete(word, confirm) {
        Ok(removed) => AppEvent::BookmarkDeleted {
            word: lexa_core::preprocess::capitalize(word),
            removed,
        },
        Err(e) => {
            tracing::error!("Bookmark delete failed for '{word}': {e}");
            AppEvent::Status(e.to_string())
        }
    }
}

pub fn handle_list(bookmarks: &BookmarkStore) -> AppEvent {
    match bookmarks.list() {
        Ok(words) => AppEvent::ShowBookmarks(words),
        Err(e) => {
            tracing::error!("Listing bookmarks failed: {e}");
            AppEvent::Status(e.to_string())
        }
    }
}
