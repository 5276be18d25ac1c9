use lexa_bookmarks::BookmarkStore;
use lexa_core::preprocess::{DefaultPreprocessor, Preprocessor};
use lexa_types::{AppEvent, DisplayEntry};

use crate::state::AppState;

pub fn handle_lookup(state: &AppState, bookmarks: &BookmarkStore, word: &str) -> Option<AppEvent> {
    let query = DefaultPreprocessor.process(word);
    if query.is_empty() {
        tracing::debug!("Ignoring empty lookup");
        return None;
    }

    let Some(entry) = state.lexicon.lookup(&query) else {
        tracing::debug!("No entry for '{}'", query);
        return Some(AppEvent::NotFound(query));
    };

    let rendered = state.renderer.render_entry(&query, entry);
    tracing::debug!("Rendered entry '{}'", rendered.title);

    Some(AppEvent::ShowEntry(DisplayEntry {
        word: rendered.title.clone(),
        card: rendered.compose(),
        bookmarked: bookmarks.contains(&query),
    }))
}

pub fn handle_word_count(state: &AppState) -> AppEvent {
    let metadata = state.lexicon.metadata();
    AppEvent::Status(format!(
        "{} words loaded from {}",
        metadata.entry_count, metadata.source
    ))
}
