use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use lexa_bookmarks::BookmarkStore;
use lexa_types::AppEvent;

use crate::backend::{build_translator, new_worker};
use crate::events::bookmark::{handle_delete, handle_list, handle_toggle};
use crate::events::lookup::handle_lookup;
use crate::events::translate::{handle_translate, translation_to_app_event};
use crate::state::AppState;
use crate::ui::{format_event, is_yes};

pub fn open_bookmarks(state: &AppState) -> anyhow::Result<BookmarkStore> {
    let path = &state.config.bookmarks.db_path;
    BookmarkStore::open(Path::new(path))
        .with_context(|| format!("cannot open bookmark database {path}"))
}

fn print(event: &AppEvent) {
    if let Some(text) = format_event(event) {
        println!("{text}");
    }
}

/// Failures reported through a status event still fail the command
fn finish(event: AppEvent) -> anyhow::Result<()> {
    match event {
        AppEvent::Status(message) => anyhow::bail!(message),
        event => {
            print(&event);
            Ok(())
        }
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

pub fn lookup(state: &AppState, word: &str) -> anyhow::Result<()> {
    let mut bookmarks = open_bookmarks(state)?;
    let event = handle_lookup(state, &bookmarks, word);
    bookmarks.shutdown()?;

    match event {
        Some(event) => finish(event),
        None => anyhow::bail!("nothing to look up"),
    }
}

pub fn bookmark(state: &AppState, word: &str) -> anyhow::Result<()> {
    let mut bookmarks = open_bookmarks(state)?;
    let event = handle_toggle(&mut bookmarks, word);
    bookmarks.shutdown()?;
    finish(event)
}

pub fn bookmarks(state: &AppState) -> anyhow::Result<()> {
    let mut bookmarks = open_bookmarks(state)?;
    let event = handle_list(&bookmarks);
    bookmarks.shutdown()?;
    finish(event)
}

pub fn unbookmark(state: &AppState, word: &str, yes: bool) -> anyhow::Result<()> {
    let mut bookmarks = open_bookmarks(state)?;
    let event = delete_bookmark(
        &mut bookmarks,
        word,
        yes,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    );
    bookmarks.shutdown()?;
    finish(event?)
}

/// The prompt is shown from inside the store's confirmation hook, so an
/// empty word or a closed store never asks
fn delete_bookmark<R: BufRead, W: Write>(
    bookmarks: &mut BookmarkStore,
    word: &str,
    yes: bool,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<AppEvent> {
    let mut prompt_error = None;
    let event = handle_delete(bookmarks, word, || {
        yes || ask(input, output, &format!("Delete {word} from bookmarks?")).unwrap_or_else(|e| {
            prompt_error = Some(e);
            false
        })
    });

    match prompt_error {
        Some(e) => Err(anyhow::Error::new(e).context("cannot read confirmation")),
        None => Ok(event),
    }
}

pub async fn translate(state: &AppState, word: &str, to: Option<String>) -> anyhow::Result<()> {
    let translator = build_translator(&state.config.translator).context(
        "translation is disabled: set DEEPL_API_KEY or enable the translator in the config",
    )?;
    let (worker, listener) = new_worker(&state.config.translator, translator);

    finish(handle_translate(&state.config, Some(&worker), word, to))?;

    let event = listener
        .recv()
        .await
        .context("translation worker stopped")?;

    match translation_to_app_event(event) {
        AppEvent::TranslationFailed { word, error } => {
            anyhow::bail!("translation of {word} failed: {error}")
        }
        event => finish(event),
    }
}
