//! Typed REPL lines through the UI loop into the real event loop

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use lexa_bookmarks::BookmarkStore;
use lexa_config::Config;
use lexa_core::Lexicon;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::events::event_loop;
use crate::state::AppState;
use crate::ui::run_ui;

const WORDS: &str = r#"{
    "CAT": {"MEANINGS": [["noun", "a small feline", [], []]]},
    "DOG": {"MEANINGS": [["noun", "a domestic canine", [], []]]}
}"#;

/// Starts both loops on a file-backed store; returns the line feed
fn start_session(db: &Path, tasks: &mut JoinSet<anyhow::Result<()>>) -> AsyncSender<String> {
    let mut config = Config::default();
    config.bookmarks.db_path = db.display().to_string();

    let state = Arc::new(AppState::new(config, Lexicon::from_json(WORDS).unwrap()));
    let bookmarks = BookmarkStore::open(db).unwrap();
    let (backend, translations) = Backend::new(state, bookmarks, None);

    let (line_tx, lines) = kanal::unbounded_async();
    let (ui_to_app_tx, ui_to_app_rx) = kanal::bounded_async(4);
    let (app_to_ui_tx, app_to_ui_rx) = kanal::bounded_async(4);
    let cancel = CancellationToken::new();

    tasks.spawn(event_loop(
        backend,
        translations,
        ui_to_app_rx,
        app_to_ui_tx,
        cancel.child_token(),
    ));
    tasks.spawn(run_ui(lines, app_to_ui_rx, ui_to_app_tx, cancel.child_token()));

    line_tx
}

async fn join_all(mut tasks: JoinSet<anyhow::Result<()>>) {
    timeout(Duration::from_secs(5), async {
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }
    })
    .await
    .expect("session did not shut down");
}

#[tokio::test]
async fn quit_persists_bookmarks_and_honours_delete_answers() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bookmarks.db");

    let mut tasks = JoinSet::new();
    let lines = start_session(&db, &mut tasks);
    for line in [
        "cat", ":b cat", ":b dog", ":b owl", ":d owl", "n", ":d cat", "y", ":l", ":w", ":q",
    ] {
        lines.send(line.to_string()).await.unwrap();
    }
    join_all(tasks).await;

    // The event loop closed the store, so it reopens cleanly
    let store = BookmarkStore::open(&db).unwrap();
    assert_eq!(store.list().unwrap(), vec!["Dog", "Owl"]);
}

#[tokio::test]
async fn end_of_input_shuts_the_session_down() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bookmarks.db");

    let mut tasks = JoinSet::new();
    let lines = start_session(&db, &mut tasks);
    lines.send(":b cat".to_string()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(lines);
    join_all(tasks).await;

    let store = BookmarkStore::open(&db).unwrap();
    assert_eq!(store.list().unwrap(), vec!["Cat"]);
}

#[tokio::test]
async fn many_piped_lines_do_not_stall_the_loops() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("bookmarks.db");

    let mut tasks = JoinSet::new();
    let lines = start_session(&db, &mut tasks);
    for i in 0..500 {
        let line = if i % 2 == 0 { "cat" } else { ":l" };
        lines.send(line.to_string()).await.unwrap();
    }
    lines.send(":q".to_string()).await.unwrap();
    join_all(tasks).await;
}
