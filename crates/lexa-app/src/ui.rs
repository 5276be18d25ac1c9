use std::io::{BufRead, Write};

use kanal::{AsyncReceiver, AsyncSender};
use lexa_types::AppEvent;
use tokio_util::sync::CancellationToken;

pub const HELP: &str = "\
<word>            look up a word
:b <word>         bookmark a word (again to remove)
:d <word>         delete a bookmark
:l                list bookmarks
:t <word> [lang]  translate a word
:w                word count
:h                this help
:q                quit";

const PROMPT: &str = "> ";

/// A parsed REPL line
#[derive(Debug, Clone)]
pub enum UiCommand {
    Send(AppEvent),
    /// Ask before sending `DeleteBookmark`
    ConfirmDelete(String),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Option<UiCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if !line.starts_with(':') {
        return Some(UiCommand::Send(AppEvent::Lookup(line.to_string())));
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let command = match command {
        ":q" | ":quit" => UiCommand::Quit,
        ":h" | ":help" => UiCommand::Help,
        ":l" | ":list" => UiCommand::Send(AppEvent::ListBookmarks),
        ":w" | ":words" => UiCommand::Send(AppEvent::WordCount),
        ":b" | ":d" | ":t" if rest.is_empty() => {
            UiCommand::Invalid(format!("{command} needs a word"))
        }
        ":b" => UiCommand::Send(AppEvent::ToggleBookmark(rest.to_string())),
        ":d" => UiCommand::ConfirmDelete(rest.to_string()),
        ":t" => {
            let mut parts = rest.split_whitespace();
            let word = parts.next().unwrap_or_default().to_string();
            let to_lang = parts.next().map(str::to_string);
            UiCommand::Send(AppEvent::Translate { word, to_lang })
        }
        other => UiCommand::Invalid(format!("Unknown command {other}, :h for help")),
    };

    Some(command)
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Text shown for an app event, `None` for events with no output
pub fn format_event(event: &AppEvent) -> Option<String> {
    let text = match event {
        AppEvent::BackendReady => "Type a word to look it up, :h for help".to_string(),
        AppEvent::ShowEntry(entry) => {
            if entry.bookmarked {
                format!("{}\n[bookmarked]", entry.card)
            } else {
                entry.card.clone()
            }
        }
        AppEvent::NotFound(word) => format!("No entry for \"{word}\""),
        AppEvent::BookmarkToggled { word, added: true } => format!("Added {word} to bookmarks"),
        AppEvent::BookmarkToggled { word, added: false } => {
            format!("Removed {word} from bookmarks")
        }
        AppEvent::BookmarkDeleted { word, removed: true } => format!("Deleted {word}"),
        AppEvent::BookmarkDeleted { word, removed: false } => format!("{word} was not deleted"),
        AppEvent::ShowBookmarks(words) if words.is_empty() => "No bookmarks yet".to_string(),
        AppEvent::ShowBookmarks(words) => words.join("\n"),
        AppEvent::TranslationStarted { word, to_lang, job } => {
            format!("Translating {word} to {to_lang} (job #{job})...")
        }
        AppEvent::ShowTranslation { word, text, to_lang } => format!("{word} [{to_lang}]: {text}"),
        AppEvent::TranslationFailed { word, error } => {
            format!("Translation of {word} failed: {error}")
        }
        AppEvent::Status(message) => message.clone(),
        AppEvent::Lookup(_)
        | AppEvent::ToggleBookmark(_)
        | AppEvent::DeleteBookmark { .. }
        | AppEvent::ListBookmarks
        | AppEvent::Translate { .. }
        | AppEvent::WordCount
        | AppEvent::Shutdown => return None,
    };

    Some(text)
}

fn print_prompt(prompt: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "{prompt}");
    let _ = stdout.flush();
}

/// Read stdin on a plain thread so a pending read never holds up runtime
/// shutdown
fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::unbounded_async();

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.try_send(line).is_err() {
                break;
            }
        }
        tracing::debug!("stdin closed");
    });

    rx
}

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let lines = spawn_stdin_reader();
    run_ui(lines, app_to_ui_rx, ui_to_app_tx, cancel).await
}

pub(crate) async fn run_ui(
    lines: AsyncReceiver<String>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    // Requests go through an ordered outbox so the UI keeps draining app
    // events even while the event loop's inbox is full
    let (outbox_tx, outbox_rx) = kanal::unbounded_async::<AppEvent>();

    let forward = async move {
        while let Ok(event) = outbox_rx.recv().await {
            if ui_to_app_tx.send(event).await.is_err() {
                tracing::debug!("[UI] Event loop gone, dropping requests");
                break;
            }
        }
    };

    let (result, ()) = tokio::join!(interact(lines, app_to_ui_rx, outbox_tx, cancel), forward);
    tracing::info!("[UI] Stopped");
    result
}

async fn interact(
    lines: AsyncReceiver<String>,
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    outbox: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut pending_delete: Option<String> = None;
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => {
                // Backend gone: nothing left to show
                let Ok(event) = event else { break };
                if let Some(text) = format_event(&event) {
                    println!("{text}");
                }
                if input_open && pending_delete.is_none() {
                    print_prompt(PROMPT);
                }
            }
            line = lines.recv(), if input_open => {
                let Ok(line) = line else {
                    input_open = false;
                    outbox.send(AppEvent::Shutdown).await?;
                    continue;
                };

                if let Some(word) = pending_delete.take() {
                    let confirmed = is_yes(&line);
                    outbox.send(AppEvent::DeleteBookmark { word, confirmed }).await?;
                    continue;
                }

                match parse_command(&line) {
                    None => print_prompt(PROMPT),
                    Some(UiCommand::Send(event)) => outbox.send(event).await?,
                    Some(UiCommand::ConfirmDelete(word)) => {
                        print_prompt(&format!("Delete {word} from bookmarks? [y/N] "));
                        pending_delete = Some(word);
                    }
                    Some(UiCommand::Help) => {
                        println!("{HELP}");
                        print_prompt(PROMPT);
                    }
                    Some(UiCommand::Invalid(message)) => {
                        println!("{message}");
                        print_prompt(PROMPT);
                    }
                    Some(UiCommand::Quit) => {
                        input_open = false;
                        outbox.send(AppEvent::Shutdown).await?;
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn recv(rx: &AsyncReceiver<AppEvent>) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    fn sent(line: &str) -> AppEvent {
        match parse_command(line) {
            Some(UiCommand::Send(event)) => event,
            other => panic!("expected an event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn plain_words_are_lookups() {
        assert!(matches!(sent("  search "), AppEvent::Lookup(ref w) if w == "search"));
        assert!(matches!(sent("ice cream"), AppEvent::Lookup(ref w) if w == "ice cream"));
        assert!(parse_command("   ").is_none());
    }

    #[test]
    fn colon_commands() {
        assert!(matches!(sent(":b cat"), AppEvent::ToggleBookmark(ref w) if w == "cat"));
        assert!(matches!(sent(":l"), AppEvent::ListBookmarks));
        assert!(matches!(sent(":w"), AppEvent::WordCount));
        assert!(matches!(
            sent(":t cat fr"),
            AppEvent::Translate { ref word, to_lang: Some(ref lang) } if word == "cat" && lang == "fr"
        ));
        assert!(matches!(
            sent(":t cat"),
            AppEvent::Translate { to_lang: None, .. }
        ));
        assert!(matches!(parse_command(":q"), Some(UiCommand::Quit)));
        assert!(matches!(parse_command(":h"), Some(UiCommand::Help)));
        assert!(matches!(parse_command(":d cat"), Some(UiCommand::ConfirmDelete(ref w)) if w == "cat"));
    }

    #[test]
    fn commands_without_a_word_are_invalid() {
        assert!(matches!(parse_command(":b"), Some(UiCommand::Invalid(_))));
        assert!(matches!(parse_command(":d   "), Some(UiCommand::Invalid(_))));
        assert!(matches!(parse_command(":x"), Some(UiCommand::Invalid(_))));
    }

    #[test]
    fn only_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES\n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("maybe"));
    }

    #[test]
    fn bookmarked_entries_carry_a_marker() {
        let event = AppEvent::ShowEntry(lexa_types::DisplayEntry {
            word: "Search".to_string(),
            card: "Search\n======".to_string(),
            bookmarked: true,
        });
        assert_eq!(
            format_event(&event).unwrap(),
            "Search\n======\n[bookmarked]"
        );
        assert_eq!(
            format_event(&AppEvent::ShowBookmarks(vec![])).unwrap(),
            "No bookmarks yet"
        );
        assert!(format_event(&AppEvent::Shutdown).is_none());
    }

    #[tokio::test]
    async fn delete_asks_before_sending() {
        let (line_tx, lines) = kanal::unbounded_async::<String>();
        let (app_tx, app_rx) = kanal::unbounded_async::<AppEvent>();
        let (ui_tx, ui_rx) = kanal::unbounded_async::<AppEvent>();

        let ui = tokio::spawn(run_ui(lines, app_rx, ui_tx, CancellationToken::new()));

        line_tx.send(":d cat".to_string()).await.unwrap();
        line_tx.send("n".to_string()).await.unwrap();
        line_tx.send(":d dog".to_string()).await.unwrap();
        line_tx.send("y".to_string()).await.unwrap();
        line_tx.send(":q".to_string()).await.unwrap();

        assert!(matches!(
            recv(&ui_rx).await,
            AppEvent::DeleteBookmark { ref word, confirmed: false } if word == "cat"
        ));
        assert!(matches!(
            recv(&ui_rx).await,
            AppEvent::DeleteBookmark { ref word, confirmed: true } if word == "dog"
        ));
        assert!(matches!(recv(&ui_rx).await, AppEvent::Shutdown));

        // Still waiting for the backend to go away
        assert!(!ui.is_finished());
        drop(app_tx);
        tokio::time::timeout(Duration::from_secs(2), ui)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
