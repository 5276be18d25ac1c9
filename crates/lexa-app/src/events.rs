use kanal::{AsyncReceiver, AsyncSender};
use lexa_translator::TranslationEvent;
use lexa_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;

pub mod bookmark;
pub mod lookup;
pub mod translate;

use bookmark::{handle_delete, handle_list, handle_toggle};
use lookup::{handle_lookup, handle_word_count};
use translate::{handle_translate, translation_to_app_event};

/// Whether the loop keeps running after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// App's main loop. Owns the backend; the bookmark store is closed exactly
/// once when the loop ends, whatever the reason.
pub async fn event_loop(
    mut backend: Backend,
    translations: Option<AsyncReceiver<TranslationEvent>>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let result = run(
        &mut backend,
        translations.as_ref(),
        &ui_to_app_rx,
        &app_to_ui_tx,
        &cancel,
    )
    .await;

    backend.shutdown();
    tracing::info!("[EVENT_LOOP] Stopped");
    result
}

async fn run(
    backend: &mut Backend,
    translations: Option<&AsyncReceiver<TranslationEvent>>,
    ui_to_app_rx: &AsyncReceiver<AppEvent>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    tracing::info!("[EVENT_LOOP] Waiting for events");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                return Ok(());
            }
            event = next_translation(translations) => {
                app_to_ui_tx.send(translation_to_app_event(event)).await?;
            }
            event = ui_to_app_rx.recv() => {
                let Ok(event) = event else {
                    tracing::info!("[EVENT_LOOP] UI channel closed");
                    return Ok(());
                };

                tracing::debug!("[EVENT_LOOP] Received {:?}", std::mem::discriminant(&event));
                if handle_events(backend, app_to_ui_tx, event).await? == Flow::Stop {
                    return Ok(());
                }
            }
        }
    }
}

/// Never resolves when translation is disabled
async fn next_translation(
    translations: Option<&AsyncReceiver<TranslationEvent>>,
) -> TranslationEvent {
    if let Some(rx) = translations
        && let Ok(event) = rx.recv().await
    {
        return event;
    }
    std::future::pending().await
}

pub async fn handle_events(
    backend: &mut Backend,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<Flow> {
    let reply = match event {
        AppEvent::Lookup(word) => handle_lookup(&backend.state, &backend.bookmarks, &word),
        AppEvent::ToggleBookmark(word) => Some(handle_toggle(&mut backend.bookmarks, &word)),
        AppEvent::DeleteBookmark { word, confirmed } => {
            // The UI already asked the user
            Some(handle_delete(&mut backend.bookmarks, &word, || confirmed))
        }
        AppEvent::ListBookmarks => Some(handle_list(&backend.bookmarks)),
        AppEvent::Translate { word, to_lang } => Some(handle_translate(
            &backend.state.config,
            backend.translator.as_ref(),
            &word,
            to_lang,
        )),
        AppEvent::WordCount => Some(handle_word_count(&backend.state)),
        AppEvent::Shutdown => {
            tracing::info!("[EVENT_LOOP] Shutdown requested by UI");
            return Ok(Flow::Stop);
        }
        // App -> UI events, nothing to do in the backend
        AppEvent::BackendReady
        | AppEvent::ShowEntry(_)
        | AppEvent::NotFound(_)
        | AppEvent::BookmarkToggled { .. }
        | AppEvent::BookmarkDeleted { .. }
        | AppEvent::ShowBookmarks(_)
        | AppEvent::TranslationStarted { .. }
        | AppEvent::ShowTranslation { .. }
        | AppEvent::TranslationFailed { .. }
        | AppEvent::Status(_) => None,
    };

    if let Some(reply) = reply {
        app_to_ui_tx.send(reply).await?;
    }

    Ok(Flow::Continue)
}
