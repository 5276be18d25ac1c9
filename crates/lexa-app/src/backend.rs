use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use lexa_bookmarks::BookmarkStore;
use lexa_config::translator::TranslatorConfig;
use lexa_translator::{DeepLTranslator, TranslationEvent, TranslationWorker, Translator};

use crate::state::AppState;

/// Dependencies owned by the event loop.
///
/// The bookmark store is not shared: every mutation goes through the task
/// that owns this value.
pub struct Backend {
    pub state: Arc<AppState>,
    pub bookmarks: BookmarkStore,
    pub translator: Option<TranslationWorker>,
}

impl Backend {
    /// Build the backend and, when a translator is available, the receiver
    /// its results arrive on
    pub fn new(
        state: Arc<AppState>,
        bookmarks: BookmarkStore,
        translator: Option<Arc<dyn Translator>>,
    ) -> (Self, Option<AsyncReceiver<TranslationEvent>>) {
        let (worker, listener) = match translator {
            Some(translator) => {
                let (worker, listener) = new_worker(&state.config.translator, translator);
                (Some(worker), Some(listener))
            }
            None => (None, None),
        };

        let backend = Self {
            state,
            bookmarks,
            translator: worker,
        };

        (backend, listener)
    }

    /// Cancel pending work and close the store
    pub fn shutdown(&mut self) {
        if let Some(worker) = &self.translator
            && let Some(job) = worker.cancel()
        {
            tracing::debug!("Cancelled translation job {job} on shutdown");
        }

        if let Err(e) = self.bookmarks.shutdown() {
            tracing::error!("Failed to close bookmark store: {e}");
        }
    }
}

pub fn new_worker(
    config: &TranslatorConfig,
    translator: Arc<dyn Translator>,
) -> (TranslationWorker, AsyncReceiver<TranslationEvent>) {
    TranslationWorker::new(
        translator,
        config.from_lang.clone(),
        Duration::from_millis(config.timeout_ms),
    )
}

/// Provider named in the config, if translation is enabled and configured
pub fn build_translator(config: &TranslatorConfig) -> Option<Arc<dyn Translator>> {
    if !config.is_usable() {
        tracing::info!("Translation disabled");
        return None;
    }

    match config.provider.to_lowercase().as_str() {
        "deepl" => Some(Arc::new(DeepLTranslator::new(
            config.api_key.clone(),
            config.api_url.clone(),
        ))),
        other => {
            tracing::warn!("Unknown translation provider {other}, translation disabled");
            None
        }
    }
}
