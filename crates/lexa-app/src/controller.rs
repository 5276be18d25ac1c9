use kanal::{AsyncReceiver, AsyncSender};
use lexa_translator::TranslationEvent;
use lexa_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::events::event_loop;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            app_to_ui: kanal::bounded_async(capacity),
            ui_to_app: kanal::bounded_async(capacity),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(event_capacity: usize) -> Self {
        Self {
            channels: ChannelSet::new(event_capacity),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Spawn the event loop and the UI loop. Each channel end moves into
    /// exactly one task so a finished task closes its channels.
    pub fn spawn_tasks(
        self,
        backend: Backend,
        translations: Option<AsyncReceiver<TranslationEvent>>,
    ) -> JoinSet<anyhow::Result<()>> {
        let ChannelSet {
            app_to_ui: (app_to_ui_tx, app_to_ui_rx),
            ui_to_app: (ui_to_app_tx, ui_to_app_rx),
        } = self.channels;

        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            backend,
            translations,
            ui_to_app_rx,
            app_to_ui_tx,
            self.cancel_token.child_token(),
        ));

        // UI loop
        tasks.spawn(ui_loop(
            app_to_ui_rx,
            ui_to_app_tx,
            self.cancel_token.child_token(),
        ));

        tasks
    }
}
