use std::sync::Arc;

use lexa_config::Config;
use lexa_core::{EntryRenderer, Lexicon, Markup};

/// Read-only state shared by the event loop and one-shot commands
pub struct AppState {
    pub config: Config,
    pub lexicon: Arc<Lexicon>,
    pub renderer: EntryRenderer,
}

impl AppState {
    pub fn new(config: Config, lexicon: Lexicon) -> Self {
        let markup = config.render.markup.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}, rendering plain text");
            Markup::Plain
        });

        Self {
            config,
            lexicon: Arc::new(lexicon),
            renderer: EntryRenderer::new(markup),
        }
    }
}
